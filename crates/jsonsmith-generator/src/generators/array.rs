use jsonsmith_schema::Schema;
use rand::{Rng, RngCore};
use serde_json::Value;

use super::{count_range, generate_node, Generator, GeneratorContext};
use crate::error::GenerateError;

/// Built-in minimum array size.
pub const DEFAULT_ARRAY_ITEMS_MIN: u64 = 1;
/// Built-in maximum array size.
pub const DEFAULT_ARRAY_ITEMS_MAX: u64 = 5;

/// Array of independently generated items.
///
/// Items are generated from the `items` schema (the permissive schema when
/// absent) and stay bound to the array's property name, so per-property
/// constraints reach them.
#[derive(Debug, Clone)]
pub struct ArrayGenerator<'a> {
    ctx: GeneratorContext<'a>,
}

impl<'a> ArrayGenerator<'a> {
    /// Bind to a context.
    pub fn new(ctx: GeneratorContext<'a>) -> Self {
        Self { ctx }
    }

    /// Effective inclusive item-count range.
    pub fn size_range(&self) -> Result<(u64, u64), GenerateError> {
        count_range(
            "array items",
            self.ctx
                .resolve(|c| c.array_items_min)
                .or_else(|| self.ctx.schema.min_items()),
            self.ctx.resolve(|c| c.array_items_max),
            self.ctx.schema.max_items(),
            (DEFAULT_ARRAY_ITEMS_MIN, DEFAULT_ARRAY_ITEMS_MAX),
        )
    }
}

impl Generator for ArrayGenerator<'_> {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Value, GenerateError> {
        let (min, max) = self.size_range()?;
        let count = rng.gen_range(min..=max);
        let item_schema = self.ctx.schema.items().unwrap_or_else(Schema::any);
        let item_ctx = self.ctx.child(&item_schema, self.ctx.property);
        let items = (0..count)
            .map(|_| generate_node(item_ctx, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(items))
    }
}
