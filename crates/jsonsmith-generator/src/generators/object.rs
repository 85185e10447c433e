use rand::RngCore;
use serde_json::{Map, Value};

use super::{generate_node, Generator, GeneratorContext};
use crate::error::GenerateError;

/// Object carrying every declared property, in declaration order, each
/// generated with its property name bound.
#[derive(Debug, Clone)]
pub struct ObjectGenerator<'a> {
    ctx: GeneratorContext<'a>,
}

impl<'a> ObjectGenerator<'a> {
    /// Bind to a context.
    pub fn new(ctx: GeneratorContext<'a>) -> Self {
        Self { ctx }
    }
}

impl Generator for ObjectGenerator<'_> {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Value, GenerateError> {
        let properties = self.ctx.schema.properties();
        let mut object = Map::new();
        for (name, schema) in &properties {
            let value = generate_node(self.ctx.child(schema, Some(*name)), rng)?;
            object.insert((*name).to_string(), value);
        }
        Ok(Value::Object(object))
    }
}
