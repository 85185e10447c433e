//! # Generator Dispatch
//!
//! One generator variant per schema discriminator, selected by
//! [`GeneratorKind::for_schema`]. Each variant is a small struct bound to a
//! [`GeneratorContext`] (schema node, optional configuration, optional
//! property name) and implementing [`Generator`].
//!
//! ## Selection Order
//!
//! 1. a non-empty `enum` keyword selects [`GeneratorKind::Enum`];
//! 2. a recognised `format` on a string (or untyped) node selects the
//!    matching format variant;
//! 3. otherwise the `type` keyword; when `type` is absent, `properties`
//!    implies an object and `items` implies an array.
//!
//! Nodes that match nothing generate `null`.

mod array;
mod formats;
mod number;
mod object;
mod primitive;
mod string;

pub use array::{ArrayGenerator, DEFAULT_ARRAY_ITEMS_MAX, DEFAULT_ARRAY_ITEMS_MIN};
pub use formats::{backdate_offset, backdated, DateGenerator, DateTimeGenerator, TimeGenerator, UuidGenerator};
pub use number::{
    IntegerGenerator, NumberGenerator, DEFAULT_INTEGER_MAX, DEFAULT_INTEGER_MIN,
    DEFAULT_NUMBER_MAX, DEFAULT_NUMBER_MIN,
};
pub use object::ObjectGenerator;
pub use primitive::{BooleanGenerator, NullGenerator};
pub use string::{
    EnumGenerator, StringGenerator, DEFAULT_STRING_LENGTH_MAX, DEFAULT_STRING_LENGTH_MIN,
};

use std::fmt;

use jsonsmith_schema::{Schema, SchemaType};
use rand::seq::SliceRandom;
use rand::RngCore;
use serde_json::Value;

use crate::config::{Constraints, GeneratorConfig};
use crate::error::GenerateError;

/// Produces one JSON value per call.
///
/// The randomness source is borrowed for the duration of the call only.
/// Apart from consuming randomness (and reading the clock in the temporal
/// variants) generation has no side effects.
pub trait Generator {
    /// Generate a value.
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Value, GenerateError>;
}

/// What a generator is bound to: one schema node, an optional
/// configuration, and the property name the node sits under, if any.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorContext<'a> {
    /// The schema node being generated.
    pub schema: &'a Schema,
    /// Constraint overrides, if any.
    pub config: Option<&'a GeneratorConfig>,
    /// Property name selecting the per-property override tier.
    pub property: Option<&'a str>,
}

impl<'a> GeneratorContext<'a> {
    /// Context for a root node with no property name bound.
    pub fn new(schema: &'a Schema, config: Option<&'a GeneratorConfig>) -> Self {
        Self {
            schema,
            config,
            property: None,
        }
    }

    /// Bind a property name.
    pub fn for_property(mut self, property: &'a str) -> Self {
        self.property = Some(property);
        self
    }

    /// Resolve one attribute through the per-property and global tiers.
    /// Looked up on every call, so configuration edits between two
    /// generations are always observed.
    pub fn resolve<T>(&self, pick: impl Fn(&Constraints) -> Option<T>) -> Option<T> {
        GeneratorConfig::resolve(self.config, self.property, pick)
    }

    /// Context for a nested node sharing this context's configuration.
    pub fn child<'b>(&self, schema: &'b Schema, property: Option<&'b str>) -> GeneratorContext<'b>
    where
        'a: 'b,
    {
        GeneratorContext {
            schema,
            config: self.config,
            property,
        }
    }

    /// Fixed candidate values configured for the bound property.
    pub fn predefined_values(&self) -> Option<&'a [Value]> {
        let config = self.config?;
        let constraints = config.property(self.property?)?;
        (!constraints.values.is_empty()).then_some(constraints.values.as_slice())
    }
}

/// Generator variant selected for a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    /// Always `null`.
    Null,
    /// Uniform boolean.
    Boolean,
    /// Integer within an inclusive range.
    Integer,
    /// Jittered number within a half-open range.
    Number,
    /// Alphanumeric string.
    String,
    /// One of the `enum` values.
    Enum,
    /// Array of generated items.
    Array,
    /// Object with every declared property.
    Object,
    /// `time` format: `HH:MM:SS+hhmm`.
    Time,
    /// `date` format: `YYYY-MM-DD`.
    Date,
    /// `date-time` format: RFC 3339.
    DateTime,
    /// `uuid` format: random v4 UUID.
    Uuid,
}

impl GeneratorKind {
    /// Select the variant for a schema node.
    pub fn for_schema(schema: &Schema) -> Self {
        if schema.enum_values().is_some_and(|values| !values.is_empty()) {
            return Self::Enum;
        }

        let schema_type = schema.schema_type();
        if matches!(schema_type, None | Some(SchemaType::String)) {
            if let Some(kind) = schema.format().and_then(Self::for_format) {
                return kind;
            }
        }

        match schema_type {
            Some(SchemaType::Null) => Self::Null,
            Some(SchemaType::Boolean) => Self::Boolean,
            Some(SchemaType::Integer) => Self::Integer,
            Some(SchemaType::Number) => Self::Number,
            Some(SchemaType::String) => Self::String,
            Some(SchemaType::Array) => Self::Array,
            Some(SchemaType::Object) => Self::Object,
            None if !schema.properties().is_empty() => Self::Object,
            None if schema.items().is_some() => Self::Array,
            None => Self::Null,
        }
    }

    fn for_format(format: &str) -> Option<Self> {
        match format {
            "time" => Some(Self::Time),
            "date" => Some(Self::Date),
            "date-time" => Some(Self::DateTime),
            "uuid" => Some(Self::Uuid),
            _ => None,
        }
    }

    /// Stable lowercase name, used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Enum => "enum",
            Self::Array => "array",
            Self::Object => "object",
            Self::Time => "time",
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Uuid => "uuid",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed dispatch table over every generator variant.
#[derive(Debug, Clone)]
pub enum AnyGenerator<'a> {
    /// See [`NullGenerator`].
    Null(NullGenerator),
    /// See [`BooleanGenerator`].
    Boolean(BooleanGenerator),
    /// See [`IntegerGenerator`].
    Integer(IntegerGenerator<'a>),
    /// See [`NumberGenerator`].
    Number(NumberGenerator<'a>),
    /// See [`StringGenerator`].
    String(StringGenerator<'a>),
    /// See [`EnumGenerator`].
    Enum(EnumGenerator<'a>),
    /// See [`ArrayGenerator`].
    Array(ArrayGenerator<'a>),
    /// See [`ObjectGenerator`].
    Object(ObjectGenerator<'a>),
    /// See [`TimeGenerator`].
    Time(TimeGenerator),
    /// See [`DateGenerator`].
    Date(DateGenerator),
    /// See [`DateTimeGenerator`].
    DateTime(DateTimeGenerator),
    /// See [`UuidGenerator`].
    Uuid(UuidGenerator),
}

impl<'a> AnyGenerator<'a> {
    /// Build the generator selected by [`GeneratorKind::for_schema`].
    pub fn new(ctx: GeneratorContext<'a>) -> Self {
        match GeneratorKind::for_schema(ctx.schema) {
            GeneratorKind::Null => Self::Null(NullGenerator),
            GeneratorKind::Boolean => Self::Boolean(BooleanGenerator),
            GeneratorKind::Integer => Self::Integer(IntegerGenerator::new(ctx)),
            GeneratorKind::Number => Self::Number(NumberGenerator::new(ctx)),
            GeneratorKind::String => Self::String(StringGenerator::new(ctx)),
            GeneratorKind::Enum => Self::Enum(EnumGenerator::new(ctx)),
            GeneratorKind::Array => Self::Array(ArrayGenerator::new(ctx)),
            GeneratorKind::Object => Self::Object(ObjectGenerator::new(ctx)),
            GeneratorKind::Time => Self::Time(TimeGenerator),
            GeneratorKind::Date => Self::Date(DateGenerator),
            GeneratorKind::DateTime => Self::DateTime(DateTimeGenerator),
            GeneratorKind::Uuid => Self::Uuid(UuidGenerator),
        }
    }

    /// The variant this generator dispatches to.
    pub fn kind(&self) -> GeneratorKind {
        match self {
            Self::Null(_) => GeneratorKind::Null,
            Self::Boolean(_) => GeneratorKind::Boolean,
            Self::Integer(_) => GeneratorKind::Integer,
            Self::Number(_) => GeneratorKind::Number,
            Self::String(_) => GeneratorKind::String,
            Self::Enum(_) => GeneratorKind::Enum,
            Self::Array(_) => GeneratorKind::Array,
            Self::Object(_) => GeneratorKind::Object,
            Self::Time(_) => GeneratorKind::Time,
            Self::Date(_) => GeneratorKind::Date,
            Self::DateTime(_) => GeneratorKind::DateTime,
            Self::Uuid(_) => GeneratorKind::Uuid,
        }
    }
}

impl Generator for AnyGenerator<'_> {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Value, GenerateError> {
        match self {
            Self::Null(g) => g.generate(rng),
            Self::Boolean(g) => g.generate(rng),
            Self::Integer(g) => g.generate(rng),
            Self::Number(g) => g.generate(rng),
            Self::String(g) => g.generate(rng),
            Self::Enum(g) => g.generate(rng),
            Self::Array(g) => g.generate(rng),
            Self::Object(g) => g.generate(rng),
            Self::Time(g) => g.generate(rng),
            Self::Date(g) => g.generate(rng),
            Self::DateTime(g) => g.generate(rng),
            Self::Uuid(g) => g.generate(rng),
        }
    }
}

/// Generate one schema node: a configured predefined value when the bound
/// property has any, otherwise the output of the dispatched variant.
pub fn generate_node(ctx: GeneratorContext<'_>, rng: &mut dyn RngCore) -> Result<Value, GenerateError> {
    if let Some(values) = ctx.predefined_values() {
        if let Some(value) = values.choose(rng) {
            return Ok(value.clone());
        }
    }
    AnyGenerator::new(ctx).generate(rng)
}

/// Document-level entry point owning an optional configuration.
#[derive(Debug, Clone, Default)]
pub struct JsonGenerator {
    config: Option<GeneratorConfig>,
}

impl JsonGenerator {
    /// A generator using built-in defaults only.
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator applying `config`.
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config: Some(config),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> Option<&GeneratorConfig> {
        self.config.as_ref()
    }

    /// Mutable configuration, created empty if absent. Edits apply to the
    /// next [`generate`](Self::generate) call.
    pub fn config_mut(&mut self) -> &mut GeneratorConfig {
        self.config.get_or_insert_with(GeneratorConfig::default)
    }

    /// Replace (or clear) the configuration.
    pub fn set_config(&mut self, config: Option<GeneratorConfig>) {
        self.config = config;
    }

    /// Generate a complete document for `schema`.
    pub fn generate(&self, schema: &Schema, rng: &mut dyn RngCore) -> Result<Value, GenerateError> {
        let ctx = GeneratorContext::new(schema, self.config.as_ref());
        tracing::debug!(
            schema = %schema.label(),
            kind = %GeneratorKind::for_schema(schema),
            "generating document"
        );
        generate_node(ctx, rng)
    }
}

/// Resolve a `[min, max]` count range (string length, array size).
///
/// `min` comes from the configuration tiers, then the schema keyword.
/// `max` is the configured maximum only; the schema's maximum is passed
/// separately as `schema_max` and capped at the built-in default (or at
/// `min`, if larger), since a schema bound only limits what is allowed.
/// A default is widened so that it never contradicts an explicit bound on
/// the other side.
pub(crate) fn count_range(
    attribute: &'static str,
    min: Option<u64>,
    max: Option<u64>,
    schema_max: Option<u64>,
    defaults: (u64, u64),
) -> Result<(u64, u64), GenerateError> {
    let cap = defaults.1.max(min.unwrap_or(defaults.0));
    let max = max.or_else(|| schema_max.map(|schema_max| schema_max.min(cap)));
    let (min, max) = match (min, max) {
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => (min, defaults.1.max(min)),
        (None, Some(max)) => (defaults.0.min(max), max),
        (None, None) => defaults,
    };
    if min > max {
        return Err(GenerateError::InvalidRange {
            attribute,
            min: i64::try_from(min).unwrap_or(i64::MAX),
            max: i64::try_from(max).unwrap_or(i64::MAX),
        });
    }
    Ok((min, max))
}
