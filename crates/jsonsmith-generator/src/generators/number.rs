//! Numeric variants.
//!
//! [`NumberGenerator`] draws an integer from the half-open range
//! `[min, max)` and adds an independent fraction in `[0, 1)`, so its output
//! lies in `[min, max + 1)` and is generally non-integral. Its range comes
//! from configuration only; schema `minimum`/`maximum` are not consulted.
//!
//! [`IntegerGenerator`] draws from the inclusive range `[min, max]`, taking
//! schema bounds as the default tier.

use rand::{Rng, RngCore};
use serde_json::{Number, Value};

use super::{Generator, GeneratorContext};
use crate::error::GenerateError;

/// Built-in lower bound for `number` values.
pub const DEFAULT_NUMBER_MIN: i64 = 0;
/// Built-in upper bound for `number` values.
pub const DEFAULT_NUMBER_MAX: i64 = i32::MAX as i64;

/// Built-in lower bound for `integer` values.
pub const DEFAULT_INTEGER_MIN: i64 = 0;
/// Built-in upper bound for `integer` values.
pub const DEFAULT_INTEGER_MAX: i64 = i32::MAX as i64;

/// Jittered number generator.
#[derive(Debug, Clone)]
pub struct NumberGenerator<'a> {
    ctx: GeneratorContext<'a>,
}

impl<'a> NumberGenerator<'a> {
    /// Bind to a context.
    pub fn new(ctx: GeneratorContext<'a>) -> Self {
        Self { ctx }
    }

    /// Effective `[min, max)` range.
    ///
    /// # Errors
    ///
    /// [`GenerateError::InvalidRange`] when `max <= min`.
    pub fn range(&self) -> Result<(i64, i64), GenerateError> {
        let min = self.ctx.resolve(|c| c.number_min).unwrap_or(DEFAULT_NUMBER_MIN);
        let max = self.ctx.resolve(|c| c.number_max).unwrap_or(DEFAULT_NUMBER_MAX);
        if max <= min {
            return Err(GenerateError::InvalidRange {
                attribute: "number",
                min,
                max,
            });
        }
        Ok((min, max))
    }
}

impl Generator for NumberGenerator<'_> {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Value, GenerateError> {
        let (min, max) = self.range()?;
        // i128 so that spans wider than i64::MAX cannot overflow.
        let offset = rng.gen_range(0..i128::from(max) - i128::from(min));
        let jitter: f64 = rng.gen();
        let value = min as f64 + offset as f64 + jitter;
        Number::from_f64(value)
            .map(Value::Number)
            .ok_or(GenerateError::NonFinite { value })
    }
}

/// Integer generator over an inclusive range.
#[derive(Debug, Clone)]
pub struct IntegerGenerator<'a> {
    ctx: GeneratorContext<'a>,
}

impl<'a> IntegerGenerator<'a> {
    /// Bind to a context.
    pub fn new(ctx: GeneratorContext<'a>) -> Self {
        Self { ctx }
    }

    /// Effective `[min, max]` range.
    ///
    /// # Errors
    ///
    /// [`GenerateError::InvalidRange`] when `max < min`.
    pub fn range(&self) -> Result<(i64, i64), GenerateError> {
        let schema = self.ctx.schema;
        let min = self
            .ctx
            .resolve(|c| c.integer_min)
            .or_else(|| schema.minimum().map(|m| m.ceil() as i64))
            .unwrap_or(DEFAULT_INTEGER_MIN);
        let max = self
            .ctx
            .resolve(|c| c.integer_max)
            .or_else(|| schema.maximum().map(|m| m.floor() as i64))
            .unwrap_or(DEFAULT_INTEGER_MAX);
        if max < min {
            return Err(GenerateError::InvalidRange {
                attribute: "integer",
                min,
                max,
            });
        }
        Ok((min, max))
    }
}

impl Generator for IntegerGenerator<'_> {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Value, GenerateError> {
        let (min, max) = self.range()?;
        Ok(Value::from(rng.gen_range(min..=max)))
    }
}
