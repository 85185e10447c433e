use rand::{Rng, RngCore};
use serde_json::Value;

use super::Generator;
use crate::error::GenerateError;

/// Emits `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGenerator;

impl Generator for NullGenerator {
    fn generate(&self, _rng: &mut dyn RngCore) -> Result<Value, GenerateError> {
        Ok(Value::Null)
    }
}

/// Emits a uniformly distributed boolean.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanGenerator;

impl Generator for BooleanGenerator {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Value, GenerateError> {
        Ok(Value::Bool(rng.gen()))
    }
}
