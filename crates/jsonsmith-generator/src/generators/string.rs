use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde_json::Value;

use super::{count_range, Generator, GeneratorContext};
use crate::error::GenerateError;

/// Built-in minimum string length.
pub const DEFAULT_STRING_LENGTH_MIN: u64 = 1;
/// Built-in maximum string length.
pub const DEFAULT_STRING_LENGTH_MAX: u64 = 16;

/// Random alphanumeric string.
#[derive(Debug, Clone)]
pub struct StringGenerator<'a> {
    ctx: GeneratorContext<'a>,
}

impl<'a> StringGenerator<'a> {
    /// Bind to a context.
    pub fn new(ctx: GeneratorContext<'a>) -> Self {
        Self { ctx }
    }

    /// Effective inclusive length range, in characters.
    pub fn length_range(&self) -> Result<(u64, u64), GenerateError> {
        count_range(
            "string length",
            self.ctx
                .resolve(|c| c.string_length_min)
                .or_else(|| self.ctx.schema.min_length()),
            self.ctx.resolve(|c| c.string_length_max),
            self.ctx.schema.max_length(),
            (DEFAULT_STRING_LENGTH_MIN, DEFAULT_STRING_LENGTH_MAX),
        )
    }
}

impl Generator for StringGenerator<'_> {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Value, GenerateError> {
        let (min, max) = self.length_range()?;
        let len = rng.gen_range(min..=max);
        let text: String = (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect();
        Ok(Value::String(text))
    }
}

/// Uniform pick among the schema's `enum` values.
#[derive(Debug, Clone)]
pub struct EnumGenerator<'a> {
    ctx: GeneratorContext<'a>,
}

impl<'a> EnumGenerator<'a> {
    /// Bind to a context.
    pub fn new(ctx: GeneratorContext<'a>) -> Self {
        Self { ctx }
    }
}

impl Generator for EnumGenerator<'_> {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Value, GenerateError> {
        Ok(self
            .ctx
            .schema
            .enum_values()
            .and_then(|values| values.choose(rng))
            .cloned()
            .unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use jsonsmith_schema::Schema;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    #[test]
    fn test_string_default_length() {
        let s = Schema::new(json!({"type": "string"})).unwrap();
        let g = StringGenerator::new(GeneratorContext::new(&s, None));
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..50 {
            let v = g.generate(&mut rng).unwrap();
            let text = v.as_str().unwrap();
            assert!((1..=16).contains(&text.len()), "{text}");
            assert!(text.chars().all(|c| c.is_ascii_alphanumeric()), "{text}");
        }
    }

    #[test]
    fn test_string_length_tiers() {
        let s = Schema::new(json!({"type": "string", "minLength": 3, "maxLength": 4})).unwrap();
        assert_eq!(
            StringGenerator::new(GeneratorContext::new(&s, None)).length_range().unwrap(),
            (3, 4)
        );

        let mut config = GeneratorConfig::new();
        config.global_mut().string_length_max = Some(10);
        config.property_mut("code").string_length_min = Some(6);
        let ctx = GeneratorContext::new(&s, Some(&config)).for_property("code");
        assert_eq!(StringGenerator::new(ctx).length_range().unwrap(), (6, 10));
    }

    #[test]
    fn test_zero_length_string() {
        let s = Schema::new(json!({"type": "string", "maxLength": 0})).unwrap();
        let g = StringGenerator::new(GeneratorContext::new(&s, None));
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(g.generate(&mut rng).unwrap(), json!(""));
    }

    #[test]
    fn test_huge_max_length_is_capped() {
        let s = Schema::new(json!({"type": "string", "maxLength": 4_294_967_295u64})).unwrap();
        let g = StringGenerator::new(GeneratorContext::new(&s, None));
        assert_eq!(
            g.length_range().unwrap(),
            (DEFAULT_STRING_LENGTH_MIN, DEFAULT_STRING_LENGTH_MAX)
        );
        let mut rng = StdRng::seed_from_u64(5);
        let v = g.generate(&mut rng).unwrap();
        assert!(v.as_str().unwrap().len() as u64 <= DEFAULT_STRING_LENGTH_MAX);
    }

    #[test]
    fn test_enum_picks_declared_values() {
        let s = Schema::new(json!({"enum": ["red", 2, null]})).unwrap();
        let g = EnumGenerator::new(GeneratorContext::new(&s, None));
        let mut rng = StdRng::seed_from_u64(9);
        let allowed = [json!("red"), json!(2), Value::Null];
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let v = g.generate(&mut rng).unwrap();
            assert!(allowed.contains(&v), "{v}");
            seen.insert(v.to_string());
        }
        assert_eq!(seen.len(), 3);
    }
}
