//! # Validator Composition
//!
//! [`ValidatorSet`] keeps validators in registration order and refuses
//! duplicates. Two registrations are duplicates when they are the same
//! allocation or report the same [`Validator::identity`].

use std::sync::Arc;

use jsonsmith_schema::Validator;
use serde_json::Value;

/// Insertion-ordered, duplicate-free collection of validators.
#[derive(Debug, Clone, Default)]
pub struct ValidatorSet {
    validators: Vec<Arc<dyn Validator>>,
}

impl ValidatorSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `validator` unless an equivalent one is already present.
    /// Returns whether it was added.
    pub fn insert(&mut self, validator: Arc<dyn Validator>) -> bool {
        if self.contains(&validator) {
            tracing::debug!(validator = %validator.title(), "validator already registered");
            return false;
        }
        self.validators.push(validator);
        true
    }

    /// Whether an equivalent validator is present.
    pub fn contains(&self, validator: &Arc<dyn Validator>) -> bool {
        let identity = validator.identity();
        self.validators
            .iter()
            .any(|v| Arc::ptr_eq(v, validator) || v.identity() == identity)
    }

    /// Number of validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Validators in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Validator>> {
        self.validators.iter()
    }

    /// True when every validator accepts `instance`. Stops at the first
    /// rejection.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validators.iter().all(|v| v.is_valid(instance))
    }

    /// Run every validator, appending each one's findings to `report`.
    /// Returns true when all of them passed. Never stops early.
    pub fn validate(&self, instance: &Value, report: &mut String) -> bool {
        let mut passed = true;
        for validator in &self.validators {
            tracing::debug!(validator = %validator.title(), "validating");
            if !validator.validate(instance, report) {
                passed = false;
            }
        }
        passed
    }
}

impl<'a> IntoIterator for &'a ValidatorSet {
    type Item = &'a Arc<dyn Validator>;
    type IntoIter = std::slice::Iter<'a, Arc<dyn Validator>>;

    fn into_iter(self) -> Self::IntoIter {
        self.validators.iter()
    }
}
