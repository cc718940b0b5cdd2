//! Validation results collected from `validator` derives and hand-written rules

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: HashMap<String, Vec<String>>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: HashMap::new(),
        }
    }

    pub fn from_validation_errors(errors: ValidationErrors) -> Self {
        let mut result = Self {
            is_valid: false,
            errors: HashMap::new(),
        };

        for (field, field_errors) in errors.field_errors() {
            let error_messages = field_errors
                .iter()
                .map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("Validation failed for field '{}'", field),
                })
                .collect();

            result.errors.insert(field.to_string(), error_messages);
        }

        result
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        let messages = self.errors.entry(field.to_string()).or_default();
        if !messages.iter().any(|m| m == message) {
            messages.push(message.to_string());
        }
    }

    /// First message of the first failing field, walking `order`. Fields not
    /// named in `order` come after, sorted by name.
    pub fn first_error(&self, order: &[&str]) -> Option<&str> {
        let mut remaining: Vec<&String> = self
            .errors
            .keys()
            .filter(|field| !order.contains(&field.as_str()))
            .collect();
        remaining.sort();

        order
            .iter()
            .filter_map(|field| self.errors.get(*field))
            .chain(remaining.into_iter().filter_map(|field| self.errors.get(field)))
            .find_map(|messages| messages.first())
            .map(String::as_str)
    }
}

pub trait Validatable {
    fn validate_comprehensive(&self) -> ValidationResult;
}

impl<T> Validatable for T
where T: Validate, {
    fn validate_comprehensive(&self) -> ValidationResult {
        match self.validate() {
            Ok(_) => ValidationResult::success(),
            Err(errors) => ValidationResult::from_validation_errors(errors),
        }
    }
}
