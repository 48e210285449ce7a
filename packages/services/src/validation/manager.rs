use std::fmt;

use super::validator::{PasswordValidator, Subject};
use crate::errors::ErrorCollection;

/// Named, ordered set of password validators.
#[derive(Default)]
pub struct ValidatorManager {
    validators: Vec<(String, Box<dyn PasswordValidator>)>,
}

impl ValidatorManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `validator` under `name`. An existing entry with the same
    /// name is replaced and keeps its position.
    pub fn set_validator(&mut self, name: &str, validator: Box<dyn PasswordValidator>) {
        match self.validators.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = validator,
            None => self.validators.push((name.to_string(), validator)),
        }
    }

    pub fn has_validator(&self, name: &str) -> bool {
        self.validators.iter().any(|(n, _)| n == name)
    }

    pub fn validator(&self, name: &str) -> Option<&dyn PasswordValidator> {
        self.validators
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, validator)| validator.as_ref())
    }

    pub fn validators(&self) -> impl Iterator<Item = (&str, &dyn PasswordValidator)> {
        self.validators
            .iter()
            .map(|(name, validator)| (name.as_str(), validator.as_ref()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.validators().map(|(name, _)| name).collect()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Runs every validator and adds the text of each failure to `errors`.
    ///
    /// All validators run even after one fails, so the user sees every
    /// problem at once.
    pub fn is_valid_for(
        &self,
        password: &str,
        subject: Option<&Subject>,
        errors: &mut ErrorCollection,
    ) -> bool {
        let mut valid = true;
        for (name, validator) in self.validators() {
            if !validator.is_valid_for(password, subject, Some(&mut *errors)) {
                tracing::debug!(validator = name, "password rejected");
                valid = false;
            }
        }
        valid
    }

    pub fn is_valid(&self, password: &str, subject: Option<&Subject>) -> bool {
        self.validators()
            .all(|(_, validator)| validator.check(password, subject).is_ok())
    }

    /// Requirement texts of all validators, in registration order, each text once.
    pub fn requirement_strings(&self) -> Vec<String> {
        let mut requirements: Vec<String> = Vec::new();
        for (_, validator) in self.validators() {
            for (_, text) in validator.requirement_strings() {
                if !requirements.contains(&text) {
                    requirements.push(text);
                }
            }
        }
        requirements
    }
}

impl fmt::Debug for ValidatorManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorManager")
            .field("validators", &self.names())
            .finish()
    }
}
