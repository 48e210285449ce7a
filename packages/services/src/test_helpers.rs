use std::sync::Arc;

use crate::config::{MemoryConfig, PASSWORD_MAXIMUM, PASSWORD_MINIMUM, PASSWORD_REUSE_TRACK};
use crate::translation::{format_template, Translator, Untranslated};
use crate::validation::{build_password_validators, NoPasswordHistory, ValidatorManager};

pub fn password_config(minimum: u32, maximum: u32, reuse: u32) -> MemoryConfig {
    MemoryConfig::new()
        .with(PASSWORD_MINIMUM, minimum)
        .with(PASSWORD_MAXIMUM, maximum)
        .with(PASSWORD_REUSE_TRACK, reuse)
}

pub fn build_manager(config: &MemoryConfig) -> ValidatorManager {
    build_password_validators(config, Arc::new(Untranslated), Arc::new(NoPasswordHistory))
        .expect("Failed to build password validators")
}

/// Stands in for a real locale so tests can see that texts were routed through the hook.
pub struct UppercaseTranslator;

impl Translator for UppercaseTranslator {
    fn translate(&self, template: &str, args: &[String]) -> String {
        format_template(template, args).to_uppercase()
    }
}
