use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::length::{MaximumLengthValidator, MinimumLengthValidator};
use super::manager::ValidatorManager;
use super::reuse::{PasswordHistory, ReuseValidator};
use super::validator::{ErrorCode, Message, PasswordValidator};
use crate::config::{
    read_threshold, ConfigError, ConfigStore, DEFAULT_PASSWORD_MINIMUM,
    DEFAULT_PASSWORD_REUSE_TRACK, PASSWORD_MAXIMUM, PASSWORD_MINIMUM, PASSWORD_REUSE_TRACK,
};
use crate::translation::Translator;

pub const MINIMUM_LENGTH: &str = "minimum_length";
pub const MAXIMUM_LENGTH: &str = "maximum_length";
pub const REUSE: &str = "reuse";

/// The length limits that are actually enforced.
///
/// Both length validators report through the same texts, which depend on
/// which of the two limits exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LengthBounds {
    pub minimum: Option<u32>,
    pub maximum: Option<u32>,
}

impl LengthBounds {
    pub fn error_message(&self, translator: &dyn Translator) -> String {
        match (self.minimum, self.maximum) {
            (Some(min), Some(max)) => translator.translate(
                "A password must be between %s and %s characters long.",
                &[min.to_string(), max.to_string()],
            ),
            (Some(min), None) => translator.translate(
                "A password must be at least %s characters long.",
                &[min.to_string()],
            ),
            (None, Some(max)) => translator.translate(
                "A password can be at most %s characters long.",
                &[max.to_string()],
            ),
            (None, None) => translator.translate("Invalid password.", &[]),
        }
    }

    pub fn requirement_message(&self, translator: &dyn Translator) -> Option<String> {
        match (self.minimum, self.maximum) {
            (Some(min), Some(max)) => Some(translator.translate(
                "Must be between %s and %s characters long.",
                &[min.to_string(), max.to_string()],
            )),
            (Some(min), None) => Some(translator.translate(
                "Must be at least %s characters long.",
                &[min.to_string()],
            )),
            (None, Some(max)) => Some(translator.translate(
                "Must be at most %s characters long.",
                &[max.to_string()],
            )),
            (None, None) => None,
        }
    }

    fn error(self, translator: Arc<dyn Translator>) -> Message {
        Message::formatted(move |_, _| Some(self.error_message(translator.as_ref())))
    }

    fn requirement(self, translator: Arc<dyn Translator>) -> Message {
        Message::formatted(move |_, _| self.requirement_message(translator.as_ref()))
    }
}

/// Builds the password validators enabled by configuration.
///
/// * `user.password.minimum` (default 5) registers `minimum_length`
/// * `user.password.maximum` (default unset) registers `maximum_length`
/// * `user.password.reuse.track` (default 5) registers `reuse`
///
/// A value of `0` disables the corresponding validator; it is not registered at all.
pub fn build_password_validators(
    config: &dyn ConfigStore,
    translator: Arc<dyn Translator>,
    history: Arc<dyn PasswordHistory>,
) -> Result<ValidatorManager, ConfigError> {
    let minimum = read_threshold(config, PASSWORD_MINIMUM, Some(DEFAULT_PASSWORD_MINIMUM))?;
    let maximum = read_threshold(config, PASSWORD_MAXIMUM, None)?;
    let track = read_threshold(config, PASSWORD_REUSE_TRACK, Some(DEFAULT_PASSWORD_REUSE_TRACK))?;

    let bounds = LengthBounds { minimum, maximum };
    let mut manager = ValidatorManager::new();

    if let Some(minimum) = minimum {
        let mut validator = MinimumLengthValidator::new(minimum, Arc::clone(&translator));
        validator.set_requirement_string(ErrorCode::TooShort, bounds.requirement(Arc::clone(&translator)));
        validator.set_error_string(ErrorCode::TooShort, bounds.error(Arc::clone(&translator)));
        manager.set_validator(MINIMUM_LENGTH, Box::new(validator));
        tracing::debug!(minimum, "registered minimum length validator");
    }

    if let Some(maximum) = maximum {
        let mut validator = MaximumLengthValidator::new(maximum, Arc::clone(&translator));
        validator.set_requirement_string(ErrorCode::TooLong, bounds.requirement(Arc::clone(&translator)));
        validator.set_error_string(ErrorCode::TooLong, bounds.error(Arc::clone(&translator)));
        manager.set_validator(MAXIMUM_LENGTH, Box::new(validator));
        tracing::debug!(maximum, "registered maximum length validator");
    }

    if let Some(track) = track {
        let validator = ReuseValidator::new(track, history, Arc::clone(&translator));
        manager.set_validator(REUSE, Box::new(validator));
        tracing::debug!(track, "registered password reuse validator");
    }

    tracing::info!(validators = ?manager.names(), "password validators assembled");
    Ok(manager)
}

/// Owns the password validator manager for the lifetime of the application.
///
/// The manager is built from configuration on the first call to
/// [`PasswordValidatorProvider::manager`] and shared afterwards.
pub struct PasswordValidatorProvider {
    config: Arc<dyn ConfigStore>,
    translator: Arc<dyn Translator>,
    history: Arc<dyn PasswordHistory>,
    manager: OnceCell<ValidatorManager>,
}

impl PasswordValidatorProvider {
    pub fn new(
        config: Arc<dyn ConfigStore>,
        translator: Arc<dyn Translator>,
        history: Arc<dyn PasswordHistory>,
    ) -> Self {
        Self {
            config,
            translator,
            history,
            manager: OnceCell::new(),
        }
    }

    pub fn manager(&self) -> Result<&ValidatorManager, ConfigError> {
        self.manager.get_or_try_init(|| {
            build_password_validators(
                self.config.as_ref(),
                Arc::clone(&self.translator),
                Arc::clone(&self.history),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MemoryConfig, MockConfigStore};
    use crate::errors::ErrorCollection;
    use crate::test_helpers::*;
    use crate::translation::Untranslated;
    use crate::validation::reuse::{MockPasswordHistory, NoPasswordHistory};
    use uuid::Uuid;

    #[test]
    fn test_minimum_only() {
        let manager = build_manager(&password_config(8, 0, 0));

        assert_eq!(manager.names(), vec![MINIMUM_LENGTH]);
        let minimum = manager.validator(MINIMUM_LENGTH).unwrap();
        assert_eq!(minimum.threshold(), 8);

        let message = minimum.error_string(ErrorCode::TooShort, Some("short")).unwrap();
        assert!(message.contains("at least 8"));
        assert_eq!(message, "A password must be at least 8 characters long.");
    }

    #[test]
    fn test_minimum_and_maximum_share_messages() {
        let manager = build_manager(&password_config(5, 20, 0));

        assert!(manager.has_validator(MINIMUM_LENGTH));
        assert!(manager.has_validator(MAXIMUM_LENGTH));

        let too_short = manager
            .validator(MINIMUM_LENGTH)
            .and_then(|v| v.error_string(ErrorCode::TooShort, Some("abc")))
            .unwrap();
        let too_long = manager
            .validator(MAXIMUM_LENGTH)
            .and_then(|v| v.error_string(ErrorCode::TooLong, Some("abc")))
            .unwrap();

        assert_eq!(too_short, "A password must be between 5 and 20 characters long.");
        assert_eq!(too_long, too_short);
        assert_eq!(
            manager.requirement_strings(),
            vec!["Must be between 5 and 20 characters long.".to_string()]
        );
    }

    #[test]
    fn test_maximum_only() {
        let manager = build_manager(&password_config(0, 12, 0));

        assert_eq!(manager.names(), vec![MAXIMUM_LENGTH]);
        let mut errors = ErrorCollection::new();
        assert!(!manager.is_valid_for("thirteen char", None, &mut errors));
        assert_eq!(errors.list(), vec!["A password can be at most 12 characters long."]);
        assert_eq!(manager.requirement_strings(), vec!["Must be at most 12 characters long.".to_string()]);
    }

    #[test]
    fn test_everything_disabled() {
        let manager = build_manager(&password_config(0, 0, 0));

        assert!(manager.is_empty());
        assert!(!manager.has_validator(MINIMUM_LENGTH));
        assert!(!manager.has_validator(MAXIMUM_LENGTH));
        assert!(!manager.has_validator(REUSE));
    }

    #[test]
    fn test_defaults() {
        let manager = build_manager(&MemoryConfig::new());

        assert_eq!(manager.names(), vec![MINIMUM_LENGTH, REUSE]);
        assert_eq!(manager.validator(MINIMUM_LENGTH).map(|v| v.threshold()), Some(5));
        assert_eq!(manager.validator(REUSE).map(|v| v.threshold()), Some(5));
    }

    #[test]
    fn test_reuse_texts_are_fixed() {
        let manager = build_manager(&password_config(0, 0, 3));
        let reuse = manager.validator(REUSE).unwrap();

        assert_eq!(
            reuse.error_string(ErrorCode::RecentlyUsed, Some("x")).as_deref(),
            Some("You've recently used this password, please use a unique password.")
        );
        assert_eq!(
            manager.requirement_strings(),
            vec!["Must not have been recently used by this account.".to_string()]
        );
    }

    #[test]
    fn test_reuse_consults_history_for_subject() {
        let user_id = Uuid::new_v4();
        let mut history = MockPasswordHistory::new();
        history
            .expect_was_recently_used()
            .withf(|_subject: &Uuid, _password: &str, depth: &u32| *depth == 2)
            .returning(|_, password, _| password == "Repeat3d!");

        let manager = build_password_validators(
            &password_config(5, 0, 2),
            Arc::new(Untranslated),
            Arc::new(history),
        )
        .unwrap();

        let mut errors = ErrorCollection::new();
        assert!(!manager.is_valid_for("Repeat3d!", Some(&user_id), &mut errors));
        assert!(manager.is_valid_for("Fresh0ne!", Some(&user_id), &mut errors));
        assert_eq!(
            errors.list(),
            vec!["You've recently used this password, please use a unique password."]
        );
    }

    #[test]
    fn test_messages_go_through_translator() {
        let manager = build_password_validators(
            &password_config(6, 0, 0),
            Arc::new(UppercaseTranslator),
            Arc::new(NoPasswordHistory),
        )
        .unwrap();

        assert_eq!(
            manager.requirement_strings(),
            vec!["MUST BE AT LEAST 6 CHARACTERS LONG.".to_string()]
        );
    }

    #[test]
    fn test_malformed_config_is_reported() {
        let config = MemoryConfig::new().with(PASSWORD_MAXIMUM, "lots");
        let err = build_password_validators(&config, Arc::new(Untranslated), Arc::new(NoPasswordHistory))
            .unwrap_err();

        assert_eq!(err.key, PASSWORD_MAXIMUM);
    }

    #[test]
    fn test_length_bounds_fallbacks() {
        let bounds = LengthBounds::default();
        assert_eq!(bounds.error_message(&Untranslated), "Invalid password.");
        assert_eq!(bounds.requirement_message(&Untranslated), None);
    }

    #[test]
    fn test_provider_builds_once() {
        let mut config = MockConfigStore::new();
        // One read per setting, only on the first request
        config.expect_get().times(3).returning(|key| match key {
            PASSWORD_MINIMUM => Some("7".to_string()),
            _ => None,
        });

        let provider = PasswordValidatorProvider::new(
            Arc::new(config),
            Arc::new(Untranslated),
            Arc::new(NoPasswordHistory),
        );

        let first = provider.manager().unwrap();
        let second = provider.manager().unwrap();

        assert!(std::ptr::eq(first, second));
        assert_eq!(first.validator(MINIMUM_LENGTH).map(|v| v.threshold()), Some(7));
    }

    #[test]
    fn test_provider_retries_after_config_error() {
        let provider = PasswordValidatorProvider::new(
            Arc::new(MemoryConfig::new().with(PASSWORD_MINIMUM, "five")),
            Arc::new(Untranslated),
            Arc::new(NoPasswordHistory),
        );

        assert!(provider.manager().is_err());
        assert!(provider.manager().is_err());
    }
}
