use std::sync::Arc;

use super::validator::{ErrorCode, Message, MessageTable, PasswordValidator, Subject};
use crate::translation::Translator;

/// Lookup into the passwords an account has used before.
///
/// Comparing a candidate against stored password hashes is the implementor's
/// job; validators only ask the question.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHistory: Send + Sync {
    /// Whether `password` matches one of the last `depth` passwords of `subject`.
    fn was_recently_used(&self, subject: &Subject, password: &str, depth: u32) -> bool;
}

/// History for deployments that do not record previous passwords.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPasswordHistory;

impl PasswordHistory for NoPasswordHistory {
    fn was_recently_used(&self, _subject: &Subject, _password: &str, _depth: u32) -> bool {
        false
    }
}

/// Rejects any of the subject's last `max_reuse` passwords.
///
/// Without a subject there is no history to consult and every password passes.
pub struct ReuseValidator {
    max_reuse: u32,
    history: Arc<dyn PasswordHistory>,
    messages: MessageTable,
}

impl ReuseValidator {
    pub fn new(
        max_reuse: u32,
        history: Arc<dyn PasswordHistory>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        let mut messages = MessageTable::default();
        messages.set_error(
            ErrorCode::RecentlyUsed,
            Message::fixed(translator.translate(
                "You've recently used this password, please use a unique password.",
                &[],
            )),
        );
        messages.set_requirement(
            ErrorCode::RecentlyUsed,
            Message::fixed(translator.translate("Must not have been recently used by this account.", &[])),
        );

        Self {
            max_reuse,
            history,
            messages,
        }
    }

    pub fn max_reuse(&self) -> u32 {
        self.max_reuse
    }
}

impl PasswordValidator for ReuseValidator {
    fn threshold(&self) -> u32 {
        self.max_reuse
    }

    fn check(&self, password: &str, subject: Option<&Subject>) -> Result<(), ErrorCode> {
        let subject = match subject {
            Some(subject) => subject,
            None => return Ok(()),
        };

        if self.history.was_recently_used(subject, password, self.max_reuse) {
            tracing::debug!(%subject, depth = self.max_reuse, "password found in recent history");
            return Err(ErrorCode::RecentlyUsed);
        }
        Ok(())
    }

    fn messages(&self) -> &MessageTable {
        &self.messages
    }

    fn messages_mut(&mut self) -> &mut MessageTable {
        &mut self.messages
    }
}
