use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::errors::ErrorCollection;

/// The account a password is checked for.
pub type Subject = Uuid;

/// Failure modes reported by password validators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Fewer characters than the configured minimum
    TooShort,
    /// More characters than the configured maximum
    TooLong,
    /// One of the account's recent passwords
    RecentlyUsed,
}

pub type MessageFormatter = Arc<dyn Fn(ErrorCode, Option<&str>) -> Option<String> + Send + Sync>;

/// An error or requirement text, either fixed or produced when it is requested.
///
/// Formatters receive the error code and, for error strings, the rejected value.
#[derive(Clone)]
pub enum Message {
    Fixed(String),
    Formatted(MessageFormatter),
}

impl Message {
    pub fn fixed(text: impl Into<String>) -> Self {
        Message::Fixed(text.into())
    }

    pub fn formatted<F>(formatter: F) -> Self
    where
        F: Fn(ErrorCode, Option<&str>) -> Option<String> + Send + Sync + 'static,
    {
        Message::Formatted(Arc::new(formatter))
    }

    pub fn render(&self, code: ErrorCode, value: Option<&str>) -> Option<String> {
        match self {
            Message::Fixed(text) => Some(text.clone()),
            Message::Formatted(formatter) => formatter(code, value),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Fixed(text) => f.debug_tuple("Fixed").field(text).finish(),
            Message::Formatted(_) => f.write_str("Formatted(..)"),
        }
    }
}

/// Error and requirement texts of one validator, keyed by error code.
#[derive(Clone, Debug, Default)]
pub struct MessageTable {
    errors: Vec<(ErrorCode, Message)>,
    requirements: Vec<(ErrorCode, Message)>,
}

impl MessageTable {
    pub fn set_error(&mut self, code: ErrorCode, message: Message) {
        upsert(&mut self.errors, code, message);
    }

    pub fn set_requirement(&mut self, code: ErrorCode, message: Message) {
        upsert(&mut self.requirements, code, message);
    }

    pub fn error(&self, code: ErrorCode, value: Option<&str>) -> Option<String> {
        self.errors
            .iter()
            .find(|(c, _)| *c == code)
            .and_then(|(c, message)| message.render(*c, value))
    }

    /// Requirement texts in the order they were first set; formatters that
    /// produce nothing are skipped.
    pub fn requirements(&self) -> Vec<(ErrorCode, String)> {
        self.requirements
            .iter()
            .filter_map(|(code, message)| message.render(*code, None).map(|text| (*code, text)))
            .collect()
    }
}

fn upsert(entries: &mut Vec<(ErrorCode, Message)>, code: ErrorCode, message: Message) {
    match entries.iter_mut().find(|(c, _)| *c == code) {
        Some(entry) => entry.1 = message,
        None => entries.push((code, message)),
    }
}

/// One password acceptability rule together with its user-facing texts.
pub trait PasswordValidator: Send + Sync {
    /// The configured limit: a length or a number of remembered passwords.
    fn threshold(&self) -> u32;

    fn check(&self, password: &str, subject: Option<&Subject>) -> Result<(), ErrorCode>;

    fn messages(&self) -> &MessageTable;

    fn messages_mut(&mut self) -> &mut MessageTable;

    fn set_error_string(&mut self, code: ErrorCode, message: Message) {
        self.messages_mut().set_error(code, message);
    }

    fn set_requirement_string(&mut self, code: ErrorCode, message: Message) {
        self.messages_mut().set_requirement(code, message);
    }

    fn error_string(&self, code: ErrorCode, password: Option<&str>) -> Option<String> {
        self.messages().error(code, password)
    }

    fn requirement_strings(&self) -> Vec<(ErrorCode, String)> {
        self.messages().requirements()
    }

    /// Checks `password` and, on failure, adds the error text to `errors`.
    fn is_valid_for(
        &self,
        password: &str,
        subject: Option<&Subject>,
        errors: Option<&mut ErrorCollection>,
    ) -> bool {
        match self.check(password, subject) {
            Ok(()) => true,
            Err(code) => {
                if let Some(errors) = errors {
                    if let Some(message) = self.error_string(code, Some(password)) {
                        errors.add(message);
                    }
                }
                false
            }
        }
    }
}
