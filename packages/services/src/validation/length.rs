use std::sync::Arc;

use super::validator::{ErrorCode, Message, MessageTable, PasswordValidator, Subject};
use crate::translation::Translator;

fn char_count(value: &str) -> u64 {
    value.chars().count() as u64
}

/// Rejects passwords with fewer than `minimum_length` characters.
pub struct MinimumLengthValidator {
    minimum_length: u32,
    messages: MessageTable,
}

impl MinimumLengthValidator {
    pub fn new(minimum_length: u32, translator: Arc<dyn Translator>) -> Self {
        let mut messages = MessageTable::default();
        let requirement_translator = Arc::clone(&translator);
        messages.set_requirement(
            ErrorCode::TooShort,
            Message::formatted(move |_, _| {
                Some(requirement_translator.translate(
                    "Must be at least %s characters long.",
                    &[minimum_length.to_string()],
                ))
            }),
        );
        messages.set_error(
            ErrorCode::TooShort,
            Message::formatted(move |_, _| {
                Some(translator.translate(
                    "A password must be at least %s characters long.",
                    &[minimum_length.to_string()],
                ))
            }),
        );

        Self {
            minimum_length,
            messages,
        }
    }

    pub fn minimum_length(&self) -> u32 {
        self.minimum_length
    }
}

impl PasswordValidator for MinimumLengthValidator {
    fn threshold(&self) -> u32 {
        self.minimum_length
    }

    fn check(&self, password: &str, _subject: Option<&Subject>) -> Result<(), ErrorCode> {
        if char_count(password) < u64::from(self.minimum_length) {
            return Err(ErrorCode::TooShort);
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

/// Rejects passwords with more than `maximum_length` characters.
pub struct MaximumLengthValidator {
    maximum_length: u32,
    messages: MessageTable,
}

impl MaximumLengthValidator {
    pub fn new(maximum_length: u32, translator: Arc<dyn Translator>) -> Self {
        let mut messages = MessageTable::default();
        let requirement_translator = Arc::clone(&translator);
        messages.set_requirement(
            ErrorCode::TooLong,
            Message::formatted(move |_, _| {
                Some(requirement_translator.translate(
                    "Must be at most %s characters long.",
                    &[maximum_length.to_string()],
                ))
            }),
        );
        messages.set_error(
            ErrorCode::TooLong,
            Message::formatted(move |_, _| {
                Some(translator.translate(
                    "A password can be at most %s characters long.",
                    &[maximum_length.to_string()],
                ))
            }),
        );

        Self {
            maximum_length,
            messages,
        }
    }

    pub fn maximum_length(&self) -> u32 {
        self.maximum_length
    }
}

impl PasswordValidator for MaximumLengthValidator {
    fn threshold(&self) -> u32 {
        self.maximum_length
    }

    fn check(&self, password: &str, _subject: Option<&Subject>) -> Result<(), ErrorCode> {
        if char_count(password) > u64::from(self.maximum_length) {
            return Err(ErrorCode::TooLong);
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
