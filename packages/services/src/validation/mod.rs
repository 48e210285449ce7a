pub mod length;
pub mod manager;
pub mod password;
pub mod reuse;
pub mod validator;

// Re-export common types and functions
pub use length::{MaximumLengthValidator, MinimumLengthValidator};
pub use manager::ValidatorManager;
pub use password::{build_password_validators, LengthBounds, PasswordValidatorProvider};
pub use reuse::{NoPasswordHistory, PasswordHistory, ReuseValidator};
pub use validator::{ErrorCode, Message, MessageTable, PasswordValidator, Subject};
