use std::collections::HashMap;
use std::fmt;

pub const PASSWORD_MINIMUM: &str = "user.password.minimum";
pub const PASSWORD_MAXIMUM: &str = "user.password.maximum";
pub const PASSWORD_REUSE_TRACK: &str = "user.password.reuse.track";

pub const DEFAULT_PASSWORD_MINIMUM: u32 = 5;
pub const DEFAULT_PASSWORD_REUSE_TRACK: u32 = 5;

const ENV_PREFIX: &str = "CCM";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: String,
    pub message: String,
}

impl ConfigError {
    fn new(key: &str, message: String) -> Self {
        ConfigError {
            key: key.to_string(),
            message,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: {}", self.key, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Read access to dotted configuration keys such as `user.password.minimum`.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigStore: Send + Sync {
    /// Raw value for `key`, or `None` when the key is not configured at all.
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads a numeric threshold.
///
/// # Returns
/// * `Ok(Some(n))` for a configured non-zero value, or the default when the key is absent
/// * `Ok(None)` when the value is falsy (`0` or empty), meaning the feature is disabled
/// * `Err(ConfigError)` when the value is not a non-negative integer
pub fn read_threshold(
    store: &dyn ConfigStore,
    key: &str,
    default: Option<u32>,
) -> Result<Option<u32>, ConfigError> {
    let raw = match store.get(key) {
        Some(raw) => raw,
        None => return Ok(default.filter(|v| *v != 0)),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<u32>() {
        Ok(0) => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, value = trimmed, "rejecting non-numeric config value");
            Err(ConfigError::new(key, format!("{:?} is not a non-negative integer ({})", trimmed, e)))
        }
    }
}

/// Configuration backed by process environment variables.
///
/// `user.password.minimum` is looked up as `CCM_USER_PASSWORD_MINIMUM`.
#[derive(Clone, Default)]
pub struct EnvConfig;

impl EnvConfig {
    pub fn variable_name(key: &str) -> String {
        format!("{}_{}", ENV_PREFIX, key.replace('.', "_").to_uppercase())
    }
}

impl ConfigStore for EnvConfig {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(Self::variable_name(key)).ok()
    }
}

#[derive(Clone, Default, Debug)]
pub struct MemoryConfig {
    values: HashMap<String, String>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl ToString) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

impl ConfigStore for MemoryConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
