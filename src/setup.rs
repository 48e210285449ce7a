// src/setup.rs

use std::sync::Arc;

use services::config::EnvConfig;
use services::translation::Untranslated;
use services::validation::{NoPasswordHistory, PasswordValidatorProvider};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout only carries the rendered result.
/// `RUST_LOG` picks the filter, `LOG_FORMAT=json` switches to JSON lines.
pub(super) fn set_up_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let json = std::env::var("LOG_FORMAT").map(|f| f == "json").unwrap_or(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

pub(super) fn set_up_validators() -> PasswordValidatorProvider {
    PasswordValidatorProvider::new(
        Arc::new(EnvConfig),
        Arc::new(Untranslated),
        Arc::new(NoPasswordHistory),
    )
}
