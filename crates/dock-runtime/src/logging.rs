//! `tracing` subscriber setup for `dockctl` and embedding hosts.

use tracing_subscriber::EnvFilter;

use crate::config::RuntimeConfig;
use crate::error::{DockError, Result};

/// Environment variable whose directives override `log_filter`.
pub const LOG_ENV: &str = "DOCK_LOG";

/// Pick the filter directives: a non-blank `DOCK_LOG` wins over the config.
#[must_use]
pub fn resolve_filter(env_value: Option<&str>, configured: &str) -> String {
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_owned(),
        _ => configured.to_owned(),
    }
}

/// Install a global `fmt` subscriber writing to stderr.
///
/// Fails if the directives do not parse or a global subscriber is already
/// installed.
pub fn init(config: &RuntimeConfig) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let directives = resolve_filter(env_value.as_deref(), &config.log_filter);
    let filter = EnvFilter::try_new(&directives).map_err(|err| DockError::Logging {
        message: format!("invalid filter {directives:?}: {err}"),
    })?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    let installed = if config.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| DockError::Logging {
        message: err.to_string(),
    })
}
