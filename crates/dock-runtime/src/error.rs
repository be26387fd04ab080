use std::path::PathBuf;

use dock_layout::LayoutError;
use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, DockError>;

#[derive(Debug, Error)]
pub enum DockError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("required path does not exist: {path}")]
    MissingPath { path: PathBuf },

    #[error("script line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("failed to initialize logging: {message}")]
    Logging { message: String },

    #[error("{message}")]
    Exit { code: i32, message: String },
}

impl DockError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exit { code, .. } => *code,
            Self::Config(_) => 2,
            Self::Script { .. } => 65,
            _ => 1,
        }
    }

    #[must_use]
    pub fn exit(code: i32, message: impl Into<String>) -> Self {
        Self::Exit {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn script(line: usize, message: impl Into<String>) -> Self {
        Self::Script {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DockError;
    use crate::config::ConfigError;

    #[test]
    fn exit_constructor_preserves_code_and_message() {
        let error = DockError::exit(42, "boom");
        assert_eq!(error.exit_code(), 42);
        assert_eq!(error.to_string(), "boom");
    }

    #[test]
    fn config_and_script_errors_have_distinct_codes() {
        let config = DockError::from(ConfigError::Validation(vec!["bad".into()]));
        assert_eq!(config.exit_code(), 2);
        assert_eq!(config.to_string(), "config error: validation errors: bad");

        let script = DockError::script(3, "unknown event");
        assert_eq!(script.exit_code(), 65);
        assert_eq!(script.to_string(), "script line 3: unknown event");
    }
}
