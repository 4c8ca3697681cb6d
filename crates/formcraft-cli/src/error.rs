use std::path::PathBuf;

use formcraft_usecases::{RepositoryError, UseCaseError};

/// Exit codes for the CLI process.
///
/// Each variant maps to a numeric exit code following standard conventions:
/// - 0: success
/// - 1: general error
/// - 2: invalid arguments / usage error
/// - 3: schema validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    ValidationError = 3,
}

/// Errors returned by CLI command handlers.
///
/// Each variant maps to an `ExitCode` and can produce structured output in
/// JSON mode.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Use-case layer rejected the operation: an invariant, a governance
    /// rule, or a reference to something that doesn't exist.
    #[error("{0}")]
    UseCase(#[from] UseCaseError),

    /// Repository-level failure surfaced outside a use-case call, e.g.
    /// `export`/`import` reading a file directly.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// IO errors (file not found, permission denied).
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// User cancelled operation.
    #[error("operation cancelled")]
    Cancelled,

    /// Schema not found in the store.
    #[error("schema '{name}' not found")]
    SchemaNotFound { name: String },

    /// Directory already exists (init without --force).
    #[error("directory '{path}' already exists (use --force to overwrite)")]
    DirectoryExists { path: PathBuf },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Maps this error to the appropriate exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::UseCase(_) => ExitCode::ValidationError,
            Self::Config { .. } => ExitCode::InvalidArguments,
            Self::Repository(_)
            | Self::Io { .. }
            | Self::Cancelled
            | Self::SchemaNotFound { .. }
            | Self::DirectoryExists { .. }
            | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Serializes this error as a JSON value for `--format json` output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::UseCase(e) => serde_json::json!({
                "error": "validation_error",
                "message": e.to_string(),
            }),
            Self::Repository(e) => serde_json::json!({
                "error": "repository_error",
                "message": e.to_string(),
            }),
            Self::Io { path, source } => serde_json::json!({
                "error": "io_error",
                "path": path.display().to_string(),
                "message": source.to_string(),
            }),
            Self::Config { message } => serde_json::json!({
                "error": "config_error",
                "message": message,
            }),
            other => serde_json::json!({
                "error": "error",
                "message": other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_usecases::Location;

    #[test]
    fn use_case_error_exit_code() {
        let err = CliError::UseCase(UseCaseError::MissingRequired {
            location: Location("schema_id".into()),
        });
        assert_eq!(err.exit_code(), ExitCode::ValidationError);
    }

    #[test]
    fn config_error_exit_code() {
        let err = CliError::Config {
            message: "bad config".into(),
        };
        assert_eq!(err.exit_code(), ExitCode::InvalidArguments);
    }

    #[test]
    fn cancelled_exit_code() {
        let err = CliError::Cancelled;
        assert_eq!(err.exit_code(), ExitCode::GeneralError);
    }

    #[test]
    fn display_directory_exists() {
        let err = CliError::DirectoryExists {
            path: PathBuf::from("my-store"),
        };
        assert!(err.to_string().contains("my-store"));
        assert!(err.to_string().contains("--force"));
    }

    #[test]
    fn to_json_use_case_error() {
        let err = CliError::UseCase(UseCaseError::MissingRequired {
            location: Location("schema_id".into()),
        });
        let json = err.to_json();
        assert_eq!(json["error"], "validation_error");
    }

    #[test]
    fn to_json_io_error() {
        let err = CliError::Io {
            path: PathBuf::from("/tmp/file"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let json = err.to_json();
        assert_eq!(json["error"], "io_error");
        assert_eq!(json["path"], "/tmp/file");
    }

    #[test]
    fn exit_code_values() {
        assert_eq!(ExitCode::Success as i32, 0);
        assert_eq!(ExitCode::GeneralError as i32, 1);
        assert_eq!(ExitCode::InvalidArguments as i32, 2);
        assert_eq!(ExitCode::ValidationError as i32, 3);
    }
}
