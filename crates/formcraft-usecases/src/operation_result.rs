//! The presentation-boundary wrapper from spec §7: every use-case result
//! is unwrapped into this shape before it reaches a view-model or CLI
//! command. IDs are plain strings here; the typed newtypes stay inside
//! the use-case layer.

use std::fmt;

use crate::error::UseCaseError;

#[derive(Debug, Clone, PartialEq)]
pub struct OperationResult<T> {
    pub success: bool,
    pub value: Option<T>,
    pub error_message: Option<String>,
}

impl<T> OperationResult<T> {
    pub fn ok(value: T) -> Self {
        Self {
            success: true,
            value: Some(value),
            error_message: None,
        }
    }

    pub fn err(error: impl fmt::Display) -> Self {
        Self {
            success: false,
            value: None,
            error_message: Some(error.to_string()),
        }
    }
}

impl<T> From<Result<T, UseCaseError>> for OperationResult<T> {
    fn from(result: Result<T, UseCaseError>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(e) => Self::err(e),
        }
    }
}
