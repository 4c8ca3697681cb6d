//! The user-facing error taxonomy (spec §7).

use std::fmt;

use formcraft_core::SchemaError;

/// Infrastructure-level failures from a repository implementation.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum RepositoryError {
    FileNotFound { path: String },
    FileRead { path: String, message: String },
    JsonSyntax { path: String, message: String },
    FileAlreadyExists { path: String },
    EntityNotFound { entity_id: String },
    Other { message: String },
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound { path } => write!(f, "file not found: {path}"),
            Self::FileRead { path, message } => write!(f, "failed to read {path}: {message}"),
            Self::JsonSyntax { path, message } => write!(f, "invalid JSON in {path}: {message}"),
            Self::FileAlreadyExists { path } => write!(f, "file already exists: {path}"),
            Self::EntityNotFound { entity_id } => write!(f, "no entity with id '{entity_id}'"),
            Self::Other { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// A validation error location, e.g.
/// `entities[3].fields[1].constraints[0].parameters.min_length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location(pub String);

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum UseCaseError {
    // Validation errors (user-facing).
    InvalidValue { location: Location, message: String },
    InvalidType { location: Location, message: String },
    MissingRequired { location: Location },
    InvalidReference { location: Location, message: String },
    UnknownConstraint { location: Location, constraint_type: String },
    UnknownRuleType { location: Location, rule_type: String },
    ControlRuleInvalid { location: Location, message: String },
    OutputMappingInvalid { location: Location, message: String },

    // Invariant violations, delegated from the entity aggregate.
    Invariant(SchemaError),

    // Dependency errors.
    CannotDelete {
        location: Location,
        referring: Vec<(String, Option<String>)>,
    },

    // Infrastructure errors.
    Repository(RepositoryError),
}

impl From<SchemaError> for UseCaseError {
    fn from(value: SchemaError) -> Self {
        Self::Invariant(value)
    }
}

impl From<RepositoryError> for UseCaseError {
    fn from(value: RepositoryError) -> Self {
        Self::Repository(value)
    }
}

impl fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { location, message } => write!(f, "{location}: invalid value: {message}"),
            Self::InvalidType { location, message } => write!(f, "{location}: invalid type: {message}"),
            Self::MissingRequired { location } => write!(f, "{location}: missing required value"),
            Self::InvalidReference { location, message } => {
                write!(f, "{location}: invalid reference: {message}")
            }
            Self::UnknownConstraint { location, constraint_type } => {
                write!(f, "{location}: unknown constraint type '{constraint_type}'")
            }
            Self::UnknownRuleType { location, rule_type } => {
                write!(f, "{location}: unknown rule type '{rule_type}'")
            }
            Self::ControlRuleInvalid { location, message } => {
                write!(f, "{location}: control rule invalid: {message}")
            }
            Self::OutputMappingInvalid { location, message } => {
                write!(f, "{location}: output mapping invalid: {message}")
            }
            Self::Invariant(e) => write!(f, "{e}"),
            Self::CannotDelete { location, referring } => {
                let list: Vec<String> = referring
                    .iter()
                    .map(|(entity_id, field_id)| match field_id {
                        Some(field_id) => format!("({entity_id}, {field_id})"),
                        None => entity_id.clone(),
                    })
                    .collect();
                write!(
                    f,
                    "{location}: cannot delete: referenced by {}",
                    list.join(", ")
                )
            }
            Self::Repository(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for UseCaseError {}
