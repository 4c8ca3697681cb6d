pub mod compare;
pub mod completions;
pub mod constraint;
pub mod entity;
pub mod export;
pub mod field;
pub mod formula;
pub mod import;
pub mod init;
pub mod mapping;
pub mod option;
pub mod relationship;
pub mod rule;

use std::path::Path;

use serde::de::DeserializeOwned;

use formcraft_core::{Schema, SchemaError};
use formcraft_fsrepo::FsSchemaRepository;
use formcraft_usecases::{OperationResult, RepositoryError, SchemaRepository, UseCaseError};

use crate::error::CliError;

/// Opens the filesystem-backed schema store, provisioning it if absent.
pub fn open_repository(store_dir: &Path) -> Result<FsSchemaRepository, CliError> {
    FsSchemaRepository::new(store_dir).map_err(CliError::from)
}

/// Loads a schema by id, mapping "doesn't exist" to `CliError::SchemaNotFound`.
pub async fn load_schema(repo: &FsSchemaRepository, schema_id: &str) -> Result<Schema, CliError> {
    match repo.get_by_id(schema_id).await {
        Ok(schema) => Ok(schema),
        Err(RepositoryError::FileNotFound { .. }) => Err(CliError::SchemaNotFound {
            name: schema_id.to_string(),
        }),
        Err(e) => Err(CliError::from(e)),
    }
}

pub async fn save_schema(repo: &FsSchemaRepository, schema: &Schema) -> Result<(), CliError> {
    repo.save(schema).await.map_err(CliError::from)
}

/// Lifts an opaque-id constructor's `SchemaError` into `CliError` via
/// `UseCaseError::Invariant`, so a malformed id on the command line reports
/// the same way a use-case-level invariant violation does.
pub fn parse_id<T>(result: Result<T, SchemaError>) -> Result<T, CliError> {
    result.map_err(|e| CliError::from(UseCaseError::from(e)))
}

/// Presentation boundary (spec §7): every use-case mutation result is
/// unwrapped into an `OperationResult` before becoming a `CliError` for
/// the rest of the command pipeline. `T` stays `Clone` so the original
/// error variant (and its `CliError::exit_code()`) survives the
/// round trip through `OperationResult`'s stringified `error_message`.
pub fn finish<T: Clone + std::fmt::Debug>(result: Result<T, UseCaseError>) -> Result<T, CliError> {
    let outcome: OperationResult<T> = result.clone().into();
    if outcome.success {
        Ok(outcome.value.expect("success implies a value"))
    } else {
        Err(CliError::UseCase(result.expect_err("failure implies an error")))
    }
}

/// Parses a user-supplied token against one of serde's case-rename
/// conventions by round-tripping it through a quoted JSON string, reusing
/// each enum's own `Deserialize` impl instead of a bespoke parser per type.
pub fn parse_tagged<T: DeserializeOwned>(raw: &str, type_name: &str) -> Result<T, CliError> {
    for candidate in [raw.to_string(), raw.to_uppercase(), raw.to_lowercase()] {
        if let Ok(value) = serde_json::from_value(serde_json::Value::String(candidate)) {
            return Ok(value);
        }
    }
    Err(CliError::Other(format!("invalid {type_name} '{raw}'")))
}
