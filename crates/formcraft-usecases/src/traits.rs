//! The repository and translation-service contracts (spec §6).
//!
//! Concrete storage (`formcraft-fsrepo`) and concrete translation lookups
//! live behind these traits; everything in this crate is storage-agnostic.

use std::future::Future;

use formcraft_core::Schema;

use crate::error::RepositoryError;

/// Persists and loads whole `Schema` snapshots.
///
/// Every use-case in this crate follows load -> check -> mutate -> save:
/// exactly one `get_by_id` and, on success, exactly one `save` per
/// operation. Implementations are not required to support concurrent
/// writers; spec §5 leaves that to the caller.
pub trait SchemaRepository {
    fn exists(&self, schema_id: &str) -> impl Future<Output = bool> + Send;

    fn get_by_id(
        &self,
        schema_id: &str,
    ) -> impl Future<Output = Result<Schema, RepositoryError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<Schema>, RepositoryError>> + Send;

    fn save(&self, schema: &Schema) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn delete(&self, schema_id: &str) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Resolves a translation key to display text in the caller's active
/// locale. Kept abstract: schemas only ever carry keys, never literal
/// display strings (spec §3, invariant 8).
pub trait Translator {
    fn translate(&self, key: &str) -> String;
}

/// A translator that echoes the key back, for contexts with no locale
/// catalog wired up yet (CLI scaffolding, tests).
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}
