//! A `SchemaRepository` backed by one JSON file per schema in a directory.
//!
//! Mirrors the plain `std::fs` + `serde_json` style the CLI scaffolding
//! already uses for its own config and project files: no database, no
//! locking beyond what the filesystem gives for free. Fine for a single
//! CLI process; concurrent writers can race (spec §5 leaves that to the
//! caller).

use std::fs;
use std::path::{Path, PathBuf};

use formcraft_core::Schema;
use formcraft_usecases::{RepositoryError, SchemaRepository};

/// Idempotently provisions `root` as a schema store: creates it (and any
/// missing parents) if absent, leaves an existing directory -- empty or
/// not -- untouched.
pub fn bootstrap(root: &Path) -> Result<(), RepositoryError> {
    fs::create_dir_all(root).map_err(|e| RepositoryError::Other {
        message: format!("failed to create {}: {e}", root.display()),
    })
}

/// Filesystem-backed `SchemaRepository`: `<root>/<schema_id>.json`.
pub struct FsSchemaRepository {
    root: PathBuf,
}

impl FsSchemaRepository {
    /// Opens `root` as a schema store, provisioning it if it doesn't
    /// exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let root = root.into();
        bootstrap(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, schema_id: &str) -> PathBuf {
        self.root.join(format!("{schema_id}.json"))
    }

    fn read_schema(&self, path: &Path) -> Result<Schema, RepositoryError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RepositoryError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                RepositoryError::FileRead {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })?;
        serde_json::from_str(&contents).map_err(|e| RepositoryError::JsonSyntax {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl SchemaRepository for FsSchemaRepository {
    async fn exists(&self, schema_id: &str) -> bool {
        self.path_for(schema_id).exists()
    }

    async fn get_by_id(&self, schema_id: &str) -> Result<Schema, RepositoryError> {
        self.read_schema(&self.path_for(schema_id))
    }

    async fn get_all(&self) -> Result<Vec<Schema>, RepositoryError> {
        let entries = fs::read_dir(&self.root).map_err(|e| RepositoryError::Other {
            message: format!("failed to read {}: {e}", self.root.display()),
        })?;

        let mut schemas = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RepositoryError::Other {
                message: e.to_string(),
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            schemas.push(self.read_schema(&path)?);
        }
        Ok(schemas)
    }

    async fn save(&self, schema: &Schema) -> Result<(), RepositoryError> {
        let path = self.path_for(&schema.schema_id);
        let json = serde_json::to_string_pretty(schema).map_err(|e| RepositoryError::Other {
            message: format!("failed to serialize schema: {e}"),
        })?;
        fs::write(&path, json).map_err(|e| RepositoryError::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(schema_id = %schema.schema_id, path = %path.display(), "schema saved");
        Ok(())
    }

    async fn delete(&self, schema_id: &str) -> Result<(), RepositoryError> {
        let path = self.path_for(schema_id);
        fs::remove_file(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RepositoryError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                RepositoryError::FileRead {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_core::{Entity, EntityId, TranslationKey};

    fn sample_schema(id: &str) -> Schema {
        let mut schema = Schema::new(id);
        schema
            .add_entity(Entity::new(
                EntityId::new("contact").unwrap(),
                TranslationKey::new("contact.label").unwrap(),
                true,
            ))
            .unwrap();
        schema
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent_on_existing_nonempty_store() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsSchemaRepository::new(dir.path()).unwrap();
        repo.save(&sample_schema("onboarding")).await.unwrap();

        // Re-opening the same root must not disturb what's already there.
        let repo2 = FsSchemaRepository::new(dir.path()).unwrap();
        assert!(repo2.exists("onboarding").await);
    }

    #[tokio::test]
    async fn save_then_get_by_id_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsSchemaRepository::new(dir.path()).unwrap();
        let schema = sample_schema("onboarding");
        repo.save(&schema).await.unwrap();

        let loaded = repo.get_by_id("onboarding").await.unwrap();
        assert_eq!(loaded, schema);
    }

    #[tokio::test]
    async fn get_by_id_missing_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsSchemaRepository::new(dir.path()).unwrap();
        let err = repo.get_by_id("nope").await.unwrap_err();
        assert!(matches!(err, RepositoryError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn get_all_collects_every_stored_schema() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsSchemaRepository::new(dir.path()).unwrap();
        repo.save(&sample_schema("a")).await.unwrap();
        repo.save(&sample_schema("b")).await.unwrap();

        let mut ids: Vec<String> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.schema_id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn delete_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsSchemaRepository::new(dir.path()).unwrap();
        repo.save(&sample_schema("onboarding")).await.unwrap();
        repo.delete("onboarding").await.unwrap();
        assert!(!repo.exists("onboarding").await);
    }

    #[tokio::test]
    async fn corrupt_json_surfaces_as_syntax_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        let repo = FsSchemaRepository::new(dir.path()).unwrap();
        let err = repo.get_by_id("broken").await.unwrap_err();
        assert!(matches!(err, RepositoryError::JsonSyntax { .. }));
    }
}
