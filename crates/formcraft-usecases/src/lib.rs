//! Use-case layer: everything that needs a whole-schema view to enforce
//! an invariant the entity aggregate can't check on its own (spec §4.7
//! -§4.13), plus the repository and translation-service contracts the
//! CLI and view-model layers depend on.
//!
//! Nothing here touches a filesystem or database directly --
//! `formcraft-fsrepo` is the concrete `SchemaRepository`.

pub mod bootstrap;
pub mod compare;
pub mod constraints;
pub mod dependencies;
pub mod entity_usecases;
pub mod error;
pub mod export;
pub mod formula_context;
pub mod import;
pub mod operation_result;
pub mod traits;

pub use error::{Location, RepositoryError, UseCaseError};
pub use operation_result::OperationResult;
pub use traits::{IdentityTranslator, SchemaRepository, Translator};
