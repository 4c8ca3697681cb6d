use std::fs;

use formcraft_usecases::export::export;
use formcraft_usecases::{RepositoryError, UseCaseError};

use crate::cli::{ExportArgs, GlobalOpts};
use crate::commands::{load_schema, open_repository};
use crate::config::{load_config, resolve_store_dir};
use crate::error::CliError;
use crate::output::OutputContext;
use crate::progress;

pub async fn run(args: ExportArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let schema = load_schema(&repo, &args.schema).await?;

    let result = export(&schema)?;
    let json = serde_json::to_string_pretty(&result.json)
        .map_err(|e| CliError::Other(format!("failed to serialize export: {e}")))?;

    match &args.output {
        Some(path) => {
            if path.exists() {
                return Err(UseCaseError::Repository(RepositoryError::FileAlreadyExists {
                    path: path.display().to_string(),
                })
                .into());
            }
            let spinner = output
                .show_progress()
                .then(|| progress::create_spinner(&format!("writing {}", path.display())));
            let write_result = fs::write(path, &json);
            match (&spinner, &write_result) {
                (Some(pb), Ok(())) => progress::finish_spinner(pb, "wrote export file"),
                (Some(pb), Err(e)) => progress::finish_spinner_error(pb, &e.to_string()),
                (None, _) => {}
            }
            write_result.map_err(|e| CliError::Io {
                path: path.clone(),
                source: e,
            })?;
            output.success(&format!("Exported '{}' to {}", args.schema, path.display()));
        }
        None => println!("{json}"),
    }

    if !result.warnings.is_empty() {
        for entity_id in &result.warnings.empty_entities {
            output.warn(&format!("entity '{entity_id}' has no fields"));
        }
        for (entity_id, field_id) in &result.warnings.fields_without_help_text {
            output.warn(&format!("field '{entity_id}.{field_id}' has no help text"));
        }
        if result.warnings.excluded_formulas > 0 {
            output.warn(&format!("{} formula(s) excluded from export", result.warnings.excluded_formulas));
        }
        if result.warnings.excluded_lookup_references > 0 {
            output.warn(&format!(
                "{} lookup reference(s) excluded from export",
                result.warnings.excluded_lookup_references
            ));
        }
        if result.warnings.excluded_table_children > 0 {
            output.warn(&format!(
                "{} table child reference(s) excluded from export",
                result.warnings.excluded_table_children
            ));
        }
    }

    Ok(())
}
