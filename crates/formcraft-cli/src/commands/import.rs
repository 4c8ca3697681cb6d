use std::fs;

use formcraft_usecases::import::import_schema;
use formcraft_usecases::SchemaRepository;

use crate::cli::{GlobalOpts, ImportArgs};
use crate::commands::{open_repository, save_schema};
use crate::config::{load_config, resolve_store_dir};
use crate::error::CliError;
use crate::output::OutputContext;
use crate::progress;

pub async fn run(args: ImportArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;

    let spinner = output
        .show_progress()
        .then(|| progress::create_spinner(&format!("reading {}", args.file.display())));
    let raw_result = fs::read_to_string(&args.file);
    match (&spinner, &raw_result) {
        (Some(pb), Ok(_)) => progress::finish_spinner(pb, "read import file"),
        (Some(pb), Err(e)) => progress::finish_spinner_error(pb, &e.to_string()),
        (None, _) => {}
    }
    let raw = raw_result.map_err(|e| CliError::Io {
        path: args.file.clone(),
        source: e,
    })?;

    let result = import_schema(&raw).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        CliError::Other(format!("import failed:\n  {}", messages.join("\n  ")))
    })?;

    if repo.exists(&result.schema.schema_id).await && !args.force {
        return Err(CliError::Other(format!(
            "schema '{}' already exists (use --force to overwrite)",
            result.schema.schema_id
        )));
    }

    for entity_id in &result.warnings.empty_entities {
        output.warn(&format!("entity '{entity_id}' has no fields"));
    }

    save_schema(&repo, &result.schema).await?;
    output.success(&format!("Imported schema '{}'", result.schema.schema_id));

    Ok(())
}
