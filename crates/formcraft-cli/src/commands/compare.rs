use formcraft_usecases::compare::compare;

use crate::cli::{CompareArgs, GlobalOpts};
use crate::commands::{load_schema, open_repository};
use crate::config::{load_config, resolve_store_dir};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

pub async fn run(args: CompareArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;

    let source = load_schema(&repo, &args.source).await?;
    let target = load_schema(&repo, &args.target).await?;

    let result = compare(&source, &target);

    match output.mode {
        OutputMode::Human | OutputMode::Plain => {
            for change in &result.changes {
                println!("{change}");
            }
            println!("compatibility: {}", result.compatibility);
            if let Some(version) = &result.suggested_version {
                println!("suggested version: {version}");
            }
        }
        OutputMode::Json => {
            output.print_json(&serde_json::json!({
                "changes": result.changes.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
                "compatibility": result.compatibility.to_string(),
                "suggested_version": result.suggested_version.as_ref().map(|v| v.to_string()),
            }));
        }
    }

    Ok(())
}
