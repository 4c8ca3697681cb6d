use formcraft_core::EntityId;
use formcraft_usecases::formula_context::validate_calculated_formula;

use crate::cli::{FormulaCommands, FormulaValidateArgs, GlobalOpts};
use crate::commands::{load_schema, open_repository, parse_id};
use crate::config::{load_config, resolve_store_dir};
use crate::diagnostic::render_diagnostics;
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

pub async fn run(command: FormulaCommands, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    match command {
        FormulaCommands::Validate(args) => validate(args, global, output).await,
    }
}

async fn validate(args: FormulaValidateArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let schema = load_schema(&repo, &args.schema).await?;

    let entity_id = parse_id(EntityId::new(&args.entity))?;
    let entity = schema.entity(&entity_id).ok_or_else(|| {
        CliError::Other(format!("no entity '{}' in schema '{}'", args.entity, args.schema))
    })?;

    if let Err(errors) = formcraft_formula::parser::parse(&args.text) {
        match output.mode {
            OutputMode::Json => {
                output.print_json(&serde_json::json!({
                    "valid": false,
                    "errors": errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
                }));
            }
            _ => {
                for report in render_diagnostics(&errors, &args.text, "<formula>") {
                    eprintln!("{report:?}");
                }
            }
        }
        return Err(CliError::Other("formula failed to parse".into()));
    }

    let governance = validate_calculated_formula(entity, &args.entity, &args.text);
    match output.mode {
        OutputMode::Json => {
            output.print_json(&serde_json::json!({
                "valid": true,
                "status": governance.status.to_string(),
                "blocking_reasons": governance.blocking_reasons,
            }));
        }
        _ => {
            output.success(&format!("formula parses; governance status: {}", governance.status));
            for reason in &governance.blocking_reasons {
                output.warn(reason);
            }
        }
    }

    Ok(())
}
