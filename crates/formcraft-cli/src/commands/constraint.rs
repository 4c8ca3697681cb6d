use formcraft_core::{Constraint, ConstraintKind, EntityId, FieldId};
use formcraft_usecases::entity_usecases::{add_constraint, delete_constraint};

use crate::cli::{ConstraintAddArgs, ConstraintCommands, ConstraintRemoveArgs, GlobalOpts};
use crate::commands::{finish, load_schema, open_repository, parse_id, save_schema};
use crate::config::{load_config, resolve_store_dir};
use crate::error::CliError;
use crate::output::OutputContext;

pub async fn run(command: ConstraintCommands, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    match command {
        ConstraintCommands::Add(args) => add(args, global, output).await,
        ConstraintCommands::Remove(args) => remove(args, global, output).await,
    }
}

async fn add(args: ConstraintAddArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let entity_id = parse_id(EntityId::new(&args.entity))?;
    let field_id = parse_id(FieldId::new(&args.field))?;
    let constraint: Constraint = serde_json::from_str(&args.json)
        .map_err(|e| CliError::Other(format!("invalid constraint JSON: {e}")))?;

    finish(add_constraint(&mut schema, &entity_id, &field_id, constraint))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Added constraint to '{}.{}'", args.entity, args.field));
    Ok(())
}

async fn remove(args: ConstraintRemoveArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let entity_id = parse_id(EntityId::new(&args.entity))?;
    let field_id = parse_id(FieldId::new(&args.field))?;
    let kind = parse_constraint_kind(&args.kind)?;

    finish(delete_constraint(&mut schema, &entity_id, &field_id, kind))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Removed {} constraint from '{}.{}'", args.kind, args.entity, args.field));
    Ok(())
}

fn parse_constraint_kind(raw: &str) -> Result<ConstraintKind, CliError> {
    match raw {
        "Required" => Ok(ConstraintKind::Required),
        "MinLength" => Ok(ConstraintKind::MinLength),
        "MaxLength" => Ok(ConstraintKind::MaxLength),
        "MinValue" => Ok(ConstraintKind::MinValue),
        "MaxValue" => Ok(ConstraintKind::MaxValue),
        "Pattern" => Ok(ConstraintKind::Pattern),
        "AllowedValues" => Ok(ConstraintKind::AllowedValues),
        "FileExtension" => Ok(ConstraintKind::FileExtension),
        "MaxFileSize" => Ok(ConstraintKind::MaxFileSize),
        other => Err(CliError::Other(format!("unknown constraint kind '{other}'"))),
    }
}
