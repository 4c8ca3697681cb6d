use formcraft_core::{EntityId, FieldId, OutputMapping, OutputTarget};
use formcraft_usecases::entity_usecases::{add_output_mapping, delete_output_mapping};

use crate::cli::{GlobalOpts, MappingAddArgs, MappingCommands, MappingRemoveArgs};
use crate::commands::{finish, load_schema, open_repository, parse_id, parse_tagged, save_schema};
use crate::config::{load_config, resolve_store_dir};
use crate::error::CliError;
use crate::output::OutputContext;

pub async fn run(command: MappingCommands, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    match command {
        MappingCommands::Add(args) => add(args, global, output).await,
        MappingCommands::Remove(args) => remove(args, global, output).await,
    }
}

async fn add(args: MappingAddArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let entity_id = parse_id(EntityId::new(&args.entity))?;
    let field_id = parse_id(FieldId::new(&args.field))?;
    let target: OutputTarget = parse_tagged(&args.target, "output target")?;
    let mapping = OutputMapping::new(target, args.formula);

    finish(add_output_mapping(&mut schema, &entity_id, &field_id, mapping))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Added {} mapping to '{}.{}'", target, args.entity, args.field));
    Ok(())
}

async fn remove(args: MappingRemoveArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let entity_id = parse_id(EntityId::new(&args.entity))?;
    let field_id = parse_id(FieldId::new(&args.field))?;
    let target: OutputTarget = parse_tagged(&args.target, "output target")?;

    finish(delete_output_mapping(&mut schema, &entity_id, &field_id, target))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Removed {} mapping from '{}.{}'", target, args.entity, args.field));
    Ok(())
}
