use formcraft_core::{EntityId, TranslationKey};
use formcraft_usecases::entity_usecases::{create_entity, delete_entity};

use crate::cli::{EntityAddArgs, EntityCommands, EntityRemoveArgs, GlobalOpts};
use crate::commands::{finish, load_schema, open_repository, parse_id, save_schema};
use crate::config::{load_config, resolve_store_dir};
use crate::error::CliError;
use crate::output::OutputContext;

pub async fn run(command: EntityCommands, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    match command {
        EntityCommands::Add(args) => add(args, global, output).await,
        EntityCommands::Remove(args) => remove(args, global, output).await,
    }
}

async fn add(args: EntityAddArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let id = parse_id(EntityId::new(&args.id))?;
    let name_key = parse_id(TranslationKey::new(&args.name_key))?;
    finish(create_entity(&mut schema, id, name_key, args.root))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Added entity '{}' to '{}'", args.id, args.schema));
    Ok(())
}

async fn remove(args: EntityRemoveArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let id = parse_id(EntityId::new(&args.entity))?;
    finish(delete_entity(&mut schema, &id))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Removed entity '{}' from '{}'", args.entity, args.schema));
    Ok(())
}
