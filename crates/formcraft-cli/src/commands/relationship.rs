use formcraft_core::{EntityId, Relationship, RelationshipId, RelationshipType, TranslationKey};
use formcraft_usecases::entity_usecases::{create_relationship, delete_relationship};
use formcraft_usecases::UseCaseError;

use crate::cli::{GlobalOpts, RelationshipAddArgs, RelationshipCommands, RelationshipRemoveArgs};
use crate::commands::{finish, load_schema, open_repository, parse_id, parse_tagged, save_schema};
use crate::config::{load_config, resolve_store_dir};
use crate::error::CliError;
use crate::output::OutputContext;

pub async fn run(command: RelationshipCommands, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    match command {
        RelationshipCommands::Add(args) => add(args, global, output).await,
        RelationshipCommands::Remove(args) => remove(args, global, output).await,
    }
}

async fn add(args: RelationshipAddArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let id = parse_id(RelationshipId::new(&args.id))?;
    let source = parse_id(EntityId::new(&args.source))?;
    let target = parse_id(EntityId::new(&args.target))?;
    let name_key = parse_id(TranslationKey::new(&args.name_key))?;
    let relationship_type: RelationshipType = parse_tagged(&args.relationship_type, "relationship type")?;
    let relationship = Relationship::new(id, source, target, relationship_type, name_key)
        .map_err(UseCaseError::from)?;

    finish(create_relationship(&mut schema, relationship))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Added relationship '{}' to '{}'", args.id, args.schema));
    Ok(())
}

async fn remove(args: RelationshipRemoveArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let id = parse_id(RelationshipId::new(&args.id))?;
    finish(delete_relationship(&mut schema, &id))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Removed relationship '{}' from '{}'", args.id, args.schema));
    Ok(())
}
