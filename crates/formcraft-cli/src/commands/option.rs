use formcraft_core::{EntityId, FieldId, FieldOption, TranslationKey};
use formcraft_usecases::entity_usecases::{add_option, delete_option, reorder_options};

use crate::cli::{GlobalOpts, OptionAddArgs, OptionCommands, OptionRemoveArgs, OptionReorderArgs};
use crate::commands::{finish, load_schema, open_repository, parse_id, save_schema};
use crate::config::{load_config, resolve_store_dir};
use crate::error::CliError;
use crate::output::OutputContext;

pub async fn run(command: OptionCommands, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    match command {
        OptionCommands::Add(args) => add(args, global, output).await,
        OptionCommands::Remove(args) => remove(args, global, output).await,
        OptionCommands::Reorder(args) => reorder(args, global, output).await,
    }
}

async fn add(args: OptionAddArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let entity_id = parse_id(EntityId::new(&args.entity))?;
    let field_id = parse_id(FieldId::new(&args.field))?;
    let label_key = parse_id(TranslationKey::new(&args.label_key))?;
    let option = FieldOption::new(args.value.clone(), label_key);

    finish(add_option(&mut schema, &entity_id, &field_id, option))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Added option '{}' to '{}.{}'", args.value, args.entity, args.field));
    Ok(())
}

async fn remove(args: OptionRemoveArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let entity_id = parse_id(EntityId::new(&args.entity))?;
    let field_id = parse_id(FieldId::new(&args.field))?;

    finish(delete_option(&mut schema, &entity_id, &field_id, &args.value))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Removed option '{}' from '{}.{}'", args.value, args.entity, args.field));
    Ok(())
}

async fn reorder(args: OptionReorderArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let entity_id = parse_id(EntityId::new(&args.entity))?;
    let field_id = parse_id(FieldId::new(&args.field))?;
    let new_order: Vec<String> = args.order.split(',').map(|s| s.trim().to_string()).collect();

    finish(reorder_options(&mut schema, &entity_id, &field_id, &new_order))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Reordered options on '{}.{}'", args.entity, args.field));
    Ok(())
}
