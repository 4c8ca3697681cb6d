use formcraft_core::{EntityId, Field, FieldId, FieldType, TranslationKey};
use formcraft_usecases::entity_usecases::{
    add_field, delete_field, set_calculated_formula, set_lookup_target, set_table_child_entity,
};
use formcraft_usecases::UseCaseError;

use crate::cli::{
    FieldAddArgs, FieldCommands, FieldRemoveArgs, FieldSetFormulaArgs, FieldSetLookupArgs, FieldSetTableChildArgs,
    GlobalOpts,
};
use crate::commands::{finish, load_schema, open_repository, parse_id, parse_tagged, save_schema};
use crate::config::{load_config, resolve_store_dir};
use crate::error::CliError;
use crate::output::OutputContext;

pub async fn run(command: FieldCommands, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    match command {
        FieldCommands::Add(args) => add(args, global, output).await,
        FieldCommands::Remove(args) => remove(args, global, output).await,
        FieldCommands::SetFormula(args) => set_formula(args, global, output).await,
        FieldCommands::SetLookup(args) => set_lookup(args, global, output).await,
        FieldCommands::SetTableChild(args) => set_table_child(args, global, output).await,
    }
}

async fn add(args: FieldAddArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let entity_id = parse_id(EntityId::new(&args.entity))?;
    let field_id = parse_id(FieldId::new(&args.id))?;
    let label_key = parse_id(TranslationKey::new(&args.label_key))?;
    let field_type: FieldType = parse_tagged(&args.field_type, "field type")?;
    let field = Field::new(field_id, field_type, label_key, args.required)
        .map_err(UseCaseError::from)?;

    finish(add_field(&mut schema, &entity_id, field))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Added field '{}' to '{}.{}'", args.id, args.schema, args.entity));
    Ok(())
}

async fn remove(args: FieldRemoveArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let entity_id = parse_id(EntityId::new(&args.entity))?;
    let field_id = parse_id(FieldId::new(&args.field))?;
    finish(delete_field(&mut schema, &entity_id, &field_id))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Removed field '{}' from '{}.{}'", args.field, args.schema, args.entity));
    Ok(())
}

async fn set_formula(args: FieldSetFormulaArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let entity_id = parse_id(EntityId::new(&args.entity))?;
    let field_id = parse_id(FieldId::new(&args.field))?;
    finish(set_calculated_formula(&mut schema, &entity_id, &field_id, args.formula))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Updated formula on '{}.{}'", args.entity, args.field));
    Ok(())
}

async fn set_lookup(args: FieldSetLookupArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let entity_id = parse_id(EntityId::new(&args.entity))?;
    let field_id = parse_id(FieldId::new(&args.field))?;
    let target_entity_id = parse_id(EntityId::new(&args.target_entity))?;
    let display_field = args.display_field.map(|f| FieldId::new(&f)).transpose().map_err(UseCaseError::from)?;

    finish(set_lookup_target(&mut schema, &entity_id, &field_id, target_entity_id, display_field))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Set lookup target on '{}.{}'", args.entity, args.field));
    Ok(())
}

async fn set_table_child(args: FieldSetTableChildArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let entity_id = parse_id(EntityId::new(&args.entity))?;
    let field_id = parse_id(FieldId::new(&args.field))?;
    let child_entity_id = parse_id(EntityId::new(&args.child_entity))?;

    finish(set_table_child_entity(&mut schema, &entity_id, &field_id, child_entity_id))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Set child entity on '{}.{}'", args.entity, args.field));
    Ok(())
}
