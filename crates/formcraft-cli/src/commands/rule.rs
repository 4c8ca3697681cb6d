use formcraft_core::{ControlRule, EntityId, FieldId, RuleType};
use formcraft_usecases::entity_usecases::{add_control_rule, delete_control_rule};

use crate::cli::{GlobalOpts, RuleAddArgs, RuleCommands, RuleRemoveArgs};
use crate::commands::{finish, load_schema, open_repository, parse_id, parse_tagged, save_schema};
use crate::config::{load_config, resolve_store_dir};
use crate::error::CliError;
use crate::output::OutputContext;

pub async fn run(command: RuleCommands, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    match command {
        RuleCommands::Add(args) => add(args, global, output).await,
        RuleCommands::Remove(args) => remove(args, global, output).await,
    }
}

async fn add(args: RuleAddArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let entity_id = parse_id(EntityId::new(&args.entity))?;
    let field_id = parse_id(FieldId::new(&args.field))?;
    let target_field_id = parse_id(FieldId::new(&args.target_field))?;
    let rule_type: RuleType = parse_tagged(&args.rule_type, "rule type")?;
    let rule = ControlRule::new(rule_type, target_field_id, args.formula);

    finish(add_control_rule(&mut schema, &entity_id, &field_id, rule))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Added {} rule to '{}.{}'", rule_type, args.entity, args.field));
    Ok(())
}

async fn remove(args: RuleRemoveArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);
    let repo = open_repository(&store_dir)?;
    let mut schema = load_schema(&repo, &args.schema).await?;

    let entity_id = parse_id(EntityId::new(&args.entity))?;
    let field_id = parse_id(FieldId::new(&args.field))?;
    let rule_type: RuleType = parse_tagged(&args.rule_type, "rule type")?;

    finish(delete_control_rule(&mut schema, &entity_id, &field_id, rule_type))?;

    save_schema(&repo, &schema).await?;
    output.success(&format!("Removed {} rule from '{}.{}'", rule_type, args.entity, args.field));
    Ok(())
}
