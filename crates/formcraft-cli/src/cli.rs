use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Schema design and formula authoring engine for form-based document
/// generators.
///
/// formcraft builds and validates form schemas: entities, fields,
/// constraints, calculated-field formulas, control rules, and output
/// mappings, stored as one JSON document per schema.
#[derive(Parser)]
#[command(
    name = "formcraft",
    version,
    about = "Schema design and formula authoring engine for form-based document generators",
    after_help = "Use 'formcraft <command> --help' for more information about a command.",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Global options available to all subcommands.
#[derive(Args, Debug)]
pub struct GlobalOpts {
    /// Configuration file path [env: FORMCRAFT_CONFIG]
    #[arg(short = 'c', long = "config", global = true, env = "FORMCRAFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Schema store directory, one JSON file per schema [env: FORMCRAFT_STORE]
    #[arg(long = "store", global = true, env = "FORMCRAFT_STORE")]
    pub store: Option<PathBuf>,

    /// Output format: human (default), json, plain
    #[arg(
        long,
        global = true,
        default_value = "human",
        value_parser = ["human", "json", "plain"]
    )]
    pub format: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output [env: NO_COLOR]
    #[arg(long = "no-color", global = true, env = "NO_COLOR")]
    pub no_color: bool,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new schema store
    Init(InitArgs),

    /// Manage entities
    Entity {
        #[command(subcommand)]
        command: EntityCommands,
    },

    /// Manage fields on an entity
    Field {
        #[command(subcommand)]
        command: FieldCommands,
    },

    /// Manage constraints on a field
    Constraint {
        #[command(subcommand)]
        command: ConstraintCommands,
    },

    /// Manage control rules (VISIBILITY/ENABLED/REQUIRED) on a field
    Rule {
        #[command(subcommand)]
        command: RuleCommands,
    },

    /// Manage output mappings on a field
    Mapping {
        #[command(subcommand)]
        command: MappingCommands,
    },

    /// Manage options on a DROPDOWN/RADIO field
    Option {
        #[command(subcommand)]
        command: OptionCommands,
    },

    /// Manage relationships between entities
    Relationship {
        #[command(subcommand)]
        command: RelationshipCommands,
    },

    /// Validate formula text against an entity's known fields
    Formula {
        #[command(subcommand)]
        command: FormulaCommands,
    },

    /// Export a schema to JSON
    Export(ExportArgs),

    /// Import a schema from a JSON file
    Import(ImportArgs),

    /// Compare two schemas and classify compatibility
    Compare(CompareArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

// ---------------------------------------------------------------------------
// Individual command argument structs
// ---------------------------------------------------------------------------

/// Arguments for `formcraft init`.
#[derive(Args)]
pub struct InitArgs {
    /// Force provisioning even if the store directory already has content
    #[arg(short = 'f', long = "force")]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum EntityCommands {
    /// Add a new entity to a schema
    Add(EntityAddArgs),
    /// Remove an entity (fails if anything still references it)
    Remove(EntityRemoveArgs),
}

#[derive(Args)]
pub struct EntityAddArgs {
    /// Schema to modify
    pub schema: String,
    /// New entity id
    pub id: String,
    /// Translation key for the entity's display name
    pub name_key: String,
    /// Marks this entity as a schema root
    #[arg(long)]
    pub root: bool,
}

#[derive(Args)]
pub struct EntityRemoveArgs {
    pub schema: String,
    pub entity: String,
}

#[derive(Subcommand)]
pub enum FieldCommands {
    /// Add a new field to an entity
    Add(FieldAddArgs),
    /// Remove a field (fails if anything still references it)
    Remove(FieldRemoveArgs),
    /// Set or clear a CALCULATED field's formula
    SetFormula(FieldSetFormulaArgs),
    /// Point a LOOKUP field at another entity
    SetLookup(FieldSetLookupArgs),
    /// Point a TABLE field at its child entity
    SetTableChild(FieldSetTableChildArgs),
}

#[derive(Args)]
pub struct FieldAddArgs {
    pub schema: String,
    pub entity: String,
    pub id: String,
    /// text, textarea, number, date, dropdown, radio, checkbox, calculated, lookup, file, image, table
    pub field_type: String,
    /// Translation key for the field's label
    pub label_key: String,
    #[arg(long)]
    pub required: bool,
}

#[derive(Args)]
pub struct FieldRemoveArgs {
    pub schema: String,
    pub entity: String,
    pub field: String,
}

#[derive(Args)]
pub struct FieldSetFormulaArgs {
    pub schema: String,
    pub entity: String,
    pub field: String,
    /// Formula text; omit or pass an empty string to clear
    #[arg(default_value = "")]
    pub formula: String,
}

#[derive(Args)]
pub struct FieldSetLookupArgs {
    pub schema: String,
    pub entity: String,
    pub field: String,
    /// Entity the LOOKUP field targets
    pub target_entity: String,
    /// Displayable-scalar field on the target entity shown for this lookup
    #[arg(long)]
    pub display_field: Option<String>,
}

#[derive(Args)]
pub struct FieldSetTableChildArgs {
    pub schema: String,
    pub entity: String,
    pub field: String,
    /// Entity that holds this TABLE field's rows
    pub child_entity: String,
}

#[derive(Subcommand)]
pub enum ConstraintCommands {
    /// Add a constraint, given as a JSON object (`constraint_type` tag plus
    /// its parameters, e.g. `{"constraint_type":"MinLengthConstraint","min_length":3,"severity":"ERROR"}`)
    Add(ConstraintAddArgs),
    /// Remove the constraint of the given kind, if present
    Remove(ConstraintRemoveArgs),
}

#[derive(Args)]
pub struct ConstraintAddArgs {
    pub schema: String,
    pub entity: String,
    pub field: String,
    /// Constraint JSON
    pub json: String,
}

#[derive(Args)]
pub struct ConstraintRemoveArgs {
    pub schema: String,
    pub entity: String,
    pub field: String,
    /// Required, MinLength, MaxLength, MinValue, MaxValue, Pattern, AllowedValues, FileExtension, MaxFileSize
    pub kind: String,
}

#[derive(Subcommand)]
pub enum RuleCommands {
    Add(RuleAddArgs),
    Remove(RuleRemoveArgs),
}

#[derive(Args)]
pub struct RuleAddArgs {
    pub schema: String,
    pub entity: String,
    /// Field the rule is declared on
    pub field: String,
    /// VISIBILITY, ENABLED, REQUIRED
    pub rule_type: String,
    /// Field the rule controls
    pub target_field: String,
    /// Boolean-valued formula text
    pub formula: String,
}

#[derive(Args)]
pub struct RuleRemoveArgs {
    pub schema: String,
    pub entity: String,
    pub field: String,
    pub rule_type: String,
}

#[derive(Subcommand)]
pub enum MappingCommands {
    Add(MappingAddArgs),
    Remove(MappingRemoveArgs),
}

#[derive(Args)]
pub struct MappingAddArgs {
    pub schema: String,
    pub entity: String,
    pub field: String,
    /// TEXT, NUMBER, BOOLEAN
    pub target: String,
    pub formula: String,
}

#[derive(Args)]
pub struct MappingRemoveArgs {
    pub schema: String,
    pub entity: String,
    pub field: String,
    pub target: String,
}

#[derive(Subcommand)]
pub enum OptionCommands {
    Add(OptionAddArgs),
    Remove(OptionRemoveArgs),
    /// Reorder options to match the given permutation of existing values
    Reorder(OptionReorderArgs),
}

#[derive(Args)]
pub struct OptionAddArgs {
    pub schema: String,
    pub entity: String,
    pub field: String,
    pub value: String,
    pub label_key: String,
}

#[derive(Args)]
pub struct OptionRemoveArgs {
    pub schema: String,
    pub entity: String,
    pub field: String,
    pub value: String,
}

#[derive(Args)]
pub struct OptionReorderArgs {
    pub schema: String,
    pub entity: String,
    pub field: String,
    /// New order, as a comma-separated list of existing option values
    pub order: String,
}

#[derive(Subcommand)]
pub enum RelationshipCommands {
    Add(RelationshipAddArgs),
    Remove(RelationshipRemoveArgs),
}

#[derive(Args)]
pub struct RelationshipAddArgs {
    pub schema: String,
    pub id: String,
    pub source: String,
    pub target: String,
    /// CONTAINS, REFERENCES, ASSOCIATES
    pub relationship_type: String,
    pub name_key: String,
}

#[derive(Args)]
pub struct RelationshipRemoveArgs {
    pub schema: String,
    pub id: String,
}

#[derive(Subcommand)]
pub enum FormulaCommands {
    /// Validate formula text in isolation against an entity's known fields
    Validate(FormulaValidateArgs),
}

#[derive(Args)]
pub struct FormulaValidateArgs {
    pub schema: String,
    pub entity: String,
    pub text: String,
}

/// Arguments for `formcraft export`.
#[derive(Args)]
pub struct ExportArgs {
    pub schema: String,
    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

/// Arguments for `formcraft import`.
#[derive(Args)]
pub struct ImportArgs {
    /// JSON file to import
    pub file: PathBuf,
    /// Overwrite an existing schema with the same id
    #[arg(short = 'f', long = "force")]
    pub force: bool,
}

/// Arguments for `formcraft compare`.
#[derive(Args)]
pub struct CompareArgs {
    pub source: String,
    pub target: String,
}

/// Arguments for `formcraft completions`.
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_parser = ["bash", "zsh", "fish", "powershell", "elvish"])]
    pub shell: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_minimal_args() {
        let cli = Cli::try_parse_from(["formcraft", "completions", "bash"]).unwrap();
        assert!(matches!(cli.command, Commands::Completions(_)));
    }

    #[test]
    fn parse_global_verbose() {
        let cli = Cli::try_parse_from(["formcraft", "-vvv", "completions", "bash"]).unwrap();
        assert_eq!(cli.global.verbose, 3);
    }

    #[test]
    fn parse_global_quiet() {
        let cli = Cli::try_parse_from(["formcraft", "-q", "completions", "bash"]).unwrap();
        assert!(cli.global.quiet);
    }

    #[test]
    fn parse_global_format_json() {
        let cli = Cli::try_parse_from(["formcraft", "--format", "json", "completions", "bash"]).unwrap();
        assert_eq!(cli.global.format, "json");
    }

    #[test]
    fn parse_entity_add() {
        let cli = Cli::try_parse_from([
            "formcraft", "entity", "add", "s1", "contact", "contact.label", "--root",
        ])
        .unwrap();
        if let Commands::Entity { command: EntityCommands::Add(args) } = cli.command {
            assert_eq!(args.schema, "s1");
            assert_eq!(args.id, "contact");
            assert!(args.root);
        } else {
            panic!("expected Entity Add command");
        }
    }

    #[test]
    fn parse_field_set_formula() {
        let cli = Cli::try_parse_from([
            "formcraft", "field", "set-formula", "s1", "invoice", "total", "qty * price",
        ])
        .unwrap();
        if let Commands::Field { command: FieldCommands::SetFormula(args) } = cli.command {
            assert_eq!(args.formula, "qty * price");
        } else {
            panic!("expected Field SetFormula command");
        }
    }

    #[test]
    fn parse_field_set_lookup() {
        let cli = Cli::try_parse_from([
            "formcraft", "field", "set-lookup", "s1", "contact", "manager", "employee",
            "--display-field", "full_name",
        ])
        .unwrap();
        if let Commands::Field { command: FieldCommands::SetLookup(args) } = cli.command {
            assert_eq!(args.target_entity, "employee");
            assert_eq!(args.display_field.as_deref(), Some("full_name"));
        } else {
            panic!("expected Field SetLookup command");
        }
    }

    #[test]
    fn parse_field_set_table_child() {
        let cli = Cli::try_parse_from([
            "formcraft", "field", "set-table-child", "s1", "invoice", "line_items", "line_item",
        ])
        .unwrap();
        if let Commands::Field { command: FieldCommands::SetTableChild(args) } = cli.command {
            assert_eq!(args.child_entity, "line_item");
        } else {
            panic!("expected Field SetTableChild command");
        }
    }

    #[test]
    fn parse_export_command() {
        let cli = Cli::try_parse_from(["formcraft", "export", "s1", "-o", "out.json"]).unwrap();
        if let Commands::Export(args) = cli.command {
            assert_eq!(args.schema, "s1");
            assert_eq!(args.output, Some(PathBuf::from("out.json")));
        } else {
            panic!("expected Export command");
        }
    }

    #[test]
    fn parse_compare_command() {
        let cli = Cli::try_parse_from(["formcraft", "compare", "s1", "s2"]).unwrap();
        if let Commands::Compare(args) = cli.command {
            assert_eq!(args.source, "s1");
            assert_eq!(args.target, "s2");
        } else {
            panic!("expected Compare command");
        }
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        let result = Cli::try_parse_from(["formcraft", "-v", "-q", "completions", "bash"]);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_format_rejected() {
        let result = Cli::try_parse_from(["formcraft", "--format", "xml", "completions", "bash"]);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_shell_rejected() {
        let result = Cli::try_parse_from(["formcraft", "completions", "tcsh"]);
        assert!(result.is_err());
    }
}
