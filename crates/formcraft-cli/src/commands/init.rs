use crate::cli::{GlobalOpts, InitArgs};
use crate::config::{load_config, resolve_store_dir};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// Run the `init` command: provision a schema store directory.
pub async fn run(
    args: InitArgs,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let store_dir = resolve_store_dir(&config, global);

    if store_dir.exists() && store_dir.read_dir().map(|mut d| d.next().is_some()).unwrap_or(false)
        && !args.force
    {
        return Err(CliError::DirectoryExists { path: store_dir });
    }

    formcraft_fsrepo::bootstrap(&store_dir)?;

    match output.mode {
        OutputMode::Human => {
            output.success(&format!("Initialized schema store at {}", store_dir.display()));
        }
        OutputMode::Json => {
            output.print_json(&serde_json::json!({ "store": store_dir.display().to_string() }));
        }
        OutputMode::Plain => {
            println!("{}", store_dir.display());
        }
    }

    Ok(())
}
