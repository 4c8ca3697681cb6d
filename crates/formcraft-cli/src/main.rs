mod cli;
mod commands;
mod config;
#[allow(unused_assignments)]
mod diagnostic;
mod error;
mod output;
mod progress;

use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    let output = output::OutputContext::from_global(&cli.global);

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        cli::Commands::Init(args) => commands::init::run(args, &cli.global, &output).await,
        cli::Commands::Entity { command } => commands::entity::run(command, &cli.global, &output).await,
        cli::Commands::Field { command } => commands::field::run(command, &cli.global, &output).await,
        cli::Commands::Constraint { command } => {
            commands::constraint::run(command, &cli.global, &output).await
        }
        cli::Commands::Rule { command } => commands::rule::run(command, &cli.global, &output).await,
        cli::Commands::Mapping { command } => commands::mapping::run(command, &cli.global, &output).await,
        cli::Commands::Option { command } => commands::option::run(command, &cli.global, &output).await,
        cli::Commands::Relationship { command } => {
            commands::relationship::run(command, &cli.global, &output).await
        }
        cli::Commands::Formula { command } => commands::formula::run(command, &cli.global, &output).await,
        cli::Commands::Export(args) => commands::export::run(args, &cli.global, &output).await,
        cli::Commands::Import(args) => commands::import::run(args, &cli.global, &output).await,
        cli::Commands::Compare(args) => commands::compare::run(args, &cli.global, &output).await,
        cli::Commands::Completions(args) => commands::completions::run(args),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            output.print_error(&e);
            std::process::exit(e.exit_code() as i32);
        }
    }
}
