use clap::Parser;
use page_context::cli::commands::{cmd_act, cmd_extract, cmd_inspect};
use page_context::cli::config::{Cli, Commands, load_config, log_filter, resolve_settings};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref());
    let settings = resolve_settings(&cli, &config);

    match &cli.command {
        Commands::Extract { roots, format } => {
            cmd_extract(roots, format, &settings)?;
        }
        Commands::Act {
            roots,
            actions,
            preview,
        } => {
            cmd_act(roots, actions, *preview, &settings)?;
        }
        Commands::Inspect { roots, output } => {
            cmd_inspect(roots, output.as_deref(), &settings)?;
        }
    }

    Ok(())
}
