//! amu-pca - Main Entry Point

use amu_pca::cli::{cmd_run, cmd_sample, Cli, Commands};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the JSON payload on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "amu_pca=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { data, categories, literal_year_tagging, threshold, backend, output } => {
            cmd_run(
                data.as_deref(),
                categories,
                literal_year_tagging,
                threshold,
                &backend,
                output.as_deref(),
            )?;
        }
        Commands::Sample { categories } => {
            cmd_sample(categories)?;
        }
    }

    Ok(())
}
