mod cli;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use entry_catalog::CatalogConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "entry_catalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    let config = CatalogConfig::load(&cli.root, cli.config.as_deref())
        .with_context(|| format!("failed to load configuration for {}", cli.root.display()))?;

    match cli.command {
        Commands::Run {
            check_links,
            git_list,
        } => {
            cli::run_maintenance(&config, check_links, git_list)
                .await
                .context("maintenance pass failed")?;
        }
        Commands::Normalize => {
            cli::normalize_entries(&config).context("normalization failed")?;
        }
        Commands::Toc => {
            cli::update_toc(&config).context("updating the overview failed")?;
        }
        Commands::Stats => {
            cli::show_stats(&config).context("updating statistics failed")?;
        }
        Commands::Export { git_list } => {
            cli::export_catalog(&config, git_list).context("export failed")?;
        }
        Commands::CheckTemplate => {
            cli::check_template(&config).context("template check failed")?;
        }
        Commands::CheckLinks => {
            cli::check_links(&config)
                .await
                .context("link check failed")?;
        }
        Commands::SortLists => {
            cli::sort_lists(&config).context("sorting list files failed")?;
        }
    }

    Ok(())
}
