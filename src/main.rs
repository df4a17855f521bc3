use anyhow::Result;
use clap::Parser;
use dutis::cli::{Cli, Commands};
use dutis::commands;
use dutis::commit::Duti;
use dutis::discovery::Discovery;
use dutis::settings::Settings;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "dutis=debug" } else { "dutis=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let settings = Settings::resolve(cli.apps_dir, cli.cache_dir, cli.jobs)?;
    let discovery = Discovery::system(&settings);
    let sink = Duti::default();

    match cli.command {
        None => {
            commands::interactive(
                &discovery,
                &settings,
                &sink,
                cli.suffix,
                &mut std::io::stdin().lock(),
                &mut std::io::stdout(),
            )
            .await?;
        }
        Some(Commands::Set {
            suffix,
            application,
        }) => {
            commands::set(
                &discovery,
                &settings,
                &sink,
                &suffix,
                &application,
                &mut std::io::stdout(),
            )
            .await?;
        }
        Some(Commands::Recommend { suffix }) => {
            commands::recommend(&discovery, &suffix).await?;
        }
        Some(Commands::Apps { json }) => {
            commands::apps(&discovery, json).await?;
        }
        Some(Commands::List { json }) => {
            commands::list(&settings, json).await?;
        }
        Some(Commands::Remove { suffix }) => {
            commands::remove(&settings, &suffix).await?;
        }
        Some(Commands::Apply) => {
            commands::apply(&settings, &sink).await?;
        }
        Some(Commands::Refresh) => {
            commands::refresh(&discovery).await?;
        }
        Some(Commands::Check) => {
            commands::check()?;
        }
    }

    Ok(())
}
