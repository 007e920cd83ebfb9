use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use captionfeed::app::AppContext;
use captionfeed::cli::{commands, Cli, Commands};
use captionfeed::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Serve { bind } => {
            commands::serve(ctx, bind).await?;
        }
        Commands::Feed => {
            commands::print_feed(&ctx).await?;
        }
        Commands::Page => {
            commands::print_page(&ctx).await?;
        }
    }

    Ok(())
}
