use anyhow::Result;
use clap::Parser;

use crud_console::cli::{self, Cli};
use crud_console::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    cli::run(cli, config).await
}
