mod app;
mod assets;
mod cli;
mod config;
mod interaction;
mod layout;
mod models;
mod navigation;
mod section;

use anyhow::Result;
use clap::Parser;

use app::ReelgridApp;
use cli::Cli;
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "reelgrid=info",
        1 => "reelgrid=debug",
        _ => "reelgrid=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref())?;
    ReelgridApp::new(config).run(cli.command)
}
