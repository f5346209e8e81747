use anyhow::Result;
use clap::Parser;

mod args;
mod cmd;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = args::Cli::parse();
    let _log = diary_log::auto_init()?;

    let settings = settings::Settings::load(cli.config.as_deref())?;
    cmd::dispatch(cli.command, settings).await
}
