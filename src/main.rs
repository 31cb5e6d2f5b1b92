use clap::Parser;

use netsweep::cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    netsweep::runner::run(cli.into_settings()).await?;

    Ok(())
}
