use anyhow::Result;
use ttrack::commands::Cli;
use ttrack::libs::logging;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    Cli::menu().await
}
