use anyhow::Result;
use clap::Parser;
use gim_viewer::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    gim_viewer::run(cli).await
}
