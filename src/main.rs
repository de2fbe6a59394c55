use anyhow::Result;
use b2b_research::{cli, launch};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let query = args.query.clone();
    let config = args.into_config()?;

    launch(&config, query.as_deref()).await
}
