use anyhow::Result;
use saathi::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
