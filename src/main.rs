use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    prompt_favorites::cli::app::run().await
}
