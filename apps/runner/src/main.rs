use trendwatch_runner::config::Config;
use trendwatch_runner::{execute, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();
    let outcome = execute(&config).await?;
    tracing::info!("Runner finished: {}", outcome);
    Ok(())
}
