//! Credential & Session Authority
//!
//! Serves signup, login, session-gated reads, and sensor submissions.
//! Configured entirely from the environment (and `.env`); listens on BIND_ADDR.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = laiska_server::dotenv()?;
    let config = laiska_server::Config::from_env()?;
    laiska_core::log(config.log_level)?;
    if let Some(path) = env {
        log::info!("loaded environment from {}", path.display());
    }
    laiska_server::run(config).await
}
