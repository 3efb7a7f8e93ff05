//! Runnable word-guessing server.
//!
//! Settings come from the environment (a `.env` file in the working
//! directory is loaded first):
//!
//! ```text
//! WORDFORGE_BIND=0.0.0.0:1337
//! ORIGIN_URL=http://localhost:5173
//! WORDFORGE_WORDS=words.txt
//! RUST_LOG=info,wordforge=debug
//! ```

use tracing::info;
use tracing_subscriber::EnvFilter;
use wordforge::prelude::*;

#[tokio::main]
async fn main() -> Result<(), WordforgeError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    let words = WordList::from_path(&config.words_path)?;
    info!(words = words.len(), path = %config.words_path.display(), "word list loaded");

    let server = WordforgeServerBuilder::from_config(&config)
        .build(words, RandomIdProvider)
        .await?;

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await
}
