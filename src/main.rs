//! Entry point for the Return Engine binary.
//!
//! Running this binary starts an HTTP server that the calculator page
//! talks to.  Settings come from the environment; see
//! [`return_engine::config::Config`].

use return_engine::{api, config::Config, logging};

#[tokio::main]
async fn main() {
    let config = Config::from_env();
    logging::init(&config.log_level);
    if let Err(err) = api::serve(&config.bind_addr, config.prefs_file).await {
        tracing::error!(error = %err, "server stopped");
        std::process::exit(1);
    }
}
