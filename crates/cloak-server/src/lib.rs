//! Cloak HTTP facade: router, shared state and client construction.

pub mod routes;
pub mod state;

use std::time::Duration;

use cloak_core::CloakConfig;

pub use routes::build_router;
pub use state::AppState;

/// Build the one HTTP client shared by every downstream service.
pub fn build_http_client(config: &CloakConfig) -> anyhow::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.http_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}
