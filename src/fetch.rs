//! HTTP fetch gateway.
//!
//! Every outbound request in the pipeline goes through [`fetch_page`]. The
//! contract is deliberately narrow: give back the response body, or signal
//! absence. Transport errors, timeouts, and non-success statuses all collapse
//! to `None` with one logged diagnostic, so a flaky source can never abort
//! the run.

use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Browser-identifying User-Agent; several of the target sites reject
/// obvious non-browser clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Upper bound on one request, connect plus body.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
        .expect("failed to build HTTP client")
});

/// Fetch one URL and return the response body, or `None` on any failure.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_page(url: &str) -> Option<String> {
    let response = match CLIENT.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!(%url, error = %e, "Request failed");
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!(%url, %status, "Non-success HTTP status");
        return None;
    }

    match response.text().await {
        Ok(body) => {
            debug!(%url, bytes = body.len(), "Fetched page body");
            Some(body)
        }
        Err(e) => {
            warn!(%url, error = %e, "Failed reading response body");
            None
        }
    }
}
