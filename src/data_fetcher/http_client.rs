//! HTTP client creation and configuration utilities

use reqwest::Client;
use std::time::Duration;

/// Creates the shared HTTP client with connection pooling and a request timeout.
///
/// One client is created per [`crate::FootballApi`] and shared by every
/// concurrent request it issues.
///
/// # Arguments
/// * `timeout_seconds` - Per-request timeout
/// * `user_agent` - Sent with every request; some sources refuse anonymous clients
pub fn create_http_client_with_timeout(
    timeout_seconds: u64,
    user_agent: &str,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(crate::constants::HTTP_POOL_MAX_IDLE_PER_HOST)
        .user_agent(user_agent)
        .build()
}

/// Creates an HTTP client for testing with default timeout
#[cfg(test)]
pub fn create_test_http_client() -> Client {
    create_http_client_with_timeout(
        crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS,
        crate::constants::DEFAULT_USER_AGENT,
    )
    .expect("Failed to create test HTTP client")
}
