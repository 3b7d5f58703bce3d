//! Base-URL resolution for the client.

use std::env;

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "PORTFOLIO_API_URL";

/// Base URL of the deployed service, used when no override is set.
pub const DEFAULT_BASE_URL: &str = "https://mutaiprofile.pythonanywhere.com/api";

/// Resolve the API base URL from the environment, falling back to the
/// deployed service.
pub fn base_url() -> String {
    env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}
