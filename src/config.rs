//! Startup configuration
//!
//! One explicit object resolved once at launch and passed to whoever needs
//! it. The backend base URL comes from the `API_URL` environment variable
//! (a `.env` file is honored); the theme preference lives in a dotfile.

use std::path::PathBuf;

/// Default backend address when `API_URL` is unset
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the recommendation backend, without trailing slash
    pub api_url: String,
    /// File persisting the dark-mode flag
    pub theme_file: PathBuf,
}

impl Config {
    /// Resolve configuration from the environment
    pub fn from_env() -> Self {
        let api_url = resolve_api_url(std::env::var("API_URL").ok());

        let theme_file = std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".assess-tui")
            .join("theme");

        Self {
            api_url,
            theme_file,
        }
    }
}

/// Pick the backend base URL, normalizing away a trailing slash
fn resolve_api_url(raw: Option<String>) -> String {
    raw.filter(|v| !v.trim().is_empty())
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}
