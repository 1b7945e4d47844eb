use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Telsalus";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default remote API base URL (overridable via `TELSALUS_API_URL`).
pub const DEFAULT_API_URL: &str = "https://api.telsalus.com";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Route the shell navigates to when the session is invalidated.
pub const LOGIN_ROUTE: &str = "/login";

/// Route the shell lands on after a successful login.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// Get the application data directory
/// ~/.telsalus/ on all platforms (holds the session document only)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(".telsalus")
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Runtime configuration for the portal core.
///
/// Built once at startup and handed to `Portal::new`. Environment
/// overrides exist so staging builds and tests can point elsewhere
/// without a config file.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Base URL of the remote API, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Directory holding the persisted session document.
    pub data_dir: PathBuf,
}

impl PortalConfig {
    /// Configuration from environment, falling back to defaults.
    ///
    /// `TELSALUS_API_URL` overrides the API base URL and
    /// `TELSALUS_DATA_DIR` overrides the data directory.
    pub fn from_env() -> Self {
        let base_url = std::env::var("TELSALUS_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let data_dir = std::env::var("TELSALUS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| app_data_dir());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            data_dir,
        }
    }

    /// Configuration pointing at an explicit base URL (tests, staging).
    pub fn with_base_url(base_url: &str, data_dir: PathBuf) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            data_dir,
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
