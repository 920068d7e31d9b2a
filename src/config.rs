//! Client configuration resolved at build time.
//!
//! Browsers have no process environment, so overrides are baked in through
//! `option_env!` when the WASM bundle is compiled.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 10_000;
pub const DEFAULT_CREDENTIAL_HEADER: &str = "satoken";
pub const DEFAULT_STORAGE_KEY: &str = "satoken";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_HOME_PATH: &str = "/";
pub const DEFAULT_REDIRECT_PARAM: &str = "redirect";
pub const DEFAULT_ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix prepended to every API path (no trailing slash).
    pub api_base: String,
    pub request_timeout_ms: u32,
    /// Header carrying the raw credential on outbound requests.
    pub credential_header: String,
    /// localStorage key holding the persisted credential.
    pub storage_key: String,
    pub login_path: String,
    pub home_path: String,
    /// Query parameter on the login route naming the path to resume.
    pub redirect_param: String,
    /// Role that marks a user as privileged.
    pub admin_role: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            credential_header: DEFAULT_CREDENTIAL_HEADER.to_owned(),
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            home_path: DEFAULT_HOME_PATH.to_owned(),
            redirect_param: DEFAULT_REDIRECT_PARAM.to_owned(),
            admin_role: DEFAULT_ADMIN_ROLE.to_owned(),
        }
    }
}

impl ClientConfig {
    /// Build config from compile-time environment overrides.
    ///
    /// Optional:
    /// - `CITATION_API_BASE`: default `/api`
    /// - `CITATION_TIMEOUT_MS`: default 10000
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::resolve(option_env!("CITATION_API_BASE"), option_env!("CITATION_TIMEOUT_MS"))
    }

    fn resolve(api_base: Option<&str>, timeout_ms: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(base) = api_base.map(str::trim).filter(|b| !b.is_empty()) {
            config.api_base = base.trim_end_matches('/').to_owned();
        }
        config.request_timeout_ms = parse_timeout(timeout_ms);
        config
    }

    /// Join a relative API path onto the configured base.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.api_base)
        } else {
            format!("{}/{path}", self.api_base)
        }
    }
}

fn parse_timeout(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS)
}
