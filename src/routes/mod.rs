//! Route table and route-target helpers.
//!
//! ARCHITECTURE
//! ============
//! `/login` is public; `/` and `/about` are children of the authenticated
//! layout and inherit its auth requirement. Unknown paths match nothing and
//! therefore require nothing. The guard decides what happens per target.


pub mod guard;

use crate::config::ClientConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteDef {
    pub path: &'static str,
    pub name: &'static str,
    pub requires_auth: bool,
}

pub const ROUTES: &[RouteDef] = &[
    RouteDef { path: "/login", name: "login", requires_auth: false },
    RouteDef { path: "/", name: "home", requires_auth: true },
    RouteDef { path: "/about", name: "about", requires_auth: true },
];

/// Look up a route by exact path (trailing slash ignored).
#[must_use]
pub fn find_route(path: &str) -> Option<&'static RouteDef> {
    let normalized = normalize_path(path);
    ROUTES.iter().find(|r| r.path == normalized)
}

fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// Strip query and fragment from a full path.
#[must_use]
pub fn bare_path(full_path: &str) -> &str {
    full_path.split(['?', '#']).next().unwrap_or(full_path)
}

/// A navigation destination as seen by the guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTarget {
    /// Path without query or fragment.
    pub path: String,
    /// Path exactly as requested, query included.
    pub full_path: String,
    pub requires_auth: bool,
}

impl RouteTarget {
    #[must_use]
    pub fn parse(full_path: &str) -> Self {
        let full_path = if full_path.is_empty() { "/" } else { full_path };
        let path = normalize_path(bare_path(full_path)).to_owned();
        let requires_auth = find_route(&path).is_some_and(|r| r.requires_auth);
        Self { path, full_path: full_path.to_owned(), requires_auth }
    }
}

/// Login URL carrying `intended` so it can be resumed after sign-in.
#[must_use]
pub fn login_redirect(config: &ClientConfig, intended: &str) -> String {
    format!("{}?{}={}", config.login_path, config.redirect_param, encode_query_value(intended))
}

/// Where to go after a successful login: the requested internal path, or
/// home for anything absent or pointing off-site.
#[must_use]
pub fn resume_path(config: &ClientConfig, redirect: Option<&str>) -> String {
    match redirect.map(str::trim) {
        Some(target) if is_internal_path(target) && bare_path(target) != config.login_path => target.to_owned(),
        _ => config.home_path.clone(),
    }
}

fn is_internal_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

/// Percent-encode a query value, leaving path characters (`/`, `:`, `@`)
/// readable.
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' | b':' | b'@' => {
                out.push(char::from(byte));
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
