//! Navigation interception.
//!
//! Every navigation the embedded surface attempts is passed through
//! [`decide_navigation`] before it loads.

use super::classify::{SchemeMatch, match_scheme};
use crate::config::ChannelPolicy;
use crate::events::Classification;
use serde::Serialize;
use url::Url;

/// Whether the surface may load the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationAction {
    Allow,
    Suppress,
}

/// What kind of URL the surface tried to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationOrigin {
    /// The custom completion scheme.
    CustomScheme,
    /// The payment provider's pages.
    Provider,
    /// The booking backend.
    Backend,
    /// Anything else, including other schemes.
    External,
    /// Not a URL at all.
    Unparseable,
}

/// Result of intercepting one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationDecision {
    pub action: NavigationAction,
    pub origin: NavigationOrigin,
    /// Set only for custom-scheme success/cancel URLs.
    pub classification: Option<Classification>,
}

impl NavigationDecision {
    fn load(origin: NavigationOrigin) -> Self {
        Self {
            action: NavigationAction::Allow,
            origin,
            classification: None,
        }
    }

    fn block(origin: NavigationOrigin) -> Self {
        Self {
            action: NavigationAction::Suppress,
            origin,
            classification: None,
        }
    }
}

/// Decide whether to load `url`.
///
/// Custom-scheme URLs are always suppressed; `success`/`cancel` ones also
/// classify. Provider and backend pages load. Everything else loads too,
/// unless `policy.enforce_allow_list` is set, in which case external http(s)
/// pages and non-page schemes are suppressed.
pub fn decide_navigation(url: &str, policy: &ChannelPolicy) -> NavigationDecision {
    if let Some(matched) = match_scheme(url, &policy.scheme) {
        return NavigationDecision {
            action: NavigationAction::Suppress,
            origin: NavigationOrigin::CustomScheme,
            classification: SchemeMatch::classification(matched),
        };
    }

    let Ok(parsed) = Url::parse(url.trim()) else {
        return if policy.enforce_allow_list {
            NavigationDecision::block(NavigationOrigin::Unparseable)
        } else {
            NavigationDecision::load(NavigationOrigin::Unparseable)
        };
    };

    match parsed.scheme() {
        "http" | "https" => {
            let host = parsed.host_str().unwrap_or_default();
            if policy.is_provider_host(host) {
                NavigationDecision::load(NavigationOrigin::Provider)
            } else if policy.is_backend_host(host) {
                NavigationDecision::load(NavigationOrigin::Backend)
            } else if policy.enforce_allow_list {
                NavigationDecision::block(NavigationOrigin::External)
            } else {
                NavigationDecision::load(NavigationOrigin::External)
            }
        }
        // In-page documents never leave the surface.
        "about" | "data" | "blob" => NavigationDecision::load(NavigationOrigin::External),
        _ if policy.enforce_allow_list => NavigationDecision::block(NavigationOrigin::External),
        _ => NavigationDecision::load(NavigationOrigin::External),
    }
}
