//! Embedded payment channel policy.

use std::time::Duration;

/// How the embedded checkout surface is watched and which navigations it may
/// perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPolicy {
    /// Custom scheme the provider redirects to on completion (`mobile` for
    /// `mobile://success`).
    pub scheme: String,
    /// Hosts belonging to the payment provider. Subdomains match too.
    pub provider_domains: Vec<String>,
    /// Host of the booking backend.
    pub backend_domain: Option<String>,
    /// When set, http(s) navigations outside the provider and backend
    /// domains are suppressed. When unset they load and are only logged.
    pub enforce_allow_list: bool,
    /// Fallback polling interval of the injected marker watcher.
    pub poll_interval: Duration,
    /// Page text that marks a completed payment.
    pub success_markers: Vec<String>,
    /// Page text that marks a provider-side failure.
    pub error_markers: Vec<String>,
}

impl ChannelPolicy {
    pub fn is_provider_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.provider_domains
            .iter()
            .any(|domain| host_matches(&host, domain))
    }

    pub fn is_backend_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.backend_domain
            .iter()
            .any(|domain| host_matches(&host, domain))
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    host == domain
        || host
            .strip_suffix(domain.as_str())
            .is_some_and(|prefix| prefix.ends_with('.'))
}

impl Default for ChannelPolicy {
    fn default() -> Self {
        Self {
            scheme: "mobile".to_string(),
            provider_domains: vec!["pay.payos.vn".to_string()],
            backend_domain: None,
            enforce_allow_list: false,
            poll_interval: Duration::from_secs(1),
            success_markers: vec![
                "Thanh toán thành công".to_string(),
                "Payment successful".to_string(),
            ],
            error_markers: vec![
                "Thanh toán thất bại".to_string(),
                "Payment failed".to_string(),
            ],
        }
    }
}
