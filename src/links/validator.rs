//! Outbound URL policy checks.
//!
//! # Responsibilities
//! - Accept only `https` URLs
//! - Accept only hosts on the allowed-domain list or their subdomains
//!
//! # Design Decisions
//! - Both checks are total: anything that fails to parse is rejected
//! - Subdomain matching is a dot-anchored suffix match, never a plain
//!   `ends_with` on the domain (so `evil-calendly.com` is rejected)

use url::Url;

/// Domains that outbound links may point to, including their subdomains.
pub const ALLOWED_DOMAINS: &[&str] = &[
    "calendly.com",
    "wa.me",
    "meet.google.com",
    "zoom.us",
    "neighborly-jersey-45a.notion.site",
    "stripe.com",
    "buy.stripe.com",
    "paypal.com",
];

/// Why a resolved URL was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyViolation {
    NotHttps,
    DomainNotAllowed,
}

impl PolicyViolation {
    /// Short label used for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyViolation::NotHttps => "not_https",
            PolicyViolation::DomainNotAllowed => "domain_not_allowed",
        }
    }
}

/// Returns true only for URLs whose scheme is exactly `https`.
pub fn is_https(url: &str) -> bool {
    Url::parse(url)
        .map(|u| u.scheme() == "https")
        .unwrap_or(false)
}

/// Returns true when the URL's host is an allowed domain or a subdomain of one.
pub fn is_allowed_domain(url: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => return false,
    };
    let host = match parsed.host_str() {
        Some(h) if !h.is_empty() => h,
        _ => return false,
    };

    ALLOWED_DOMAINS.iter().any(|domain| host_matches(host, domain))
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .map(|prefix| prefix.ends_with('.'))
            .unwrap_or(false)
}

/// Applies both checks in order, HTTPS first.
pub fn check_policy(url: &str) -> Result<(), PolicyViolation> {
    if !is_https(url) {
        return Err(PolicyViolation::NotHttps);
    }
    if !is_allowed_domain(url) {
        return Err(PolicyViolation::DomainNotAllowed);
    }
    Ok(())
}
