//! Subdomain derivation from request host names.
//!
//! One school tenant is selected by the leftmost DNS label of the host the
//! request arrived on. Hosts with no usable tenant label — `localhost`,
//! bare IPs, apex domains — fall back to a configured literal so the
//! public site still renders during local development.

/// Fallback tenant label used when the host has no recognizable subdomain.
pub const FALLBACK_SUBDOMAIN: &str = "auth";

/// Extracts the tenant subdomain from a host name.
///
/// Returns the leftmost label of `acme.example.com`-shaped hosts, and
/// `fallback` for `localhost`, IP addresses, apex domains, and anything
/// else that does not look like `<tenant>.<domain>.<tld>`. The port, if
/// present, is ignored.
#[must_use]
pub fn subdomain_from_host(host: &str, fallback: &str) -> String {
    let host = host.trim().to_ascii_lowercase();

    // IPv6 literals never carry a tenant label.
    if host.starts_with('[') {
        return fallback.to_string();
    }

    let host = match host.split_once(':') {
        Some((h, _port)) => h,
        None => host.as_str(),
    };

    if host.is_empty() || host == "localhost" || is_ipv4(host) {
        return fallback.to_string();
    }

    let labels: Vec<&str> = host.split('.').collect();
    // An apex domain like `example.com` has no tenant label.
    if labels.len() < 3 {
        return fallback.to_string();
    }

    let tenant = labels[0];
    if tenant.is_empty() || tenant == "www" || !is_valid_label(tenant) {
        return fallback.to_string();
    }

    tenant.to_string()
}

fn is_ipv4(host: &str) -> bool {
    let mut parts = 0;
    for part in host.split('.') {
        if part.is_empty() || part.parse::<u8>().is_err() {
            return false;
        }
        parts += 1;
    }
    parts == 4
}

fn is_valid_label(label: &str) -> bool {
    label
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leftmost_label_is_the_tenant() {
        assert_eq!(subdomain_from_host("acme.example.com", FALLBACK_SUBDOMAIN), "acme");
    }

    #[test]
    fn nested_subdomains_use_the_leftmost_label() {
        assert_eq!(
            subdomain_from_host("acme.staging.example.com", FALLBACK_SUBDOMAIN),
            "acme"
        );
    }

    #[test]
    fn port_is_stripped() {
        assert_eq!(
            subdomain_from_host("acme.example.com:8080", FALLBACK_SUBDOMAIN),
            "acme"
        );
    }

    #[test]
    fn host_is_case_folded() {
        assert_eq!(subdomain_from_host("ACME.Example.COM", FALLBACK_SUBDOMAIN), "acme");
    }

    #[test]
    fn localhost_falls_back() {
        assert_eq!(subdomain_from_host("localhost", FALLBACK_SUBDOMAIN), "auth");
        assert_eq!(subdomain_from_host("localhost:3000", FALLBACK_SUBDOMAIN), "auth");
    }

    #[test]
    fn ip_addresses_fall_back() {
        assert_eq!(subdomain_from_host("127.0.0.1", FALLBACK_SUBDOMAIN), "auth");
        assert_eq!(subdomain_from_host("127.0.0.1:3000", FALLBACK_SUBDOMAIN), "auth");
        assert_eq!(subdomain_from_host("[::1]:3000", FALLBACK_SUBDOMAIN), "auth");
    }

    #[test]
    fn apex_domain_falls_back() {
        assert_eq!(subdomain_from_host("example.com", FALLBACK_SUBDOMAIN), "auth");
    }

    #[test]
    fn www_is_not_a_tenant() {
        assert_eq!(subdomain_from_host("www.example.com", FALLBACK_SUBDOMAIN), "auth");
    }

    #[test]
    fn invalid_label_falls_back() {
        assert_eq!(
            subdomain_from_host("ac_me.example.com", FALLBACK_SUBDOMAIN),
            "auth"
        );
        assert_eq!(subdomain_from_host("", FALLBACK_SUBDOMAIN), "auth");
    }

    #[test]
    fn custom_fallback_is_honored() {
        assert_eq!(subdomain_from_host("localhost", "demo"), "demo");
    }
}
