//! Host checks applied to every page URL before it is requested, including
//! each redirect hop.

use std::net::{Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

use crate::fetcher::errors::FetchError;

/// Which hosts the page fetcher may contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostPolicy {
    /// Only publicly routable hosts. Loopback, private, link-local and
    /// otherwise reserved addresses are refused, as is `localhost`.
    #[default]
    PublicOnly,
    /// No host restrictions. Used against local test servers.
    AllowPrivate,
}

impl HostPolicy {
    pub fn check(&self, url: &Url) -> Result<(), FetchError> {
        if *self == Self::AllowPrivate {
            return Ok(());
        }

        let blocked = match url.host() {
            None => true,
            Some(Host::Domain(domain)) => is_localhost(domain),
            Some(Host::Ipv4(ip)) => is_private_ipv4(&ip),
            Some(Host::Ipv6(ip)) => is_private_ipv6(&ip),
        };

        if blocked {
            let host = url.host_str().unwrap_or_default().to_string();
            return Err(FetchError::BlockedHost(host));
        }
        Ok(())
    }
}

fn is_localhost(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    domain == "localhost" || domain.ends_with(".localhost")
}

fn is_private_ipv4(ip: &Ipv4Addr) -> bool {
    let octets = ip.octets();

    ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        // 0.0.0.0/8
        || octets[0] == 0
        // 100.64.0.0/10 (carrier-grade NAT)
        || (octets[0] == 100 && (octets[1] & 0b1100_0000) == 0b0100_0000)
        // 224.0.0.0/4 multicast and 240.0.0.0/4 reserved
        || octets[0] >= 224
}

fn is_private_ipv6(ip: &Ipv6Addr) -> bool {
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return is_private_ipv4(&mapped);
    }

    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || ip.is_multicast()
        // fe80::/10
        || (first & 0xffc0) == 0xfe80
        // fc00::/7
        || (first & 0xfe00) == 0xfc00
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(url: &str) -> Result<(), FetchError> {
        HostPolicy::PublicOnly.check(&Url::parse(url).unwrap())
    }

    #[test]
    fn test_blocks_internal_hosts() {
        for url in [
            "http://127.0.0.1/",
            "http://127.1.2.3:8080/admin",
            "http://localhost:3000/",
            "http://api.localhost/",
            "http://LOCALHOST./",
            "http://169.254.169.254/latest/meta-data/",
            "http://10.0.0.5/",
            "http://172.16.0.1/",
            "http://192.168.1.1/",
            "http://100.64.0.1/",
            "http://0.0.0.0/",
            "http://2130706433/",
            "http://[::1]/",
            "http://[::ffff:127.0.0.1]/",
            "http://[fe80::1]/",
            "http://[fd00::1]/",
        ] {
            assert!(
                matches!(check(url), Err(FetchError::BlockedHost(_))),
                "url: {url}"
            );
        }
    }

    #[test]
    fn test_allows_public_hosts() {
        for url in [
            "https://example.com/post",
            "http://93.184.216.34/",
            "https://[2606:2800:220:1:248:1893:25c8:1946]/",
            "https://localhost.example.com/",
        ] {
            assert!(check(url).is_ok(), "url: {url}");
        }
    }

    #[test]
    fn test_allow_private_skips_checks() {
        let url = Url::parse("http://127.0.0.1:8080/").unwrap();
        assert!(HostPolicy::AllowPrivate.check(&url).is_ok());
    }
}
