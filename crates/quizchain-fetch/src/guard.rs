//! Address guard for direct asset fetches.
//!
//! Every URL fetched outside the browser session is resolved first and
//! rejected if any resolved address falls in a non-public range. The
//! accepted address is handed back so the caller can pin it on the HTTP
//! client and avoid a second, unchecked resolution.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use thiserror::Error;
use url::{Host, Url};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardRejection {
    #[error("scheme '{0}' is not fetchable")]
    Scheme(String),

    #[error("URL has no host")]
    MissingHost,

    #[error("could not resolve {host}: {reason}")]
    Resolution { host: String, reason: String },

    #[error("{host} resolved to no addresses")]
    NoAddresses { host: String },

    #[error("{host} resolves to non-public address {addr}")]
    ForbiddenAddress { host: String, addr: IpAddr },
}

/// A URL the guard accepted, with the address it was validated against.
#[derive(Debug, Clone)]
pub struct GuardedTarget {
    pub url: Url,
    /// Host name as written in the URL; `None` for IP literals.
    pub domain: Option<String>,
    pub addr: SocketAddr,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SsrfGuard;

impl SsrfGuard {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `url` and accept it only if every address is public.
    pub async fn check(&self, url: &Url) -> Result<GuardedTarget, GuardRejection> {
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(GuardRejection::Scheme(other.to_string())),
        }

        let port = url.port_or_known_default().unwrap_or(80);
        let host = url.host().ok_or(GuardRejection::MissingHost)?;

        let (domain, addrs) = match host {
            Host::Ipv4(ip) => (None, vec![SocketAddr::new(IpAddr::V4(ip), port)]),
            Host::Ipv6(ip) => (None, vec![SocketAddr::new(IpAddr::V6(ip), port)]),
            Host::Domain(name) => {
                let resolved: Vec<SocketAddr> = tokio::net::lookup_host((name, port))
                    .await
                    .map_err(|e| GuardRejection::Resolution {
                        host: name.to_string(),
                        reason: e.to_string(),
                    })?
                    .collect();
                (Some(name.to_string()), resolved)
            }
        };

        let host_label = domain
            .clone()
            .unwrap_or_else(|| url.host_str().unwrap_or_default().to_string());

        let first = *addrs.first().ok_or_else(|| GuardRejection::NoAddresses {
            host: host_label.clone(),
        })?;

        if let Some(bad) = addrs.iter().find(|a| is_forbidden_ip(a.ip())) {
            tracing::warn!("Guard rejected {} ({})", url, bad.ip());
            return Err(GuardRejection::ForbiddenAddress {
                host: host_label,
                addr: bad.ip(),
            });
        }

        Ok(GuardedTarget {
            url: url.clone(),
            domain,
            addr: first,
        })
    }
}

/// True if `ip` is not a globally routable unicast address.
pub fn is_forbidden_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_forbidden_v4(v4),
        IpAddr::V6(v6) => is_forbidden_v6(v6),
    }
}

fn is_forbidden_v4(ip: Ipv4Addr) -> bool {
    let [a, b, c, _] = ip.octets();

    ip.is_unspecified()
        || a == 0
        || ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_documentation()
        || ip.is_multicast()
        // shared address space 100.64.0.0/10
        || (a == 100 && (b & 0xc0) == 64)
        // IETF protocol assignments 192.0.0.0/24
        || (a == 192 && b == 0 && c == 0)
        // benchmarking 198.18.0.0/15
        || (a == 198 && (b & 0xfe) == 18)
        // reserved 240.0.0.0/4
        || a >= 240
}

fn is_forbidden_v6(ip: Ipv6Addr) -> bool {
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return is_forbidden_v4(mapped);
    }

    let first = ip.segments()[0];

    ip.is_unspecified()
        || ip.is_loopback()
        || ip.is_multicast()
        // unique local fc00::/7
        || (first & 0xfe00) == 0xfc00
        // link-local fe80::/10
        || (first & 0xffc0) == 0xfe80
        // documentation 2001:db8::/32
        || (first == 0x2001 && ip.segments()[1] == 0x0db8)
}
