use std::net::IpAddr;

/// Extract the client address from proxy headers, in precedence order
/// `X-Forwarded-For` (first hop) → `X-Real-IP` → transport peer.
///
/// Each candidate must parse as a syntactically valid IPv4/IPv6
/// address; a malformed value is skipped, not trusted. Header values
/// arrive as plain strings so this stays independent of the web
/// framework.
pub fn client_ip(
    forwarded_for: Option<&str>,
    real_ip: Option<&str>,
    peer: Option<IpAddr>,
) -> Option<IpAddr> {
    if let Some(xff) = forwarded_for {
        let first = xff.split(',').next().unwrap_or_default().trim();
        if let Ok(addr) = first.parse::<IpAddr>() {
            return Some(addr);
        }
    }
    if let Some(real) = real_ip {
        if let Ok(addr) = real.trim().parse::<IpAddr>() {
            return Some(addr);
        }
    }
    peer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn forwarded_for_first_hop_wins() {
        let got = client_ip(
            Some("203.0.113.7, 10.0.0.1, 10.0.0.2"),
            Some("198.51.100.1"),
            Some(ip("192.0.2.1")),
        );
        assert_eq!(got, Some(ip("203.0.113.7")));
    }

    #[test]
    fn real_ip_when_forwarded_missing_or_bad() {
        assert_eq!(
            client_ip(None, Some("198.51.100.1"), Some(ip("192.0.2.1"))),
            Some(ip("198.51.100.1"))
        );
        assert_eq!(
            client_ip(Some("unknown"), Some("198.51.100.1"), None),
            Some(ip("198.51.100.1"))
        );
    }

    #[test]
    fn peer_address_is_last_resort() {
        assert_eq!(client_ip(None, None, Some(ip("192.0.2.1"))), Some(ip("192.0.2.1")));
        assert_eq!(client_ip(Some("garbage"), Some("also bad"), None), None);
    }

    #[test]
    fn ipv6_accepted() {
        assert_eq!(
            client_ip(Some("2001:db8::42"), None, None),
            Some(ip("2001:db8::42"))
        );
    }

    #[test]
    fn whitespace_tolerated() {
        assert_eq!(
            client_ip(Some("  203.0.113.7 , 10.0.0.1"), None, None),
            Some(ip("203.0.113.7"))
        );
    }
}
