use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use actix_web::HttpRequest;

/// Proxy headers consulted, most specific first.
const FORWARDED_HEADERS: [&str; 6] = [
    "cf-connecting-ip",
    "x-forwarded-for",
    "x-forwarded",
    "x-cluster-client-ip",
    "forwarded-for",
    "forwarded",
];

/// Extract the client's IP address from the request.
/// With `trust_forwarded_headers`, the first public address found in the proxy
/// headers wins; otherwise, or if none qualifies, the peer address is used.
pub fn get_client_ip(req: &HttpRequest, trust_forwarded_headers: bool) -> String {
    if trust_forwarded_headers {
        let from_headers = FORWARDED_HEADERS.iter().find_map(|name| {
            req.headers()
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .and_then(public_ip_from_header)
        });
        if let Some(ip) = from_headers {
            return ip.to_string();
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn public_ip_from_header(value: &str) -> Option<IpAddr> {
    let first = value.split(',').next()?.trim();
    // RFC 7239 style: `for=203.0.113.7`
    let candidate = first
        .split(';')
        .find_map(|part| part.trim().strip_prefix("for="))
        .unwrap_or(first)
        .trim_matches('"');

    candidate
        .parse::<IpAddr>()
        .ok()
        .filter(is_public)
}

pub fn is_public(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_public_v4(v4),
        IpAddr::V6(v6) => is_public_v6(v6),
    }
}

fn is_public_v4(ip: &Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    !(ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || a == 0
        || a >= 240
        || (a == 100 && (64..128).contains(&b)))
}

fn is_public_v6(ip: &Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_public_v4(&v4);
    }
    let first = ip.segments()[0];
    !(ip.is_loopback()
        || ip.is_unspecified()
        || (first & 0xfe00) == 0xfc00
        || (first & 0xffc0) == 0xfe80)
}
