//! Client identification
//!
//! Sessions are bound to the client that created them. The binding is a
//! SHA-256 of the User-Agent, so a stolen cookie replayed from a different
//! browser is rejected.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

use crate::crypto::sha256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFingerprint {
    /// SHA-256 of the User-Agent (of the empty string when absent)
    pub hash: [u8; 32],
    pub ip: Option<IpAddr>,
    pub user_agent: Option<String>,
}

impl ClientFingerprint {
    pub fn new(hash: [u8; 32], ip: Option<IpAddr>, user_agent: Option<String>) -> Self {
        Self {
            hash,
            ip,
            user_agent,
        }
    }

    pub fn hash_vec(&self) -> Vec<u8> {
        self.hash.to_vec()
    }

    pub fn ip_string(&self) -> Option<String> {
        self.ip.map(|ip| ip.to_string())
    }

    /// Whether a stored fingerprint hash belongs to this client
    pub fn matches(&self, stored: &[u8]) -> bool {
        crate::crypto::constant_time_eq(&self.hash, stored)
    }
}

/// Fingerprint the client from its headers
///
/// A missing User-Agent is fingerprinted as the empty string rather than
/// rejected; API clients and scripts often omit it.
pub fn extract_fingerprint(headers: &HeaderMap, peer_ip: Option<IpAddr>) -> ClientFingerprint {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let hash = sha256(user_agent.as_deref().unwrap_or_default().as_bytes());

    ClientFingerprint::new(hash, extract_client_ip(headers, peer_ip), user_agent)
}

/// First hop of X-Forwarded-For, else the peer address
pub fn extract_client_ip(headers: &HeaderMap, peer_ip: Option<IpAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .or(peer_ip)
}
