//! Platform Crate - Technical Infrastructure
//!
//! Technical building blocks with no domain meaning:
//! - Cryptographic helpers (SHA-256, HMAC, random tokens, Base64)
//! - Password hashing (Argon2id, NIST SP 800-63B policy)
//! - Cookie building and parsing
//! - Client fingerprinting for session binding

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
