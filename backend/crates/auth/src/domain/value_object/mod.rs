//! Value Object Module

pub mod email;
pub mod provider;
pub mod public_id;
pub mod user_password;
