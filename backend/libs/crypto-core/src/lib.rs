//! Shared credential primitives for the betting backend
//!
//! - `jwt`: HS256 access token issuance and validation
//! - `password`: Argon2id password hashing

pub mod jwt;
pub mod password;

pub use password::{hash_password, verify_password, PasswordError};
