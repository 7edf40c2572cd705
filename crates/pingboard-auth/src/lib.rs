//! # pingboard-auth
//!
//! Credential handling for Pingboard.
//!
//! ## Modules
//!
//! - `jwt` — JWT token creation and validation
//! - `password` — Argon2id password hashing
//! - `store` — in-memory user credential store

pub mod jwt;
pub mod password;
pub mod store;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
pub use store::UserStore;
