//! Credentials, sessions, and request gates.
//!
//! JWT sessions backed by a server-side lease table, with Argon2id
//! password hashing. A token is only accepted while it both verifies
//! and still has a lease; logout removes the leases.
//!
//! ## Credentials
//!
//! - [`Hasher`]: Argon2id digests under a configured pepper
//! - [`Crypto`]: Token issuance and verification
//! - [`Claims`]: Token payload
//!
//! ## Gates
//!
//! - [`validate`]: The session check every protected request runs
//! - [`Auth`]: Extractor that runs [`validate`]
//! - [`Admin`]: Extractor for the administrative shared secret
//! - [`ApiError`]: Uniform JSON error responses
mod claims;
mod crypto;
mod dto;
mod error;
mod handlers;
mod middleware;
mod password;
mod validator;

pub use claims::*;
pub use crypto::*;
pub use dto::*;
pub use error::*;
pub use handlers::*;
pub use middleware::*;
pub use password::*;
pub use validator::*;

/// JSON body configuration that renders extraction failures as [`ApiError::Validation`].
pub fn json_config() -> actix_web::web::JsonConfig {
    actix_web::web::JsonConfig::default()
        .error_handler(|err, _| ApiError::Validation(err.to_string()).into())
}
