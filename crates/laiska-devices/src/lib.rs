//! Sensor registration and device-authenticated readings.
//!
//! A sensor proves itself with the shared secret it was registered with.
//! Owned sensors additionally require the submission to name their owner.
mod authenticator;
mod dto;
mod handlers;

pub use authenticator::*;
pub use dto::*;
pub use handlers::*;
