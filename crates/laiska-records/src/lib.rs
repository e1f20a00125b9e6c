//! Persistent records and the store interface.
//!
//! ## Records
//!
//! - [`User`]: Registered account with its password digest
//! - [`Sensor`]: Registered device with its shared secret and optional owner
//! - [`Reading`]: Append-only measurement submitted by a sensor
//! - [`Lease`]: Marker that a session token is currently live
//!
//! ## Stores
//!
//! - [`Store`]: Umbrella over [`Users`], [`Leases`], [`Sensors`], [`Readings`]
//! - [`Postgres`]: Production store with a per-call deadline
//! - [`Memory`]: Process-local store for tests and local runs
mod error;
mod lease;
mod memory;
mod postgres;
mod reading;
mod repository;
mod sensor;
mod user;

pub use error::*;
pub use lease::*;
pub use memory::*;
pub use postgres::*;
pub use reading::*;
pub use repository::*;
pub use sensor::*;
pub use user::*;
