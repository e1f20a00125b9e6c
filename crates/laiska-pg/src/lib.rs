//! PostgreSQL integration.
//!
//! ## Connectivity
//!
//! - [`db()`]: Establishes a database connection
//! - [`migrate()`]: Creates tables and indices for a [`Schema`]
//!
//! ## Table Names
//!
//! Constants for all persistent entities: users, sensors, readings, leases.
mod schema;

pub use schema::*;

use std::sync::Arc;
use tokio_postgres::Client;

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Establishes a database connection.
///
/// Returns an `Arc<Client>` suitable for sharing across async tasks.
/// The connection task lives until the last clone of the client is dropped.
pub async fn db(url: &str) -> Result<Arc<Client>, PgErr> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(url, tls).await?;
    tokio::spawn(async move {
        match connection.await {
            Ok(()) => log::info!("database connection closed"),
            Err(e) => log::error!("database connection failed: {}", e),
        }
    });
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await?;
    Ok(Arc::new(client))
}

/// Creates the table and its indices if they do not exist.
pub async fn migrate<S: Schema>(client: &Client) -> Result<(), PgErr> {
    log::debug!("migrating {}", S::name());
    client.batch_execute(S::creates()).await?;
    client.batch_execute(S::indices()).await?;
    Ok(())
}

/// Table for registered user accounts.
#[rustfmt::skip]
pub const USERS:    &str = "app_users";
/// Table for registered sensors and their device secrets.
#[rustfmt::skip]
pub const SENSORS:  &str = "registered_sensors";
/// Table for append-only sensor readings.
#[rustfmt::skip]
pub const READINGS: &str = "sensor_readings";
/// Table for live session leases.
#[rustfmt::skip]
pub const LEASES:   &str = "leased_jwt_tokens";
