use super::*;
use laiska_core::ID;

/// Account persistence.
#[async_trait::async_trait]
pub trait Users: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<(), StoreError>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn user_by_id(&self, id: ID<User>) -> Result<Option<User>, StoreError>;
    /// Deletes the account and every lease it holds.
    async fn delete_user(&self, email: &str) -> Result<(), StoreError>;
}

/// Session leases. The sole source of truth for whether a token is live.
#[async_trait::async_trait]
pub trait Leases: Send + Sync {
    async fn record(&self, lease: &Lease) -> Result<(), StoreError>;
    async fn exists(&self, user: ID<User>, token: &str) -> Result<bool, StoreError>;
    /// Removes all leases of a user in one step.
    /// A user without leases yields [`StoreError::Missing`].
    async fn revoke_all(&self, user: ID<User>) -> Result<u64, StoreError>;
}

/// Sensor registry.
#[async_trait::async_trait]
pub trait Sensors: Send + Sync {
    /// Fails with [`StoreError::Conflict`] if the identifier is taken.
    async fn register(&self, sensor: &Sensor) -> Result<(), StoreError>;
    async fn sensor(&self, id: ID<Sensor>) -> Result<Option<Sensor>, StoreError>;
    async fn sensors_of(&self, owner: ID<User>) -> Result<Vec<Sensor>, StoreError>;
    async fn delete_sensor(&self, id: ID<Sensor>) -> Result<(), StoreError>;
}

/// Append-only reading log.
#[async_trait::async_trait]
pub trait Readings: Send + Sync {
    async fn append(&self, reading: &Reading) -> Result<(), StoreError>;
    async fn readings(&self, sensor: ID<Sensor>, user: ID<User>)
    -> Result<Vec<Reading>, StoreError>;
}

/// Everything the request handlers need from persistence.
#[async_trait::async_trait]
pub trait Store: Users + Leases + Sensors + Readings {
    /// Round-trips to the backing store.
    async fn ping(&self) -> Result<(), StoreError>;
}
