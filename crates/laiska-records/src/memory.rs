use super::*;
use laiska_core::ID;
use laiska_core::Unique;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: HashMap<ID<User>, User>,
    leases: HashSet<Lease>,
    sensors: BTreeMap<ID<Sensor>, Sensor>,
    readings: Vec<Reading>,
}

/// Process-local store. One lock guards every table, so multi-row
/// operations like [`Leases::revoke_all`] are atomic to readers.
#[derive(Default)]
pub struct Memory {
    tables: RwLock<Tables>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Users for Memory {
    async fn create_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email() == user.email())
            || tables.users.contains_key(&user.id())
        {
            return Err(StoreError::Conflict("user already exists"));
        }
        tables.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email() == email)
            .cloned())
    }

    async fn user_by_id(&self, id: ID<User>) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn delete_user(&self, email: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let id = tables
            .users
            .values()
            .find(|u| u.email() == email)
            .map(|u| u.id())
            .ok_or(StoreError::Missing("no user found with email"))?;
        tables.users.remove(&id);
        tables.leases.retain(|l| l.user() != id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl Leases for Memory {
    async fn record(&self, lease: &Lease) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&lease.user()) {
            return Err(StoreError::Missing("no user found for lease"));
        }
        tables.leases.insert(lease.clone());
        Ok(())
    }

    async fn exists(&self, user: ID<User>, token: &str) -> Result<bool, StoreError> {
        let ref digest = Lease::digest(token);
        Ok(self
            .tables
            .read()
            .await
            .leases
            .iter()
            .any(|l| l.user() == user && l.hash() == digest))
    }

    async fn revoke_all(&self, user: ID<User>) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.leases.len();
        tables.leases.retain(|l| l.user() != user);
        match (before - tables.leases.len()) as u64 {
            0 => Err(StoreError::Missing("no login session for user found")),
            n => Ok(n),
        }
    }
}

#[async_trait::async_trait]
impl Sensors for Memory {
    async fn register(&self, sensor: &Sensor) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.sensors.contains_key(&sensor.id()) {
            return Err(StoreError::Conflict("sensor already registered"));
        }
        tables.sensors.insert(sensor.id(), sensor.clone());
        Ok(())
    }

    async fn sensor(&self, id: ID<Sensor>) -> Result<Option<Sensor>, StoreError> {
        Ok(self.tables.read().await.sensors.get(&id).cloned())
    }

    async fn sensors_of(&self, owner: ID<User>) -> Result<Vec<Sensor>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .sensors
            .values()
            .filter(|s| s.owner() == Some(owner))
            .cloned()
            .collect())
    }

    async fn delete_sensor(&self, id: ID<Sensor>) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .sensors
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::Missing("no sensor found with uuid"))
    }
}

#[async_trait::async_trait]
impl Readings for Memory {
    async fn append(&self, reading: &Reading) -> Result<(), StoreError> {
        self.tables.write().await.readings.push(reading.clone());
        Ok(())
    }

    async fn readings(
        &self,
        sensor: ID<Sensor>,
        user: ID<User>,
    ) -> Result<Vec<Reading>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .readings
            .iter()
            .filter(|r| r.sensor() == sensor && r.user() == Some(user))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl Store for Memory {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
