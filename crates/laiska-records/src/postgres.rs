use super::*;
use laiska_core::ID;
use laiska_core::Unique;
use laiska_pg::*;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_postgres::Client;

/// PostgreSQL-backed store. Every call is bounded by `deadline`.
#[derive(Clone)]
pub struct Postgres {
    client: Arc<Client>,
    deadline: Duration,
}

impl Postgres {
    pub fn new(client: Arc<Client>, deadline: Duration) -> Self {
        Self { client, deadline }
    }
    /// Creates every table this store reads or writes.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        laiska_pg::migrate::<User>(&self.client).await?;
        laiska_pg::migrate::<Sensor>(&self.client).await?;
        laiska_pg::migrate::<Reading>(&self.client).await?;
        laiska_pg::migrate::<Lease>(&self.client).await?;
        Ok(())
    }
    async fn bounded<T, F>(&self, query: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, PgErr>> + Send,
    {
        bounded(self.deadline, query).await
    }
}

/// Runs `query` under `deadline`, mapping elapsed time to [`StoreError::Timeout`].
pub async fn bounded<T, F>(deadline: Duration, query: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, PgErr>>,
{
    tokio::time::timeout(deadline, query)
        .await
        .map_err(|_| StoreError::Timeout)?
        .map_err(StoreError::from)
}

fn user(row: tokio_postgres::Row) -> User {
    User::new(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        row.get::<_, String>(1),
        row.get::<_, String>(2),
    )
}

fn sensor(row: tokio_postgres::Row) -> Sensor {
    Sensor::new(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        row.get::<_, String>(1),
        row.get::<_, Option<uuid::Uuid>>(2).map(ID::from),
    )
}

fn reading(row: tokio_postgres::Row) -> Reading {
    Reading::new(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        row.get::<_, String>(1),
        row.get::<_, String>(2),
        row.get::<_, i64>(3),
        row.get::<_, f32>(4),
        row.get::<_, Option<uuid::Uuid>>(5).map(ID::from),
    )
    .restore(row.get::<_, std::time::SystemTime>(6))
}

#[async_trait::async_trait]
impl Users for Postgres {
    async fn create_user(&self, user: &User) -> Result<(), StoreError> {
        self.bounded(self.client.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                USERS,
                " (uuid, email, password) VALUES ($1, $2, $3)"
            ),
            &[&user.id().inner(), &user.email(), &user.digest()],
        ))
        .await
        .map(|_| ())
        .map_err(|e| e.or_conflict("user already exists"))
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.bounded(self.client.query_opt(
            const_format::concatcp!(
                "SELECT uuid, email, password FROM ",
                USERS,
                " WHERE email = $1"
            ),
            &[&email],
        ))
        .await
        .map(|opt| opt.map(user))
    }

    async fn user_by_id(&self, id: ID<User>) -> Result<Option<User>, StoreError> {
        self.bounded(self.client.query_opt(
            const_format::concatcp!(
                "SELECT uuid, email, password FROM ",
                USERS,
                " WHERE uuid = $1"
            ),
            &[&id.inner()],
        ))
        .await
        .map(|opt| opt.map(user))
    }

    async fn delete_user(&self, email: &str) -> Result<(), StoreError> {
        // leases go with the user through ON DELETE CASCADE
        match self
            .bounded(self.client.execute(
                const_format::concatcp!("DELETE FROM ", USERS, " WHERE email = $1"),
                &[&email],
            ))
            .await?
        {
            0 => Err(StoreError::Missing("no user found with email")),
            _ => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl Leases for Postgres {
    async fn record(&self, lease: &Lease) -> Result<(), StoreError> {
        self.bounded(self.client.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                LEASES,
                " (user_uuid, token_hash) VALUES ($1, $2)"
            ),
            &[&lease.user().inner(), &lease.hash()],
        ))
        .await
        .map(|_| ())
    }

    async fn exists(&self, user: ID<User>, token: &str) -> Result<bool, StoreError> {
        let ref digest = Lease::digest(token);
        self.bounded(self.client.query_opt(
            const_format::concatcp!(
                "SELECT 1 FROM ",
                LEASES,
                " WHERE user_uuid = $1 AND token_hash = $2"
            ),
            &[&user.inner(), digest],
        ))
        .await
        .map(|opt| opt.is_some())
    }

    async fn revoke_all(&self, user: ID<User>) -> Result<u64, StoreError> {
        match self
            .bounded(self.client.execute(
                const_format::concatcp!("DELETE FROM ", LEASES, " WHERE user_uuid = $1"),
                &[&user.inner()],
            ))
            .await?
        {
            0 => Err(StoreError::Missing("no login session for user found")),
            n => Ok(n),
        }
    }
}

#[async_trait::async_trait]
impl Sensors for Postgres {
    async fn register(&self, sensor: &Sensor) -> Result<(), StoreError> {
        let owner = sensor.owner().map(|id| id.inner());
        self.bounded(self.client.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                SENSORS,
                " (sensor_uuid, secret, user_uuid) VALUES ($1, $2, $3)"
            ),
            &[&sensor.id().inner(), &sensor.secret(), &owner],
        ))
        .await
        .map(|_| ())
        .map_err(|e| e.or_conflict("sensor already registered"))
    }

    async fn sensor(&self, id: ID<Sensor>) -> Result<Option<Sensor>, StoreError> {
        self.bounded(self.client.query_opt(
            const_format::concatcp!(
                "SELECT sensor_uuid, secret, user_uuid FROM ",
                SENSORS,
                " WHERE sensor_uuid = $1"
            ),
            &[&id.inner()],
        ))
        .await
        .map(|opt| opt.map(sensor))
    }

    async fn sensors_of(&self, owner: ID<User>) -> Result<Vec<Sensor>, StoreError> {
        self.bounded(self.client.query(
            const_format::concatcp!(
                "SELECT sensor_uuid, secret, user_uuid FROM ",
                SENSORS,
                " WHERE user_uuid = $1 ORDER BY sensor_uuid"
            ),
            &[&owner.inner()],
        ))
        .await
        .map(|rows| rows.into_iter().map(sensor).collect())
    }

    async fn delete_sensor(&self, id: ID<Sensor>) -> Result<(), StoreError> {
        match self
            .bounded(self.client.execute(
                const_format::concatcp!("DELETE FROM ", SENSORS, " WHERE sensor_uuid = $1"),
                &[&id.inner()],
            ))
            .await?
        {
            0 => Err(StoreError::Missing("no sensor found with uuid")),
            _ => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl Readings for Postgres {
    async fn append(&self, reading: &Reading) -> Result<(), StoreError> {
        let user = reading.user().map(|id| id.inner());
        let created = reading.created();
        let time = reading.time();
        let value = reading.value();
        self.bounded(self.client.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                READINGS,
                " (sensor_uuid, sensor_type, sensor_name, unix_time, value, user_uuid, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)"
            ),
            &[
                &reading.sensor().inner(),
                &reading.kind(),
                &reading.name(),
                &time,
                &value,
                &user,
                &created,
            ],
        ))
        .await
        .map(|_| ())
    }

    async fn readings(
        &self,
        sensor: ID<Sensor>,
        user: ID<User>,
    ) -> Result<Vec<Reading>, StoreError> {
        self.bounded(self.client.query(
            const_format::concatcp!(
                "SELECT sensor_uuid, sensor_type, sensor_name, unix_time, value, user_uuid, created_at FROM ",
                READINGS,
                " WHERE sensor_uuid = $1 AND user_uuid = $2 ORDER BY id"
            ),
            &[&sensor.inner(), &user.inner()],
        ))
        .await
        .map(|rows| rows.into_iter().map(reading).collect())
    }
}

#[async_trait::async_trait]
impl Store for Postgres {
    async fn ping(&self) -> Result<(), StoreError> {
        self.bounded(self.client.execute("SELECT 1", &[]))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bounded_times_out_pending_queries() {
        let pending = std::future::pending::<Result<(), PgErr>>();
        let result = bounded(Duration::from_millis(10), pending).await;
        assert!(matches!(result, Err(StoreError::Timeout)));
    }

    #[tokio::test]
    async fn bounded_passes_results_through() {
        let ready = std::future::ready(Ok::<_, PgErr>(7));
        let result = bounded(Duration::from_secs(1), ready).await;
        assert!(matches!(result, Ok(7)));
    }
}
