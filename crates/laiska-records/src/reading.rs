use super::*;
use laiska_core::ID;
use serde::Serialize;

/// One submitted measurement. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    #[serde(rename = "sensorUUID")]
    sensor: ID<Sensor>,
    #[serde(rename = "sensorType")]
    kind: String,
    #[serde(rename = "sensorName")]
    name: String,
    #[serde(rename = "unixTime")]
    time: i64,
    value: f32,
    #[serde(rename = "userUUID")]
    user: Option<ID<User>>,
    #[serde(rename = "createdAt", serialize_with = "seconds")]
    created: std::time::SystemTime,
}

impl Reading {
    pub fn new(
        sensor: ID<Sensor>,
        kind: String,
        name: String,
        time: i64,
        value: f32,
        user: Option<ID<User>>,
    ) -> Self {
        Self {
            sensor,
            kind,
            name,
            time,
            value,
            user,
            created: std::time::SystemTime::now(),
        }
    }
    /// Rebuilds a stored reading with its original creation time.
    pub fn restore(self, created: std::time::SystemTime) -> Self {
        Self { created, ..self }
    }
    pub fn sensor(&self) -> ID<Sensor> {
        self.sensor
    }
    pub fn kind(&self) -> &str {
        &self.kind
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn time(&self) -> i64 {
        self.time
    }
    pub fn value(&self) -> f32 {
        self.value
    }
    pub fn user(&self) -> Option<ID<User>> {
        self.user
    }
    pub fn created(&self) -> std::time::SystemTime {
        self.created
    }
}

fn seconds<S>(time: &std::time::SystemTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    time.duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
        .serialize(serializer)
}

mod schema {
    use super::*;
    use laiska_pg::*;

    /// No foreign key to sensors: ownership is checked when the reading is written.
    impl Schema for Reading {
        fn name() -> &'static str {
            READINGS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                READINGS,
                " (
                    id          BIGSERIAL PRIMARY KEY,
                    sensor_uuid UUID NOT NULL,
                    sensor_type TEXT NOT NULL,
                    sensor_name TEXT NOT NULL,
                    unix_time   BIGINT NOT NULL CHECK (unix_time > 0),
                    user_uuid   UUID,
                    created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
                    value       REAL NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_readings_sensor_user ON ",
                READINGS,
                " (sensor_uuid, user_uuid);"
            )
        }
    }
}
