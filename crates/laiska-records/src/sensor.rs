use super::*;
use laiska_core::ID;
use laiska_core::Unique;

/// Registered sensor. Unowned sensors accept readings for any asserted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sensor {
    id: ID<Self>,
    secret: String,
    owner: Option<ID<User>>,
}

impl Sensor {
    pub fn new(id: ID<Self>, secret: String, owner: Option<ID<User>>) -> Self {
        Self { id, secret, owner }
    }
    pub fn secret(&self) -> &str {
        &self.secret
    }
    pub fn owner(&self) -> Option<ID<User>> {
        self.owner
    }
}

impl Unique for Sensor {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

mod schema {
    use super::*;
    use laiska_pg::*;

    impl Schema for Sensor {
        fn name() -> &'static str {
            SENSORS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                SENSORS,
                " (
                    sensor_uuid UUID PRIMARY KEY,
                    secret      TEXT NOT NULL,
                    user_uuid   UUID
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_sensors_user ON ",
                SENSORS,
                " (user_uuid);"
            )
        }
    }
}
