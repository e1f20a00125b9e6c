use laiska_core::ID;
use laiska_core::Unique;

/// Registered account. The digest is whatever the password hasher produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: ID<Self>,
    email: String,
    digest: String,
}

impl User {
    pub fn new(id: ID<Self>, email: String, digest: String) -> Self {
        Self { id, email, digest }
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl Unique for User {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

mod schema {
    use super::*;
    use laiska_pg::*;

    impl Schema for User {
        fn name() -> &'static str {
            USERS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                USERS,
                " (
                    uuid        UUID PRIMARY KEY,
                    email       TEXT UNIQUE NOT NULL,
                    password    TEXT NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_users_email ON ",
                USERS,
                " (email);"
            )
        }
    }
}
