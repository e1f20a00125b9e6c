use super::*;
use laiska_core::ID;

/// Server-side marker that a specific token is live for a user.
///
/// Only the SHA-256 of the token is held, so the lease table
/// cannot be replayed as a list of bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lease {
    user: ID<User>,
    digest: String,
}

impl Lease {
    pub fn new(user: ID<User>, token: &str) -> Self {
        Self {
            user,
            digest: Self::digest(token),
        }
    }
    pub fn user(&self) -> ID<User> {
        self.user
    }
    pub fn hash(&self) -> &str {
        &self.digest
    }
    pub fn digest(token: &str) -> String {
        use sha2::Digest;
        hex::encode(sha2::Sha256::digest(token.as_bytes()))
    }
}

mod schema {
    use super::*;
    use laiska_pg::*;

    impl Schema for Lease {
        fn name() -> &'static str {
            LEASES
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                LEASES,
                " (
                    user_uuid   UUID NOT NULL REFERENCES ",
                USERS,
                "(uuid) ON DELETE CASCADE,
                    token_hash  TEXT NOT NULL,
                    PRIMARY KEY (user_uuid, token_hash)
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_leases_user ON ",
                LEASES,
                " (user_uuid);"
            )
        }
    }
}
