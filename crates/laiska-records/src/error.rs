use laiska_pg::PgErr;

/// Failures surfaced by any [`Store`](crate::Store) implementation.
#[derive(Debug)]
pub enum StoreError {
    /// The backing database rejected or failed the call.
    Database(PgErr),
    /// A uniqueness constraint rejected the write.
    Conflict(&'static str),
    /// A delete or revoke touched no rows.
    Missing(&'static str),
    /// The call did not finish before the store deadline.
    Timeout,
}

impl StoreError {
    /// Replaces the generic conflict message with a domain-specific one.
    pub fn or_conflict(self, what: &'static str) -> Self {
        match self {
            Self::Conflict(_) => Self::Conflict(what),
            other => other,
        }
    }
}

impl From<PgErr> for StoreError {
    fn from(e: PgErr) -> Self {
        match e.code() {
            Some(code) if *code == tokio_postgres::error::SqlState::UNIQUE_VIOLATION => {
                Self::Conflict("duplicate key")
            }
            _ => Self::Database(e),
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database(e) => write!(f, "database error: {}", e),
            Self::Conflict(s) => write!(f, "conflict: {}", s),
            Self::Missing(s) => write!(f, "missing: {}", s),
            Self::Timeout => write!(f, "store deadline exceeded"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(e) => Some(e),
            _ => None,
        }
    }
}
