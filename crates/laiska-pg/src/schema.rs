/// Schema metadata for PostgreSQL tables.
///
/// Provides compile-time SQL for table creation and indexing. All methods
/// return `&'static str` so statements can be assembled with
/// `const_format::concatcp!` next to the type they describe.
///
/// This trait contains no I/O. [`migrate`](crate::migrate) executes it.
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns `CREATE TABLE IF NOT EXISTS` DDL statement.
    fn creates() -> &'static str;
    /// Returns `CREATE INDEX IF NOT EXISTS` statements for all indices.
    fn indices() -> &'static str;
}
