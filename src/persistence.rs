//! Shared `PostgreSQL` plumbing for the Diesel adapters.
//!
//! Diesel connections are synchronous, so every adapter offloads its work
//! to the blocking thread pool through [`run_blocking`].

use crate::pagination::PageRequest;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool shared by all repositories.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Pooled connection handed to adapter closures.
pub type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Boxed error passed to adapter error constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Builds a connection pool for the given database URL.
///
/// # Errors
///
/// Returns [`PoolError`] when the pool cannot establish its first
/// connection.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build(manager)
}

/// Checks out a connection and runs `f` on the blocking thread pool.
///
/// Pool and join failures are converted with `map_err` so each adapter
/// keeps its own error type.
pub(crate) async fn run_blocking<F, T, E, M>(pool: &PgPool, map_err: M, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: Fn(BoxError) -> E + Clone + Send + 'static,
{
    let shared = pool.clone();
    let pool_err = map_err.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = shared.get().map_err(|err| pool_err(Box::new(err)))?;
        f(&mut connection)
    })
    .await
    .map_err(|err| map_err(Box::new(err)))?
}

/// Returns the violated constraint name when `err` is a unique violation.
///
/// An empty string is returned when the server did not report a name.
pub(crate) fn unique_violation(err: &DieselError) -> Option<&str> {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Some(info.constraint_name().unwrap_or_default())
        }
        _ => None,
    }
}

/// Returns `true` when `err` is a foreign key violation.
pub(crate) const fn is_foreign_key_violation(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)
    )
}

/// Converts an unsigned domain counter into its `INTEGER` column value.
pub(crate) fn counter_to_column(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Converts an `INTEGER` column value back into an unsigned counter.
pub(crate) fn column_to_counter(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

/// Returns the `LIMIT` and `OFFSET` values for a page request.
pub(crate) fn page_bounds(page: PageRequest) -> (i64, i64) {
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    (i64::from(page.limit()), offset)
}

/// Converts a `COUNT(*)` result into an unsigned total.
pub(crate) fn count_to_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// Builds an `ILIKE` pattern matching `needle` anywhere, escaping wildcards.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
