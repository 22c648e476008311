//! `PostgreSQL` implementation of the activity log.

use super::{models::LogEntryRow, schema::activity_logs};
use crate::activity::{
    domain::{
        LevelCount, LogEntry, LogEntryId, LogFilter, LogLevel, LogStats, PersistedLogEntryData,
    },
    ports::{ActivityLogError, ActivityLogRepository, ActivityLogResult},
};
use crate::agent::domain::AgentId;
use crate::pagination::{Page, PageRequest};
use crate::persistence::{PgPool, contains_pattern, count_to_total, page_bounds, run_blocking};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;

/// `PostgreSQL`-backed activity log.
#[derive(Debug, Clone)]
pub struct PostgresActivityLog {
    pool: PgPool,
}

impl PostgresActivityLog {
    /// Creates a new log from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> ActivityLogResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ActivityLogResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(&self.pool, ActivityLogError::from_boxed, f).await
    }
}

#[async_trait]
impl ActivityLogRepository for PostgresActivityLog {
    async fn append(&self, entry: &LogEntry) -> ActivityLogResult<()> {
        let row = to_row(entry);
        self.run(move |connection| {
            diesel::insert_into(activity_logs::table)
                .values(&row)
                .execute(connection)
                .map_err(ActivityLogError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn list(
        &self,
        filter: &LogFilter,
        page: PageRequest,
    ) -> ActivityLogResult<Page<LogEntry>> {
        let filter_owned = filter.clone();
        let (limit, offset) = page_bounds(page);

        self.run(move |connection| {
            let total: i64 = filtered_query(&filter_owned)
                .count()
                .get_result(connection)
                .map_err(ActivityLogError::persistence)?;
            let rows = filtered_query(&filter_owned)
                .order(activity_logs::created_at.desc())
                .limit(limit)
                .offset(offset)
                .select(LogEntryRow::as_select())
                .load::<LogEntryRow>(connection)
                .map_err(ActivityLogError::persistence)?;
            let items = rows
                .into_iter()
                .map(row_to_entry)
                .collect::<ActivityLogResult<Vec<_>>>()?;
            Ok(Page::new(items, count_to_total(total), page))
        })
        .await
    }

    async fn recent(
        &self,
        after: Option<DateTime<Utc>>,
        limit: u32,
    ) -> ActivityLogResult<Vec<LogEntry>> {
        self.run(move |connection| {
            let mut query = activity_logs::table.into_boxed();
            if let Some(instant) = after {
                query = query.filter(activity_logs::created_at.gt(instant));
            }
            let rows = query
                .order(activity_logs::created_at.asc())
                .limit(i64::from(limit))
                .select(LogEntryRow::as_select())
                .load::<LogEntryRow>(connection)
                .map_err(ActivityLogError::persistence)?;
            rows.into_iter().map(row_to_entry).collect()
        })
        .await
    }

    async fn stats(&self, since: DateTime<Utc>) -> ActivityLogResult<LogStats> {
        self.run(move |connection| {
            let total: i64 = activity_logs::table
                .count()
                .get_result(connection)
                .map_err(ActivityLogError::persistence)?;
            let last_24h: i64 = activity_logs::table
                .filter(activity_logs::created_at.ge(since))
                .count()
                .get_result(connection)
                .map_err(ActivityLogError::persistence)?;
            let grouped: Vec<(String, i64)> = activity_logs::table
                .group_by(activity_logs::level)
                .select((activity_logs::level, count_star()))
                .load(connection)
                .map_err(ActivityLogError::persistence)?;

            let mut levels = grouped
                .into_iter()
                .map(|(level, count)| {
                    LogLevel::try_from(level.as_str())
                        .map(|parsed| LevelCount {
                            level: parsed,
                            count: count_to_total(count),
                        })
                        .map_err(ActivityLogError::invalid_persisted_data)
                })
                .collect::<ActivityLogResult<Vec<_>>>()?;
            levels.sort_by_key(|level_count| level_count.level);
            let errors = levels
                .iter()
                .find(|level_count| level_count.level == LogLevel::Error)
                .map_or(0, |level_count| level_count.count);

            Ok(LogStats {
                total: count_to_total(total),
                errors,
                last_24h: count_to_total(last_24h),
                levels,
            })
        })
        .await
    }
}

fn filtered_query(filter: &LogFilter) -> activity_logs::BoxedQuery<'static, Pg> {
    let mut query = activity_logs::table.into_boxed();
    if let Some(level) = filter.level {
        query = query.filter(activity_logs::level.eq(level.as_str()));
    }
    if let Some(needle) = filter.source.as_deref() {
        query = query.filter(activity_logs::source.ilike(contains_pattern(needle)));
    }
    if let Some(agent_id) = filter.agent_id {
        query = query.filter(activity_logs::agent_id.eq(agent_id.into_inner()));
    }
    query
}

fn to_row(entry: &LogEntry) -> LogEntryRow {
    LogEntryRow {
        id: entry.id().into_inner(),
        level: entry.level().as_str().to_owned(),
        message: entry.message().to_owned(),
        source: entry.source().to_owned(),
        agent_id: entry.agent_id().map(AgentId::into_inner),
        metadata: entry.metadata().map(str::to_owned),
        created_at: entry.created_at(),
    }
}

fn row_to_entry(row: LogEntryRow) -> ActivityLogResult<LogEntry> {
    let level =
        LogLevel::try_from(row.level.as_str()).map_err(ActivityLogError::invalid_persisted_data)?;
    Ok(LogEntry::from_persisted(PersistedLogEntryData {
        id: LogEntryId::from_uuid(row.id),
        level,
        message: row.message,
        source: row.source,
        agent_id: row.agent_id.map(AgentId::from_uuid),
        metadata: row.metadata,
        created_at: row.created_at,
    }))
}
