//! In-memory activity log, used by tests and demo mode.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::sync::{Arc, RwLock};

use crate::activity::{
    domain::{LevelCount, LogEntry, LogFilter, LogLevel, LogStats},
    ports::{ActivityLogError, ActivityLogRepository, ActivityLogResult},
};
use crate::pagination::{Page, PageRequest};

/// Thread-safe in-memory activity log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActivityLog {
    entries: Arc<RwLock<Vec<LogEntry>>>,
}

impl InMemoryActivityLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> ActivityLogError {
    ActivityLogError::persistence(std::io::Error::other(err.to_string()))
}

fn count<I: Iterator>(entries: I) -> u64 {
    u64::try_from(entries.count()).unwrap_or(u64::MAX)
}

#[async_trait]
impl ActivityLogRepository for InMemoryActivityLog {
    async fn append(&self, entry: &LogEntry) -> ActivityLogResult<()> {
        let mut entries = self.entries.write().map_err(lock_error)?;
        entries.push(entry.clone());
        Ok(())
    }

    async fn list(
        &self,
        filter: &LogFilter,
        page: PageRequest,
    ) -> ActivityLogResult<Page<LogEntry>> {
        let entries = self.entries.read().map_err(lock_error)?;
        let mut matching: Vec<LogEntry> = entries
            .iter()
            .filter(|entry| entry.matches(filter))
            .cloned()
            .collect();
        matching.sort_by_key(|entry| Reverse(entry.created_at()));
        let total = count(matching.iter());
        Ok(Page::new(page.slice(&matching), total, page))
    }

    async fn recent(
        &self,
        after: Option<DateTime<Utc>>,
        limit: u32,
    ) -> ActivityLogResult<Vec<LogEntry>> {
        let entries = self.entries.read().map_err(lock_error)?;
        let mut matching: Vec<LogEntry> = entries
            .iter()
            .filter(|entry| after.is_none_or(|instant| entry.created_at() > instant))
            .cloned()
            .collect();
        matching.sort_by_key(LogEntry::created_at);
        matching.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(matching)
    }

    async fn stats(&self, since: DateTime<Utc>) -> ActivityLogResult<LogStats> {
        let entries = self.entries.read().map_err(lock_error)?;
        let levels = LogLevel::ALL
            .into_iter()
            .map(|level| LevelCount {
                level,
                count: count(entries.iter().filter(|entry| entry.level() == level)),
            })
            .filter(|level_count| level_count.count > 0)
            .collect();
        Ok(LogStats {
            total: count(entries.iter()),
            errors: count(
                entries
                    .iter()
                    .filter(|entry| entry.level() == LogLevel::Error),
            ),
            last_24h: count(entries.iter().filter(|entry| entry.created_at() >= since)),
            levels,
        })
    }
}
