//! Fixed-window request limiter keyed by client.

use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    resets_at: DateTime<Utc>,
}

/// Allows `limit` requests per client per window.
///
/// A client's window starts at its first request and is replaced by the
/// first request after it ends. Opening a window drops every other window
/// that has already ended, so idle clients do not accumulate.
pub struct FixedWindowLimiter<C: Clock + Send + Sync> {
    limit: u32,
    window: Duration,
    clock: Arc<C>,
    windows: Mutex<HashMap<String, Window>>,
}

impl<C: Clock + Send + Sync> FixedWindowLimiter<C> {
    /// Creates a limiter.
    #[must_use]
    pub fn new(limit: u32, window: Duration, clock: Arc<C>) -> Self {
        Self {
            limit,
            window,
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Records a request from `client`, returning `false` when it exceeds
    /// the limit.
    pub fn try_acquire(&self, client: &str) -> bool {
        let now = self.clock.utc();
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = windows
            .get_mut(client)
            .filter(|window| now <= window.resets_at)
        {
            if current.count >= self.limit {
                return false;
            }
            current.count = current.count.saturating_add(1);
            return true;
        }
        windows.retain(|_, window| now <= window.resets_at);
        windows.insert(
            client.to_owned(),
            Window {
                count: 1,
                resets_at: now + self.window,
            },
        );
        true
    }

    /// Returns the number of clients holding a window.
    #[must_use]
    pub fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
