use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;

use crate::{errors::StorageError, repositories::rate_limit::RateLimitStore};

/// Hit timestamps for one client, oldest first.
#[derive(Debug, Default)]
struct HitWindow {
    hits: VecDeque<i64>,
}

impl HitWindow {
    /// Removes hits at or before `cutoff`; returns how many went.
    fn evict(&mut self, cutoff: i64) -> usize {
        let before = self.hits.len();
        while self.hits.front().is_some_and(|&t| t <= cutoff) {
            self.hits.pop_front();
        }
        before - self.hits.len()
    }
}

type Key = String;

/// Process-local sliding-window limiter. State is lost on restart.
#[derive(Clone)]
pub struct MemoryRateLimiter {
    map: Arc<DashMap<Key, Arc<Mutex<HitWindow>>>>,
    limit: usize,
    window_secs: i64,
}

impl MemoryRateLimiter {
    pub fn new(limit: usize, window_secs: i64) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            limit,
            window_secs,
        }
    }

    fn get_window(&self, key: &str) -> Arc<Mutex<HitWindow>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }
        self.map
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(HitWindow::default())))
            .clone()
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimiter {
    async fn check_and_record(&self, ip: &str, now: i64) -> Result<bool, StorageError> {
        let window = self.get_window(ip);
        let mut w = window.lock();
        w.evict(now - self.window_secs);

        if w.hits.len() >= self.limit {
            return Ok(false);
        }
        w.hits.push_back(now);
        Ok(true)
    }

    async fn prune(&self, now: i64) -> Result<usize, StorageError> {
        let cutoff = now - self.window_secs;
        let mut removed = 0;

        self.map.retain(|_, window| {
            let mut w = window.lock();
            removed += w.evict(cutoff);
            !w.hits.is_empty()
        });

        Ok(removed)
    }

    async fn tracked_hits(&self) -> Result<usize, StorageError> {
        Ok(self.map.iter().map(|entry| entry.value().lock().hits.len()).sum())
    }
}
