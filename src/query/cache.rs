use std::time::{Duration, Instant};

/// 快取中的一筆資料，附帶寫入時間與是否已被標記為過期
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: Instant,
    pub is_stale: bool,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            timestamp: Instant::now(),
            is_stale: false,
        }
    }

    /// 超過 `stale_time` 就視為過期；一旦過期不會自己回復
    pub fn check_staleness(&mut self, stale_time: Duration) -> bool {
        if self.timestamp.elapsed() > stale_time {
            self.is_stale = true;
        }
        self.is_stale
    }

    pub fn mark_stale(&mut self) {
        self.is_stale = true;
    }

    /// 是否在 `since` 之後寫入且尚未被作廢
    pub fn is_fresh_since(&self, since: Instant) -> bool {
        !self.is_stale && self.timestamp >= since
    }

    pub fn should_gc(&self, cache_time: Duration) -> bool {
        self.timestamp.elapsed() > cache_time
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CacheEntry<U> {
        CacheEntry {
            data: f(self.data),
            timestamp: self.timestamp,
            is_stale: self.is_stale,
        }
    }
}
