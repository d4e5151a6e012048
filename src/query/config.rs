use std::time::Duration;

/// 單次重試等待的上限
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Configuration for query caching and retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// How long fetched data counts as fresh. Fresh data is served from the
    /// cache without a fetch; stale data is refetched.
    pub stale_time: Duration,

    /// How long an entry is retained before `QueryClient::gc` drops it.
    pub cache_time: Duration,

    /// Extra attempts after the first failed fetch.
    pub retry_attempts: u32,

    /// Base delay between attempts, doubled on every retry.
    pub retry_delay: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(0),
            cache_time: Duration::from_secs(5 * 60),
            retry_attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl QueryConfig {
    #[must_use]
    pub const fn new(stale_time: Duration, cache_time: Duration) -> Self {
        Self {
            stale_time,
            cache_time,
            retry_attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }

    #[must_use]
    pub const fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }

    /// 第 `attempt` 次重試前的等待時間：`retry_delay * 2^attempt`，最多 30 秒
    pub fn retry_delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.min(16);
        self.retry_delay.saturating_mul(factor).min(MAX_RETRY_DELAY)
    }

    /// 所有重試等待時間的總和，不含請求本身耗時
    pub fn total_retry_delay(&self) -> Duration {
        (0..self.retry_attempts)
            .map(|attempt| self.retry_delay_for(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}
