//! Keyed cache-and-fetch queries.
//!
//! A [`QueryClient`] owns the process-wide query cache. It is built once at
//! startup and handed to whoever needs it as `Arc<QueryClient>`; nothing
//! here is global. A [`Query`] pairs a cache key with a fetcher and drives
//! the `Idle -> Loading -> Success | Error` state machine, publishing every
//! transition on a `watch` channel so callers can observe the current state
//! while the fetch is still running.

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::{watch, Mutex};

use super::cache::CacheEntry;
use super::config::QueryConfig;
use crate::utils::error::SiteError;

/// Error surfaced by a query. The display text is the failure's own message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("{0}")]
    Fetch(String),

    #[error("{0}")]
    Network(String),
}

impl QueryError {
    pub fn message(&self) -> &str {
        match self {
            QueryError::Fetch(message) | QueryError::Network(message) => message,
        }
    }
}

impl From<SiteError> for QueryError {
    fn from(err: SiteError) -> Self {
        match err {
            SiteError::ApiError(e) => QueryError::Network(e.to_string()),
            // GraphQL 錯誤直接顯示伺服器回傳的訊息
            SiteError::GraphqlError { messages } => QueryError::Fetch(messages.join("; ")),
            other => QueryError::Fetch(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// No fetch has been attempted yet.
    Idle,
    Loading,
    Success {
        data: T,
        is_stale: bool,
    },
    Error(QueryError),
}

impl<T> QueryState<T> {
    pub const fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success { data, .. } => Some(data),
            _ => None,
        }
    }

    pub const fn error(&self) -> Option<&QueryError> {
        match self {
            QueryState::Error(err) => Some(err),
            _ => None,
        }
    }

    pub const fn is_idle(&self) -> bool {
        matches!(self, QueryState::Idle)
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, QueryState::Success { .. })
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, QueryState::Error(_))
    }
}

type AnyData = Arc<dyn Any + Send + Sync>;

#[derive(Debug, Clone)]
pub struct QueryClient {
    cache: Arc<DashMap<String, CacheEntry<AnyData>>>,
    in_flight: Arc<DashMap<String, Arc<Mutex<()>>>>,
    config: QueryConfig,
}

impl QueryClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(QueryConfig::default())
    }

    #[must_use]
    pub fn with_config(config: QueryConfig) -> Self {
        Self {
            cache: Arc::new(DashMap::new()),
            in_flight: Arc::new(DashMap::new()),
            config,
        }
    }

    pub const fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// 取得快取資料（不論是否過期）
    pub fn get_query_data<T: Clone + Send + Sync + 'static>(&self, key: &str) -> Option<T> {
        self.get_cache::<T>(key).map(|entry| entry.data)
    }

    pub fn set_query_data<T: Clone + Send + Sync + 'static>(&self, key: &str, data: T) {
        let data: AnyData = Arc::new(data);
        self.cache.insert(key.to_string(), CacheEntry::new(data));
    }

    /// 將快取標記為過期，下一次 `Query::execute` 會重新抓取
    pub fn invalidate(&self, key: &str) -> bool {
        match self.cache.get_mut(key) {
            Some(mut entry) => {
                entry.mark_stale();
                tracing::debug!(key, "query invalidated");
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, key: &str) {
        self.cache.remove(key);
    }

    /// 移除超過 `cache_time` 的資料，回傳剩餘筆數
    pub fn gc(&self) -> usize {
        let cache_time = self.config.cache_time;
        self.cache.retain(|_, entry| !entry.should_gc(cache_time));
        self.cache.len()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn get_cache<T: Clone + Send + Sync + 'static>(&self, key: &str) -> Option<CacheEntry<T>> {
        let entry = self.cache.get(key).map(|entry| entry.value().clone())?;
        let data = entry.data.downcast_ref::<T>()?.clone();
        Some(entry.map(|_| data))
    }

    fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        self.in_flight
            .entry(key.to_string())
            .or_default()
            .value()
            .clone()
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

pub type Fetcher<V> = Arc<dyn Fn() -> BoxFuture<'static, Result<V, QueryError>> + Send + Sync>;

/// A keyed fetch bound to a [`QueryClient`].
///
/// `execute` serves fresh cached data without fetching, otherwise it fetches
/// (retrying per the client config) and stores the result. Concurrent
/// executions for the same key run one fetch; the others reuse its result.
pub struct Query<V> {
    key: String,
    fetcher: Fetcher<V>,
    client: Arc<QueryClient>,
    state_tx: watch::Sender<QueryState<V>>,
}

impl<V> Query<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new<F>(key: impl Into<String>, fetcher: F, client: Arc<QueryClient>) -> Self
    where
        F: Fn() -> BoxFuture<'static, Result<V, QueryError>> + Send + Sync + 'static,
    {
        let (state_tx, _) = watch::channel(QueryState::Idle);
        Self {
            key: key.into(),
            fetcher: Arc::new(fetcher),
            client,
            state_tx,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<V>> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> QueryState<V> {
        self.state_tx.borrow().clone()
    }

    pub async fn execute(&self) -> QueryState<V> {
        if let Some(mut cached) = self.client.get_cache::<V>(&self.key) {
            if !cached.check_staleness(self.client.config().stale_time) {
                tracing::debug!(key = %self.key, "serving fresh cached data");
                return self.publish(QueryState::Success {
                    data: cached.data,
                    is_stale: false,
                });
            }
        }

        self.publish(QueryState::Loading);
        let started = Instant::now();

        let lock = self.client.key_lock(&self.key);
        let _guard = lock.lock().await;

        // 等鎖期間可能已有其他呼叫者抓好資料
        if let Some(cached) = self.client.get_cache::<V>(&self.key) {
            if cached.is_fresh_since(started) {
                tracing::debug!(key = %self.key, "reusing result of concurrent fetch");
                return self.publish(QueryState::Success {
                    data: cached.data,
                    is_stale: false,
                });
            }
        }

        let state = match self.fetch_with_retry().await {
            Ok(data) => {
                self.client.set_query_data(&self.key, data.clone());
                QueryState::Success {
                    data,
                    is_stale: false,
                }
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "query failed");
                QueryState::Error(err)
            }
        };

        self.publish(state)
    }

    async fn fetch_with_retry(&self) -> Result<V, QueryError> {
        let config = self.client.config();
        let mut attempt = 0;

        loop {
            match (self.fetcher)().await {
                Ok(data) => return Ok(data),
                Err(err) if attempt < config.retry_attempts => {
                    let delay = config.retry_delay_for(attempt);
                    tracing::debug!(
                        key = %self.key,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying query"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn publish(&self, state: QueryState<V>) -> QueryState<V> {
        self.state_tx.send_replace(state.clone());
        state
    }
}
