use crate::query::{Query, QueryState};
use crate::render::FeaturedView;
use std::time::Duration;

/// 執行精選項目查詢，最多等待 `timeout`。
///
/// 查詢在獨立的 task 中執行：
/// - task 完成：顯示最終狀態（成功或錯誤）
/// - task panic 或被取消：回傳 `FeaturedView::Boundary`
/// - 逾時：顯示當下觀察到的狀態（尚未開始為 suspense，進行中為 loading）；
///   task 不會被取消，完成後結果仍會寫入快取
pub async fn load_featured<T>(query: Query<Option<T>>, timeout: Duration) -> FeaturedView<T>
where
    T: Clone + Send + Sync + 'static,
{
    let rx = query.subscribe();
    let key = query.key().to_string();
    let handle = tokio::spawn(async move { query.execute().await });

    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(state)) => state.into(),
        Ok(Err(join_error)) => {
            tracing::error!(key = %key, error = %join_error, "featured query task failed");
            FeaturedView::Boundary
        }
        Err(_) => {
            let state: QueryState<Option<T>> = rx.borrow().clone();
            tracing::warn!(
                key = %key,
                timeout_ms = timeout.as_millis() as u64,
                loading = state.is_loading(),
                "featured query still pending at render time"
            );
            state.into()
        }
    }
}
