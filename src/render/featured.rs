use super::escape_html;
use crate::domain::model::ListItem;
use crate::query::{QueryError, QueryState};

/// 精選項目在頁面輸出當下的樣子
#[derive(Debug, Clone, PartialEq)]
pub enum FeaturedView<T> {
    /// 查詢尚未回報任何狀態（suspense placeholder）
    Suspended,
    Loading,
    Error(QueryError),
    /// 查詢成功；API 沒有這筆資料時為 `None`
    Ready(Option<T>),
    /// 查詢任務在正常錯誤路徑之外失敗（failure boundary）
    Boundary,
}

impl<T> FeaturedView<T> {
    pub fn state_name(&self) -> &'static str {
        match self {
            FeaturedView::Suspended => "suspended",
            FeaturedView::Loading => "loading",
            FeaturedView::Error(_) => "error",
            FeaturedView::Ready(_) => "success",
            FeaturedView::Boundary => "boundary",
        }
    }
}

impl<T> From<QueryState<Option<T>>> for FeaturedView<T> {
    fn from(state: QueryState<Option<T>>) -> Self {
        match state {
            QueryState::Idle => FeaturedView::Suspended,
            QueryState::Loading => FeaturedView::Loading,
            QueryState::Success { data, .. } => FeaturedView::Ready(data),
            QueryState::Error(err) => FeaturedView::Error(err),
        }
    }
}

/// 各頁面自己的精選區塊文字
#[derive(Debug, Clone, Copy)]
pub struct FeaturedLabels {
    /// e.g. "Featured Beer"
    pub heading: &'static str,
    /// failure boundary 的固定訊息
    pub boundary: &'static str,
}

pub const SUSPENSE_FALLBACK: &str = "Suspense fallback...";
pub const LOADING_TEXT: &str = "Loading...";

pub fn render_featured<T: ListItem>(view: &FeaturedView<T>, labels: &FeaturedLabels) -> String {
    let body = match view {
        FeaturedView::Suspended => format!("<h1>{}</h1>", SUSPENSE_FALLBACK),
        FeaturedView::Loading => format!("<span>{}</span>", LOADING_TEXT),
        FeaturedView::Error(err) => format!("<span>Error: {}</span>", escape_html(err.message())),
        FeaturedView::Ready(Some(item)) => format!(
            "<p>{}: {}</p>",
            escape_html(labels.heading),
            escape_html(item.label())
        ),
        FeaturedView::Ready(None) => String::new(),
        FeaturedView::Boundary => format!("<h2>{}</h2>", escape_html(labels.boundary)),
    };

    format!(
        r#"<section class="featured" data-state="{}">{}</section>"#,
        view.state_name(),
        body
    )
}
