use super::escape_html;
use crate::domain::model::ListItem;

/// 渲染靜態列表：每個項目一個 `<li>`，依輸入順序，以穩定的 key 標記。
/// 沒有資料（`None` 或空陣列）時輸出 not-found 訊息。
pub fn render_list<T: ListItem>(items: Option<&[T]>, not_found: &str) -> String {
    match items {
        Some(items) if !items.is_empty() => {
            let entries: String = items
                .iter()
                .map(|item| {
                    format!(
                        r#"
    <li data-key="{}">{}</li>"#,
                        escape_html(item.key()),
                        escape_html(item.label())
                    )
                })
                .collect();
            format!("<ul>{}\n</ul>", entries)
        }
        _ => format!("<p>{}</p>", escape_html(not_found)),
    }
}
