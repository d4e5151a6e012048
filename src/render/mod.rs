//! HTML rendering for the generated pages.

pub mod featured;
pub mod list;

pub use featured::{render_featured, FeaturedLabels, FeaturedView};
pub use list::render_list;

use serde::Serialize;

/// 組成一個完整頁面所需的片段；`featured` 與 `list` 是已渲染好的 HTML
#[derive(Debug, Clone)]
pub struct PageDocument<'a> {
    pub site_title: &'a str,
    pub title: &'a str,
    pub heading: &'a str,
    pub featured: &'a str,
    pub list_heading: &'a str,
    pub list: &'a str,
    pub props_json: &'a str,
}

/// Page props serialized for embedding inside a `<script>` element.
pub fn props_json<P: Serialize>(props: &P) -> crate::utils::error::Result<String> {
    let json = serde_json::to_string(props)?;
    Ok(json.replace("</", "<\\/"))
}

pub fn render_page(doc: &PageDocument<'_>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | {site_title}</title>
<style>{styles}</style>
</head>
<body>
<nav><a href="index.html">{site_title}</a></nav>
<main>
<h1>{heading}</h1>
<br />
{featured}
<br />
<h3>{list_heading}</h3>
{list}
</main>
<script id="__PAGE_PROPS__" type="application/json">{props_json}</script>
</body>
</html>
"#,
        title = escape_html(doc.title),
        site_title = escape_html(doc.site_title),
        styles = STYLES,
        heading = escape_html(doc.heading),
        featured = doc.featured,
        list_heading = escape_html(doc.list_heading),
        list = doc.list,
        props_json = doc.props_json,
    )
}

/// 首頁：列出所有已產生的頁面
pub fn render_index(site_title: &str, pages: &[(String, String)]) -> String {
    let links: String = pages
        .iter()
        .map(|(href, title)| {
            format!(
                r#"
    <li><a href="{}">{}</a></li>"#,
                escape_html(href),
                escape_html(title)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{site_title}</title>
<style>{styles}</style>
</head>
<body>
<main>
<h1>{site_title}</h1>
<ul>{links}
</ul>
</main>
</body>
</html>
"#,
        site_title = escape_html(site_title),
        styles = STYLES,
        links = links,
    )
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const STYLES: &str = "body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0 auto; max-width: 720px; padding: 2rem; } .featured { padding: 0.5rem 0; }";
