use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn location(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn site_name(&self) -> &str;
    fn site_title(&self) -> &str;
    fn beers_endpoint(&self) -> &str;
    fn countries_endpoint(&self) -> &str;
    fn featured_beer_id(&self) -> &str;
    fn featured_country_code(&self) -> &str;
    fn featured_timeout(&self) -> Duration;
    fn output_path(&self) -> &str;
    fn archive_filename(&self) -> Option<&str>;
}

/// 一個靜態頁面：建置時取得 props、讀取精選項目並輸出完整 HTML
#[async_trait]
pub trait Page: Send + Sync {
    /// 輸出檔名（不含副檔名）
    fn slug(&self) -> &str;
    fn title(&self) -> &str;
    async fn build(&self) -> Result<String>;
}
