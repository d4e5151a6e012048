use crate::api::ApiClient;
use crate::config::{cli::LocalStorage, SiteConfig};
use crate::domain::ports::{ConfigProvider, Page, Storage};
use crate::pages::{self, PageContext};
use crate::query::QueryClient;
use crate::render;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const INDEX_FILE: &str = "index.html";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Serialize)]
pub struct PageOutput {
    pub slug: String,
    pub title: String,
    pub file: String,
    pub bytes: usize,
}

#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output_path: String,
    pub pages: Vec<PageOutput>,
    pub archive_path: Option<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    site: &'a str,
    generated_at: DateTime<Utc>,
    pages: &'a [PageOutput],
    #[serde(skip_serializing_if = "Option::is_none")]
    archive: Option<&'a str>,
}

/// 依序建置每個頁面並寫入 storage，最後輸出首頁、manifest 與（選用的）zip 封存
pub struct SiteGenerator<S: Storage> {
    storage: S,
    pages: Vec<Box<dyn Page>>,
    site_name: String,
    site_title: String,
    archive_filename: Option<String>,
}

impl<S: Storage> SiteGenerator<S> {
    pub fn new(storage: S, site_name: impl Into<String>, site_title: impl Into<String>) -> Self {
        Self {
            storage,
            pages: Vec::new(),
            site_name: site_name.into(),
            site_title: site_title.into(),
            archive_filename: None,
        }
    }

    pub fn with_pages(mut self, pages: Vec<Box<dyn Page>>) -> Self {
        self.pages.extend(pages);
        self
    }

    pub fn with_archive(mut self, filename: Option<String>) -> Self {
        self.archive_filename = filename;
        self
    }

    pub async fn run(&self) -> Result<BuildReport> {
        tracing::info!("🚀 Starting site build ({} pages)", self.pages.len());

        // 先在記憶體中建好所有頁面；任何一頁失敗就中止，不寫入任何檔案
        let mut built = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            tracing::info!(page = page.slug(), "Building page");

            let html = page.build().await.inspect_err(|e| {
                tracing::error!(page = page.slug(), error = %e, "❌ Page build failed");
            })?;
            built.push((page, html));
        }

        let mut outputs = Vec::with_capacity(built.len());
        let mut files: Vec<(String, Vec<u8>)> = Vec::new();

        for (page, html) in built {
            let file = format!("{}.html", page.slug());
            self.storage.write_file(&file, html.as_bytes()).await?;
            tracing::debug!(file = %file, bytes = html.len(), "Page written");

            outputs.push(PageOutput {
                slug: page.slug().to_string(),
                title: page.title().to_string(),
                file: file.clone(),
                bytes: html.len(),
            });
            files.push((file, html.into_bytes()));
        }

        let links: Vec<(String, String)> = outputs
            .iter()
            .map(|o| (o.file.clone(), o.title.clone()))
            .collect();
        let index = render::render_index(&self.site_title, &links);
        self.storage.write_file(INDEX_FILE, index.as_bytes()).await?;
        files.push((INDEX_FILE.to_string(), index.into_bytes()));

        let generated_at = Utc::now();
        let manifest = Manifest {
            site: &self.site_name,
            generated_at,
            pages: &outputs,
            archive: self.archive_filename.as_deref(),
        };
        let manifest_json = serde_json::to_vec_pretty(&manifest)?;
        self.storage.write_file(MANIFEST_FILE, &manifest_json).await?;
        files.push((MANIFEST_FILE.to_string(), manifest_json));

        let archive_path = match &self.archive_filename {
            Some(filename) => {
                let zip_data = build_archive(&files)?;
                tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
                self.storage.write_file(filename, &zip_data).await?;
                Some(self.storage.location(filename))
            }
            None => None,
        };

        tracing::info!("✅ Site build finished: {} pages", outputs.len());

        Ok(BuildReport {
            output_path: self.storage.location(""),
            pages: outputs,
            archive_path,
            generated_at,
        })
    }
}

/// 依設定建出整個站台：建立查詢快取與 HTTP 客戶端、組裝頁面並輸出到本機目錄
pub async fn build_site(config: &SiteConfig) -> Result<BuildReport> {
    // 查詢快取在啟動時建立一次，注入給所有頁面
    let query_client = Arc::new(QueryClient::with_config(config.query_config()));
    let api_client = ApiClient::new(config.http_timeout(), config.user_agent())?;
    let ctx = PageContext::new(query_client, config.featured_timeout(), config.site_title());

    let site_pages = pages::build_pages(config, &config.site.pages, api_client, ctx);
    let storage = LocalStorage::new(config.output_path().to_string());

    SiteGenerator::new(storage, config.site_name(), config.site_title())
        .with_pages(site_pages)
        .with_archive(config.archive_filename().map(str::to_string))
        .run()
        .await
}

fn build_archive(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, data) in files {
        zip.start_file(name.as_str(), SimpleFileOptions::default())?;
        zip.write_all(data)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
