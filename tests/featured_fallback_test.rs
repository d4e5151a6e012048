use anyhow::Result;
use httpmock::prelude::*;
use punk_atlas::api::{ApiClient, PunkApi};
use punk_atlas::domain::model::{Beer, FeaturedBeerProps};
use punk_atlas::domain::ports::{ConfigProvider, Page};
use punk_atlas::pages::{beers::BeersPage, PageContext};
use punk_atlas::query::QueryConfig;
use punk_atlas::utils::validation::Validate;
use punk_atlas::{QueryClient, QueryKey, SiteConfig};
use std::sync::Arc;
use std::time::Duration;

fn beers_page(server: &MockServer, client: Arc<QueryClient>, timeout: Duration) -> BeersPage {
    BeersPage::new(
        PunkApi::new(ApiClient::default(), server.url("/v2/beers")),
        FeaturedBeerProps {
            id: "1".to_string(),
        },
        PageContext::new(client, timeout, "Punk Atlas"),
    )
}

fn mock_list(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/v2/beers");
        then.status(200)
            .json_body(serde_json::json!([{"id": 2, "name": "Trashy Blonde"}]));
    });
}

/// 精選項目逾時：頁面仍然輸出，精選區塊顯示 loading
#[tokio::test]
async fn test_slow_featured_renders_loading() -> Result<()> {
    let server = MockServer::start();
    mock_list(&server);
    server.mock(|when, then| {
        when.method(GET).path("/v2/beers/1");
        then.status(200)
            .delay(Duration::from_millis(1500))
            .json_body(serde_json::json!([{"id": 1, "name": "Buzz"}]));
    });

    let client = Arc::new(QueryClient::with_config(
        QueryConfig::default().with_retry(0, Duration::from_millis(1)),
    ));
    let html = beers_page(&server, client, Duration::from_millis(100))
        .build()
        .await?;

    assert!(html.contains(r#"<section class="featured" data-state="loading">"#));
    assert!(html.contains("<span>Loading...</span>"));
    assert!(html.contains(r#"<li data-key="2">Trashy Blonde</li>"#));

    Ok(())
}

/// 逾時後查詢仍在背景完成並寫入快取，下一次建置直接使用
#[tokio::test]
async fn test_pending_featured_fills_cache_for_next_build() -> Result<()> {
    let server = MockServer::start();
    mock_list(&server);
    let single_mock = server.mock(|when, then| {
        when.method(GET).path("/v2/beers/1");
        then.status(200)
            .delay(Duration::from_millis(300))
            .json_body(serde_json::json!([{"id": 1, "name": "Buzz"}]));
    });

    let client = Arc::new(QueryClient::with_config(
        QueryConfig::new(Duration::from_secs(60), Duration::from_secs(300))
            .with_retry(0, Duration::from_millis(1)),
    ));

    let first = beers_page(&server, client.clone(), Duration::from_millis(50))
        .build()
        .await?;
    assert!(first.contains("<span>Loading...</span>"));

    tokio::time::sleep(Duration::from_millis(800)).await;
    let cached: Option<Option<Beer>> =
        client.get_query_data(&QueryKey::GetBeer.with_param("1"));
    assert_eq!(
        cached.flatten().map(|beer| beer.name),
        Some("Buzz".to_string())
    );

    let second = beers_page(&server, client, Duration::from_millis(50))
        .build()
        .await?;
    assert!(second.contains("<p>Featured Beer: Buzz</p>"));
    single_mock.assert_hits(1);

    Ok(())
}

/// 精選項目 API 錯誤時重試用盡才顯示錯誤訊息
#[tokio::test]
async fn test_featured_error_after_retries() -> Result<()> {
    let server = MockServer::start();
    mock_list(&server);
    let single_mock = server.mock(|when, then| {
        when.method(GET).path("/v2/beers/1");
        then.status(500);
    });

    let client = Arc::new(QueryClient::with_config(
        QueryConfig::default().with_retry(2, Duration::from_millis(10)),
    ));
    let html = beers_page(&server, client, Duration::from_secs(5))
        .build()
        .await?;

    single_mock.assert_hits(3);
    assert!(html.contains(r#"data-state="error""#));
    assert!(html.contains("<span>Error: "));

    Ok(())
}

/// 預設查詢設定（重試等待縮小十倍）下，精選項目失敗仍會在期限內顯示錯誤
#[tokio::test]
async fn test_default_query_settings_show_error_view() -> Result<()> {
    let server = MockServer::start();
    mock_list(&server);
    let single_mock = server.mock(|when, then| {
        when.method(GET).path("/v2/beers/1");
        then.status(500);
    });

    let mut config = SiteConfig::default();
    config.query.retry_delay_ms /= 10;
    config.query.featured_timeout_ms /= 10;
    config.validate()?;

    let client = Arc::new(QueryClient::with_config(config.query_config()));
    let html = beers_page(&server, client, config.featured_timeout())
        .build()
        .await?;

    single_mock.assert_hits(config.query.retry_attempts as usize + 1);
    assert!(html.contains(r#"data-state="error""#));
    assert!(html.contains("<span>Error: "));
    assert!(!html.contains("<span>Loading...</span>"));

    Ok(())
}
