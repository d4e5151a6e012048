use super::{load_featured, PageContext};
use crate::api::PunkApi;
use crate::domain::model::{Beer, BeersPageProps, FeaturedBeerProps};
use crate::domain::ports::Page;
use crate::query::{Query, QueryError, QueryKey};
use crate::render::{self, FeaturedLabels, FeaturedView, PageDocument};
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::FutureExt;

pub const BEER_LABELS: FeaturedLabels = FeaturedLabels {
    heading: "Featured Beer",
    boundary: "Could not fetch featured beer",
};

pub struct BeersPage {
    api: PunkApi,
    featured: FeaturedBeerProps,
    ctx: PageContext,
}

impl BeersPage {
    pub fn new(api: PunkApi, featured: FeaturedBeerProps, ctx: PageContext) -> Self {
        Self { api, featured, ctx }
    }

    /// 建置時抓取完整列表，不經過查詢快取；失敗直接往上拋
    pub async fn get_static_props(&self) -> Result<BeersPageProps> {
        let static_beers = self.api.get_beers().await?;
        tracing::info!(count = static_beers.len(), "📥 Static beers loaded");
        Ok(BeersPageProps { static_beers })
    }

    pub fn featured_query(&self) -> Query<Option<Beer>> {
        let api = self.api.clone();
        let id = self.featured.id.clone();

        Query::new(
            QueryKey::GetBeer.with_param(&id),
            move || {
                let api = api.clone();
                let id = id.clone();
                async move { api.get_beer(&id).await.map_err(QueryError::from) }.boxed()
            },
            self.ctx.query_client.clone(),
        )
    }

    pub async fn featured(&self) -> FeaturedView<Beer> {
        load_featured(self.featured_query(), self.ctx.featured_timeout).await
    }

    pub fn render(&self, props: &BeersPageProps, featured: &FeaturedView<Beer>) -> Result<String> {
        let props_json = render::props_json(props)?;
        let featured = render::render_featured(featured, &BEER_LABELS);
        let list = render::render_list(Some(props.static_beers.as_slice()), "Beers not found.");

        Ok(render::render_page(&PageDocument {
            site_title: &self.ctx.site_title,
            title: self.title(),
            heading: "Beers Page",
            featured: &featured,
            list_heading: "Beers",
            list: &list,
            props_json: &props_json,
        }))
    }
}

#[async_trait]
impl Page for BeersPage {
    fn slug(&self) -> &str {
        "beers"
    }

    fn title(&self) -> &str {
        "Beers"
    }

    async fn build(&self) -> Result<String> {
        let (props, featured) = tokio::join!(self.get_static_props(), self.featured());
        let props = props?;
        tracing::debug!(featured = featured.state_name(), "Rendering beers page");
        self.render(&props, &featured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::query::{QueryClient, QueryConfig};
    use crate::utils::error::SiteError;
    use httpmock::prelude::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn page_for(server: &MockServer, client: Arc<QueryClient>) -> BeersPage {
        BeersPage::new(
            PunkApi::new(ApiClient::default(), server.url("/v2/beers")),
            FeaturedBeerProps {
                id: "1".to_string(),
            },
            PageContext::new(client, Duration::from_secs(2), "Punk Atlas"),
        )
    }

    fn no_retry() -> Arc<QueryClient> {
        Arc::new(QueryClient::with_config(
            QueryConfig::default().with_retry(0, Duration::from_millis(1)),
        ))
    }

    #[tokio::test]
    async fn test_build_renders_list_and_featured() {
        let server = MockServer::start();
        let list_mock = server.mock(|when, then| {
            when.method(GET).path("/v2/beers");
            then.status(200).json_body(serde_json::json!([
                {"id": "1", "name": "Buzz"},
                {"id": "2", "name": "Trashy Blonde"}
            ]));
        });
        let single_mock = server.mock(|when, then| {
            when.method(GET).path("/v2/beers/1");
            then.status(200)
                .json_body(serde_json::json!([{"id": 1, "name": "Buzz"}]));
        });

        let html = page_for(&server, no_retry()).build().await.unwrap();

        list_mock.assert();
        single_mock.assert();
        assert!(html.contains("<h1>Beers Page</h1>"));
        assert!(html.contains("<p>Featured Beer: Buzz</p>"));
        let buzz_at = html.find(r#"<li data-key="1">Buzz</li>"#).unwrap();
        let blonde_at = html.find(r#"<li data-key="2">Trashy Blonde</li>"#).unwrap();
        assert!(buzz_at < blonde_at);
        assert!(html.contains(r#""staticBeers":[{"id":"1","name":"Buzz"}"#));
    }

    #[tokio::test]
    async fn test_featured_failure_does_not_break_page() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/beers");
            then.status(200)
                .json_body(serde_json::json!([{"id": 2, "name": "Trashy Blonde"}]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/v2/beers/1");
            then.status(500);
        });

        let html = page_for(&server, no_retry()).build().await.unwrap();

        assert!(html.contains("<span>Error: "));
        assert!(!html.contains("Featured Beer:"));
        assert!(html.contains("Trashy Blonde"));
    }

    #[tokio::test]
    async fn test_static_props_failure_aborts_page() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/beers");
            then.status(502);
        });
        server.mock(|when, then| {
            when.method(GET).path("/v2/beers/1");
            then.status(200)
                .json_body(serde_json::json!([{"id": 1, "name": "Buzz"}]));
        });

        let result = page_for(&server, no_retry()).build().await;
        assert!(matches!(result, Err(SiteError::ApiError(_))));
    }

    #[tokio::test]
    async fn test_featured_uses_cached_beer() {
        let server = MockServer::start();
        let client = Arc::new(QueryClient::with_config(
            QueryConfig::new(Duration::from_secs(60), Duration::from_secs(300))
                .with_retry(0, Duration::from_millis(1)),
        ));
        client.set_query_data(
            "get-beer:1",
            Some(Beer {
                id: "1".to_string(),
                name: "Cached Buzz".to_string(),
                tagline: None,
                first_brewed: None,
                abv: None,
                image_url: None,
            }),
        );
        let single_mock = server.mock(|when, then| {
            when.method(GET).path("/v2/beers/1");
            then.status(200)
                .json_body(serde_json::json!([{"id": 1, "name": "Buzz"}]));
        });

        let view = page_for(&server, client).featured().await;

        single_mock.assert_hits(0);
        assert!(matches!(view, FeaturedView::Ready(Some(ref beer)) if beer.name == "Cached Buzz"));
    }
}
