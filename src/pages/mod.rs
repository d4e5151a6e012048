pub mod beers;
pub mod countries;
pub mod featured;

pub use beers::BeersPage;
pub use countries::CountriesPage;
pub use featured::load_featured;

use crate::api::{ApiClient, CountriesApi, GraphqlClient, PunkApi};
use crate::domain::model::{FeaturedBeerProps, FeaturedCountryProps};
use crate::domain::ports::{ConfigProvider, Page};
use crate::query::QueryClient;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Beers,
    Countries,
}

impl PageKind {
    pub const ALL: [PageKind; 2] = [PageKind::Beers, PageKind::Countries];
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageKind::Beers => f.write_str("beers"),
            PageKind::Countries => f.write_str("countries"),
        }
    }
}

/// 所有頁面共用的執行環境：注入的查詢快取與渲染設定
#[derive(Debug, Clone)]
pub struct PageContext {
    pub query_client: Arc<QueryClient>,
    pub featured_timeout: Duration,
    pub site_title: String,
}

impl PageContext {
    pub fn new(query_client: Arc<QueryClient>, featured_timeout: Duration, site_title: impl Into<String>) -> Self {
        Self {
            query_client,
            featured_timeout,
            site_title: site_title.into(),
        }
    }
}

/// 依設定建立要輸出的頁面
pub fn build_pages<C: ConfigProvider>(
    config: &C,
    kinds: &[PageKind],
    client: ApiClient,
    ctx: PageContext,
) -> Vec<Box<dyn Page>> {
    kinds
        .iter()
        .map(|kind| -> Box<dyn Page> {
            match kind {
                PageKind::Beers => Box::new(BeersPage::new(
                    PunkApi::new(client.clone(), config.beers_endpoint()),
                    FeaturedBeerProps {
                        id: config.featured_beer_id().to_string(),
                    },
                    ctx.clone(),
                )),
                PageKind::Countries => Box::new(CountriesPage::new(
                    CountriesApi::new(GraphqlClient::new(
                        client.clone(),
                        config.countries_endpoint(),
                    )),
                    FeaturedCountryProps {
                        code: config.featured_country_code().to_string(),
                    },
                    ctx.clone(),
                )),
            }
        })
        .collect()
}
