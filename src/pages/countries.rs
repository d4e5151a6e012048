use super::{load_featured, PageContext};
use crate::api::CountriesApi;
use crate::domain::model::{CountriesPageProps, Country, FeaturedCountryProps};
use crate::domain::ports::Page;
use crate::query::{Query, QueryError, QueryKey};
use crate::render::{self, FeaturedLabels, FeaturedView, PageDocument};
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::FutureExt;

pub const COUNTRY_LABELS: FeaturedLabels = FeaturedLabels {
    heading: "Featured Country",
    boundary: "Could not fetch featured country",
};

pub struct CountriesPage {
    api: CountriesApi,
    featured: FeaturedCountryProps,
    ctx: PageContext,
}

impl CountriesPage {
    pub fn new(api: CountriesApi, featured: FeaturedCountryProps, ctx: PageContext) -> Self {
        Self { api, featured, ctx }
    }

    pub async fn get_static_props(&self) -> Result<CountriesPageProps> {
        let response = self.api.get_countries().await?;
        tracing::info!(count = response.countries.len(), "📥 Static countries loaded");
        Ok(CountriesPageProps {
            static_countries: response.countries,
        })
    }

    pub fn featured_query(&self) -> Query<Option<Country>> {
        let api = self.api.clone();
        let code = self.featured.code.clone();

        Query::new(
            QueryKey::GetCountry.with_param(&code),
            move || {
                let api = api.clone();
                let code = code.clone();
                async move {
                    api.get_country(&code)
                        .await
                        .map(|response| response.country)
                        .map_err(QueryError::from)
                }
                .boxed()
            },
            self.ctx.query_client.clone(),
        )
    }

    pub async fn featured(&self) -> FeaturedView<Country> {
        load_featured(self.featured_query(), self.ctx.featured_timeout).await
    }

    pub fn render(
        &self,
        props: &CountriesPageProps,
        featured: &FeaturedView<Country>,
    ) -> Result<String> {
        let props_json = render::props_json(props)?;
        let featured = render::render_featured(featured, &COUNTRY_LABELS);
        let list = render::render_list(
            Some(props.static_countries.as_slice()),
            "Countries not found.",
        );

        Ok(render::render_page(&PageDocument {
            site_title: &self.ctx.site_title,
            title: self.title(),
            heading: "Countries Page",
            featured: &featured,
            list_heading: "Countries",
            list: &list,
            props_json: &props_json,
        }))
    }
}

#[async_trait]
impl Page for CountriesPage {
    fn slug(&self) -> &str {
        "countries"
    }

    fn title(&self) -> &str {
        "Countries"
    }

    async fn build(&self) -> Result<String> {
        let (props, featured) = tokio::join!(self.get_static_props(), self.featured());
        let props = props?;
        tracing::debug!(featured = featured.state_name(), "Rendering countries page");
        self.render(&props, &featured)
    }
}
