use super::ApiClient;
use crate::domain::model::Beer;
use crate::utils::error::{Result, SiteError};
use url::Url;

pub const PUNK_API_BEERS: &str = "https://api.punkapi.com/v2/beers";

/// Punk API (REST) 的查詢函式
#[derive(Debug, Clone)]
pub struct PunkApi {
    client: ApiClient,
    endpoint: String,
}

impl PunkApi {
    pub fn new(client: ApiClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn get_beers(&self) -> Result<Vec<Beer>> {
        self.client.get_json(&self.endpoint).await
    }

    /// `GET /beers/{id}` 回傳只有一個元素的陣列，取第一筆
    pub async fn get_beer(&self, id: &str) -> Result<Option<Beer>> {
        let url = self.beer_url(id)?;
        let beers: Vec<Beer> = self.client.get_json(url.as_str()).await?;
        Ok(beers.into_iter().next())
    }

    /// id 作為單一路徑片段附加到端點後面，`/`、`?` 等字元會被編碼
    fn beer_url(&self, id: &str) -> Result<Url> {
        let invalid = |reason: String| SiteError::InvalidConfigValueError {
            field: "beers.endpoint".to_string(),
            value: self.endpoint.clone(),
            reason,
        };

        let mut url = Url::parse(&self.endpoint).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}
