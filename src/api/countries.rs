use super::GraphqlClient;
use crate::domain::model::{CountriesResponse, CountryResponse};
use crate::utils::error::Result;

pub const COUNTRIES_API: &str = "https://countries.trevorblades.com/";

pub const COUNTRIES_QUERY: &str = "{ countries { name code } }";

pub const COUNTRY_QUERY: &str = r#"query GetCountry($code: ID!) {
  country(code: $code) {
    name
    native
    capital
    emoji
    emojiU
    currency
    phone
    code
    languages {
      code
      name
      native
    }
  }
}"#;

/// Countries API (GraphQL) 的查詢函式
#[derive(Debug, Clone)]
pub struct CountriesApi {
    graphql: GraphqlClient,
}

impl CountriesApi {
    pub fn new(graphql: GraphqlClient) -> Self {
        Self { graphql }
    }

    pub fn endpoint(&self) -> &str {
        self.graphql.endpoint()
    }

    pub async fn get_countries(&self) -> Result<CountriesResponse> {
        self.graphql.query(COUNTRIES_QUERY, None).await
    }

    pub async fn get_country(&self, code: &str) -> Result<CountryResponse> {
        self.graphql
            .query(COUNTRY_QUERY, Some(serde_json::json!({ "code": code })))
            .await
    }
}
