use super::ApiClient;
use crate::utils::error::{Result, SiteError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorMessage {
    message: String,
}

/// 最小的 GraphQL over HTTP 客戶端：POST `{ query, variables }`，解開 `{ data, errors }`
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    client: ApiClient,
    endpoint: String,
}

impl GraphqlClient {
    pub fn new(client: ApiClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<T> {
        let request = GraphqlRequest { query, variables };
        let response: GraphqlResponse<T> = self.client.post_json(&self.endpoint, &request).await?;

        if !response.errors.is_empty() {
            return Err(SiteError::GraphqlError {
                messages: response.errors.into_iter().map(|e| e.message).collect(),
            });
        }

        response.data.ok_or_else(|| SiteError::ProcessingError {
            message: "GraphQL response has no data".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[derive(Debug, Deserialize)]
    struct Hello {
        hello: String,
    }

    #[tokio::test]
    async fn test_query_sends_variables_and_unwraps_data() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/")
                .json_body(serde_json::json!({
                    "query": "query Hello($name: String!) { hello(name: $name) }",
                    "variables": {"name": "atlas"}
                }));
            then.status(200)
                .json_body(serde_json::json!({"data": {"hello": "hi atlas"}}));
        });

        let client = GraphqlClient::new(ApiClient::default(), server.url("/"));
        let data: Hello = client
            .query(
                "query Hello($name: String!) { hello(name: $name) }",
                Some(serde_json::json!({"name": "atlas"})),
            )
            .await
            .unwrap();

        mock.assert();
        assert_eq!(data.hello, "hi atlas");
    }

    #[tokio::test]
    async fn test_errors_array_becomes_graphql_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200).json_body(serde_json::json!({
                "data": null,
                "errors": [{"message": "Cannot query field \"nope\""}]
            }));
        });

        let client = GraphqlClient::new(ApiClient::default(), server.url("/"));
        let result: Result<Hello> = client.query("{ nope }", None).await;

        match result {
            Err(SiteError::GraphqlError { messages }) => {
                assert_eq!(messages, vec!["Cannot query field \"nope\"".to_string()]);
            }
            other => panic!("expected GraphqlError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_data_is_processing_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200).json_body(serde_json::json!({}));
        });

        let client = GraphqlClient::new(ApiClient::default(), server.url("/"));
        let result: Result<Hello> = client.query("{ hello }", None).await;

        assert!(matches!(result, Err(SiteError::ProcessingError { .. })));
    }
}
