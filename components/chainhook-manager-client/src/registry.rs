use async_trait::async_trait;
use chainhook_manager_types::{
    ChainhookDefinition, ChainhookListResponse, ChainhookPagination, ChainhookStatus,
    RegisteredChainhook, StacksNetwork,
};
use reqwest::{Client, StatusCode};

use crate::errors::ChainhookApiError;

/// Default registry endpoint for each network. Deployments can override
/// these through configuration.
pub fn default_registry_base_url(network: &StacksNetwork) -> &'static str {
    match network {
        StacksNetwork::Mainnet => "https://api.chainhooks.hiro.so",
        StacksNetwork::Testnet => "https://api.testnet.chainhooks.hiro.so",
    }
}

/// Lifecycle operations against the chainhook registry. The HTTP
/// implementation talks to the remote service; an in-memory fake backs
/// orchestration tests.
#[async_trait]
pub trait ChainhookRegistry {
    async fn register(
        &self,
        definition: &ChainhookDefinition,
    ) -> Result<RegisteredChainhook, ChainhookApiError>;
    async fn list(
        &self,
        page: &ChainhookPagination,
    ) -> Result<Vec<RegisteredChainhook>, ChainhookApiError>;
    async fn get(&self, uuid: &str) -> Result<RegisteredChainhook, ChainhookApiError>;
    async fn delete(&self, uuid: &str) -> Result<(), ChainhookApiError>;
}

#[derive(Debug)]
pub struct ChainhookRegistryClient {
    pub base_url: String,
    api_key: String,
    client: Client,
}

impl ChainhookRegistryClient {
    /// The credential is resolved once at process start by the caller and
    /// injected here; this constructor never reads ambient process state.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ChainhookApiError> {
        if api_key.is_empty() {
            return Err(ChainhookApiError::Configuration(
                "chainhook registry api key is required".to_string(),
            ));
        }
        Ok(ChainhookRegistryClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: Client::new(),
        })
    }

    pub fn for_network(network: &StacksNetwork, api_key: &str) -> Result<Self, ChainhookApiError> {
        Self::new(default_registry_base_url(network), api_key)
    }

    fn authenticated(&self, request_builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request_builder.header("authorization", format!("Bearer {}", self.api_key))
    }
}

#[derive(Deserialize)]
struct RegistrationResponse {
    uuid: String,
    // Some registry deployments echo the accepted record, others answer with
    // the assigned uuid alone.
    definition: Option<ChainhookDefinition>,
    #[serde(default)]
    status: ChainhookStatus,
}

#[async_trait]
impl ChainhookRegistry for ChainhookRegistryClient {
    async fn register(
        &self,
        definition: &ChainhookDefinition,
    ) -> Result<RegisteredChainhook, ChainhookApiError> {
        definition
            .validate()
            .map_err(ChainhookApiError::InvalidDefinition)?;

        let path = format!("{}/v1/chainhooks", self.base_url);
        let res = self
            .authenticated(self.client.post(path))
            .json(definition)
            .send()
            .await
            .map_err(|e| ChainhookApiError::Fetch(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let message = match res.text().await {
                Ok(message) => message,
                Err(e) => e.to_string(),
            };
            return Err(ChainhookApiError::Registration {
                status: status.as_u16(),
                message,
            });
        }

        let response: RegistrationResponse = res
            .json()
            .await
            .map_err(|e| ChainhookApiError::Fetch(e.to_string()))?;
        Ok(RegisteredChainhook {
            uuid: response.uuid,
            definition: response.definition.unwrap_or_else(|| definition.clone()),
            status: response.status,
        })
    }

    async fn list(
        &self,
        page: &ChainhookPagination,
    ) -> Result<Vec<RegisteredChainhook>, ChainhookApiError> {
        let (offset, limit) = page.clamped();
        let path = format!("{}/v1/chainhooks", self.base_url);
        let res = self
            .authenticated(
                self.client
                    .get(path)
                    .query(&[("offset", offset), ("limit", limit)]),
            )
            .send()
            .await
            .map_err(|e| ChainhookApiError::Fetch(e.to_string()))?;

        if !res.status().is_success() {
            return Err(ChainhookApiError::Fetch(format!(
                "error status code {}",
                res.status().as_u16()
            )));
        }
        let response: ChainhookListResponse = res
            .json()
            .await
            .map_err(|e| ChainhookApiError::Fetch(e.to_string()))?;
        Ok(response.chainhooks)
    }

    async fn get(&self, uuid: &str) -> Result<RegisteredChainhook, ChainhookApiError> {
        let path = format!("{}/v1/chainhooks/{}", self.base_url, uuid);
        let res = self
            .authenticated(self.client.get(path))
            .send()
            .await
            .map_err(|e| ChainhookApiError::Fetch(e.to_string()))?;

        if res.status() == StatusCode::NOT_FOUND {
            return Err(ChainhookApiError::NotFound(format!("chainhook {}", uuid)));
        }
        if !res.status().is_success() {
            return Err(ChainhookApiError::Fetch(format!(
                "error status code {}",
                res.status().as_u16()
            )));
        }
        res.json()
            .await
            .map_err(|e| ChainhookApiError::Fetch(e.to_string()))
    }

    async fn delete(&self, uuid: &str) -> Result<(), ChainhookApiError> {
        let path = format!("{}/v1/chainhooks/{}", self.base_url, uuid);
        let res = self
            .authenticated(self.client.delete(path))
            .send()
            .await
            .map_err(|e| ChainhookApiError::Fetch(e.to_string()))?;

        // Deleting an absent or already-deleted uuid is reported, never
        // folded into a silent success.
        if res.status() == StatusCode::NOT_FOUND {
            return Err(ChainhookApiError::NotFound(format!("chainhook {}", uuid)));
        }
        if !res.status().is_success() {
            return Err(ChainhookApiError::Fetch(format!(
                "error status code {}",
                res.status().as_u16()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chainhook_manager_types::{ChainhookDefinitionBuilder, StacksEventFilter};
    use serde_json::json;

    use super::*;

    fn counter_definition() -> ChainhookDefinition {
        ChainhookDefinitionBuilder::new("my-first-chainhook", StacksNetwork::Mainnet)
            .event_filter(StacksEventFilter::ContractCall {
                contract_identifier: "SP000000000000000000002Q6VF78.counter".into(),
                function_name: "increment".into(),
            })
            .webhook_url("https://example.com/hook")
            .finish()
            .unwrap()
    }

    fn registered_json(uuid: &str) -> serde_json::Value {
        json!({
            "uuid": uuid,
            "definition": serde_json::to_value(counter_definition()).unwrap(),
            "status": {
                "enabled": true,
                "status": "running",
                "occurrence_count": 0,
                "evaluated_block_count": 0,
            },
        })
    }

    #[tokio::test]
    async fn it_registers_and_reads_back_a_definition() {
        let mut server = mockito::Server::new_async().await;
        let uuid = "0c2e9cde-4b66-4c2d-b7d2-5ddc79f1c4ab";
        let register_mock = server
            .mock("POST", "/v1/chainhooks")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "uuid": uuid }).to_string())
            .create_async()
            .await;
        let get_mock = server
            .mock("GET", format!("/v1/chainhooks/{}", uuid).as_str())
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(registered_json(uuid).to_string())
            .create_async()
            .await;

        let client = ChainhookRegistryClient::new(&server.url(), "test-key").unwrap();
        let definition = counter_definition();

        let registered = client.register(&definition).await.unwrap();
        assert_eq!(registered.uuid, uuid);
        // partial registration echo falls back to the submitted definition
        assert_eq!(registered.definition, definition);

        let fetched = client.get(uuid).await.unwrap();
        assert_eq!(fetched.definition.filters, definition.filters);
        assert_eq!(fetched.definition.action.url(), definition.action.url());

        register_mock.assert_async().await;
        get_mock.assert_async().await;
    }

    #[tokio::test]
    async fn it_rejects_invalid_definitions_before_any_network_call() {
        let mut server = mockito::Server::new_async().await;
        let register_mock = server
            .mock("POST", "/v1/chainhooks")
            .expect(0)
            .create_async()
            .await;

        let client = ChainhookRegistryClient::new(&server.url(), "test-key").unwrap();
        let mut definition = counter_definition();
        definition.filters.events.clear();

        match client.register(&definition).await {
            Err(ChainhookApiError::InvalidDefinition(errors)) => {
                assert_eq!(
                    errors,
                    vec!["chainhook must declare at least one event filter".to_string()]
                );
            }
            other => panic!("expected InvalidDefinition, got {:?}", other),
        }
        register_mock.assert_async().await;
    }

    #[tokio::test]
    async fn it_carries_remote_rejections_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/chainhooks")
            .with_status(409)
            .with_body("a chainhook named 'my-first-chainhook' already exists")
            .create_async()
            .await;

        let client = ChainhookRegistryClient::new(&server.url(), "test-key").unwrap();
        match client.register(&counter_definition()).await {
            Err(ChainhookApiError::Registration { status, message }) => {
                assert_eq!(status, 409);
                assert_eq!(
                    message,
                    "a chainhook named 'my-first-chainhook' already exists"
                );
            }
            other => panic!("expected Registration error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn it_clamps_the_limit_before_sending() {
        let mut server = mockito::Server::new_async().await;
        let list_mock = server
            .mock("GET", "/v1/chainhooks")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("offset".into(), "0".into()),
                mockito::Matcher::UrlEncoded("limit".into(), "60".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "chainhooks": [] }).to_string())
            .create_async()
            .await;

        let client = ChainhookRegistryClient::new(&server.url(), "test-key").unwrap();
        let chainhooks = client
            .list(&ChainhookPagination::new(-10, 100))
            .await
            .unwrap();
        assert!(chainhooks.is_empty());
        list_mock.assert_async().await;
    }

    #[tokio::test]
    async fn it_treats_an_empty_registry_as_an_empty_page() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/v1/chainhooks")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            // some deployments omit the field entirely
            .with_body("{}")
            .create_async()
            .await;

        let client = ChainhookRegistryClient::new(&server.url(), "test-key").unwrap();
        let chainhooks = client.list(&ChainhookPagination::default()).await.unwrap();
        assert!(chainhooks.is_empty());
    }

    #[tokio::test]
    async fn it_reports_not_found_on_unknown_uuid_deletion() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("DELETE", "/v1/chainhooks/ghost")
            .with_status(404)
            .create_async()
            .await;

        let client = ChainhookRegistryClient::new(&server.url(), "test-key").unwrap();
        match client.delete("ghost").await {
            Err(ChainhookApiError::NotFound(subject)) => {
                assert_eq!(subject, "chainhook ghost");
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn it_requires_a_credential_at_construction() {
        match ChainhookRegistryClient::for_network(&StacksNetwork::Mainnet, "") {
            Err(ChainhookApiError::Configuration(e)) => {
                assert_eq!(e, "chainhook registry api key is required");
            }
            other => panic!("expected Configuration error, got {:?}", other),
        }
    }
}
