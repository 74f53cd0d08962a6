use async_trait::async_trait;
use chainhook_manager_types::{ContractInterface, ContractInterfaceFunction, StacksNetwork};
use reqwest::{Client, StatusCode};

use crate::errors::ChainhookApiError;

pub fn default_stacks_api_base_url(network: &StacksNetwork) -> &'static str {
    match network {
        StacksNetwork::Mainnet => "https://api.mainnet.hiro.so",
        StacksNetwork::Testnet => "https://api.testnet.hiro.so",
    }
}

/// Resolves a deployed contract's callable-function surface on a given
/// network.
#[async_trait]
pub trait ContractInterfaceResolver {
    async fn resolve_callable_functions(
        &self,
        network: &StacksNetwork,
        principal: &str,
        contract_name: &str,
    ) -> Result<Vec<ContractInterfaceFunction>, ChainhookApiError>;
}

pub struct StacksNodeRpc {
    mainnet_url: String,
    testnet_url: String,
    client: Client,
}

impl StacksNodeRpc {
    pub fn new(mainnet_url: &str, testnet_url: &str) -> Self {
        StacksNodeRpc {
            mainnet_url: mainnet_url.trim_end_matches('/').to_string(),
            testnet_url: testnet_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self, network: &StacksNetwork) -> &str {
        match network {
            StacksNetwork::Mainnet => &self.mainnet_url,
            StacksNetwork::Testnet => &self.testnet_url,
        }
    }

    /// Fetches the contract's interface document from the introspection
    /// endpoint of the network's Stacks API.
    pub async fn get_contract_interface(
        &self,
        network: &StacksNetwork,
        principal: &str,
        contract_name: &str,
    ) -> Result<ContractInterface, ChainhookApiError> {
        let request_url = format!(
            "{}/v2/contracts/interface/{}/{}",
            self.base_url(network),
            principal,
            contract_name
        );

        let res = self
            .client
            .get(request_url)
            .send()
            .await
            .map_err(|e| ChainhookApiError::Fetch(e.to_string()))?;

        if res.status() == StatusCode::NOT_FOUND {
            return Err(ChainhookApiError::NotFound(format!(
                "contract {}.{}",
                principal, contract_name
            )));
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
}

impl Default for StacksNodeRpc {
    fn default() -> Self {
        Self::new(
            default_stacks_api_base_url(&StacksNetwork::Mainnet),
            default_stacks_api_base_url(&StacksNetwork::Testnet),
        )
    }
}

#[async_trait]
impl ContractInterfaceResolver for StacksNodeRpc {
    /// A contract whose interface is absent, or that exposes read-only
    /// functions exclusively, resolves to an empty sequence rather than an
    /// error.
    async fn resolve_callable_functions(
        &self,
        network: &StacksNetwork,
        principal: &str,
        contract_name: &str,
    ) -> Result<Vec<ContractInterfaceFunction>, ChainhookApiError> {
        match self
            .get_contract_interface(network, principal, contract_name)
            .await
        {
            Ok(interface) => Ok(interface.callable_functions()),
            Err(ChainhookApiError::NotFound(_)) => Ok(vec![]),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rpc_against(server: &mockito::ServerGuard) -> StacksNodeRpc {
        // route both networks at the mock; each test drives one of them
        StacksNodeRpc::new(&server.url(), &server.url())
    }

    #[tokio::test]
    async fn it_filters_out_read_only_functions() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock(
                "GET",
                "/v2/contracts/interface/SP000000000000000000002Q6VF78/counter",
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "functions": [
                        { "name": "increment", "access": "public", "args": [] },
                        { "name": "rebalance", "access": "private", "args": [] },
                        { "name": "get-count", "access": "read_only", "args": [] },
                    ],
                })
                .to_string(),
            )
            .create_async()
            .await;

        let functions = rpc_against(&server)
            .resolve_callable_functions(
                &StacksNetwork::Mainnet,
                "SP000000000000000000002Q6VF78",
                "counter",
            )
            .await
            .unwrap();
        let names: Vec<&str> = functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["increment", "rebalance"]);
    }

    #[tokio::test]
    async fn it_resolves_read_only_contracts_to_an_empty_sequence() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock(
                "GET",
                "/v2/contracts/interface/SP000000000000000000002Q6VF78/oracle-view",
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "functions": [
                        { "name": "get-price", "access": "read_only", "args": [] },
                    ],
                })
                .to_string(),
            )
            .create_async()
            .await;

        let functions = rpc_against(&server)
            .resolve_callable_functions(
                &StacksNetwork::Testnet,
                "SP000000000000000000002Q6VF78",
                "oracle-view",
            )
            .await
            .unwrap();
        assert!(functions.is_empty());
    }

    #[tokio::test]
    async fn it_folds_unknown_contracts_into_an_empty_sequence() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock(
                "GET",
                "/v2/contracts/interface/SP000000000000000000002Q6VF78/missing",
            )
            .with_status(404)
            .create_async()
            .await;

        let functions = rpc_against(&server)
            .resolve_callable_functions(
                &StacksNetwork::Mainnet,
                "SP000000000000000000002Q6VF78",
                "missing",
            )
            .await
            .unwrap();
        assert!(functions.is_empty());
    }

    #[tokio::test]
    async fn it_surfaces_remote_failures_as_fetch_errors() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock(
                "GET",
                "/v2/contracts/interface/SP000000000000000000002Q6VF78/counter",
            )
            .with_status(502)
            .create_async()
            .await;

        match rpc_against(&server)
            .resolve_callable_functions(
                &StacksNetwork::Mainnet,
                "SP000000000000000000002Q6VF78",
                "counter",
            )
            .await
        {
            Err(ChainhookApiError::Fetch(message)) => {
                assert_eq!(message, "error status code 502");
            }
            other => panic!("expected Fetch error, got {:?}", other),
        }
    }
}
