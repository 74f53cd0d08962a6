pub mod file;

use std::str::FromStr;

use chainhook_manager_client::registry::default_registry_base_url;
use chainhook_manager_client::stacks_node::{default_stacks_api_base_url, StacksNodeRpc};
use chainhook_manager_types::StacksNetwork;
pub use file::ConfigFile;

pub const DEFAULT_SERVICE_PORT: u16 = 3000;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub network: StacksNetwork,
    pub registry_base_url: String,
    pub stacks_api_mainnet_url: String,
    pub stacks_api_testnet_url: String,
    pub port: u16,
    pub webhook_url: Option<String>,
}

impl Config {
    /// Resolves the effective configuration once at startup: a `.env` file
    /// when present, then the optional toml file, then environment
    /// overrides. A missing api key is fatal here, before any remote call is
    /// attempted.
    pub fn resolve(config_path: Option<&str>) -> Result<Config, String> {
        let _ = dotenvy::dotenv();
        let file = match config_path {
            Some(path) => Some(ConfigFile::from_path(path)?),
            None => None,
        };
        Config::from_sources(file, |key| std::env::var(key).ok())
    }

    pub fn from_sources<E>(file: Option<ConfigFile>, env: E) -> Result<Config, String>
    where
        E: Fn(&str) -> Option<String>,
    {
        let file = file.unwrap_or_default();
        let registry_file = file.registry;
        let stacks_api_file = file.stacks_api;

        let api_key = env("HIRO_API_KEY")
            .or_else(|| registry_file.as_ref().and_then(|r| r.api_key.clone()))
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                "HIRO_API_KEY is missing (set the environment variable or the [registry] api_key entry)"
                    .to_string()
            })?;

        let network = match env("STACKS_NETWORK")
            .or_else(|| registry_file.as_ref().and_then(|r| r.network.clone()))
        {
            Some(value) => StacksNetwork::from_str(&value)
                .map_err(|_| format!("unsupported stacks network '{}'", value))?,
            None => StacksNetwork::Mainnet,
        };

        let port = match env("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| format!("invalid port '{}'", value))?,
            None => file
                .http
                .and_then(|h| h.port)
                .unwrap_or(DEFAULT_SERVICE_PORT),
        };

        let webhook_url =
            env("WEBHOOK_URL").or_else(|| file.action.and_then(|a| a.webhook_url));

        let registry_base_url = registry_file
            .as_ref()
            .and_then(|r| r.base_url.clone())
            .unwrap_or_else(|| default_registry_base_url(&network).to_string());

        let stacks_api_mainnet_url = stacks_api_file
            .as_ref()
            .and_then(|s| s.mainnet_url.clone())
            .unwrap_or_else(|| default_stacks_api_base_url(&StacksNetwork::Mainnet).to_string());
        let stacks_api_testnet_url = stacks_api_file
            .as_ref()
            .and_then(|s| s.testnet_url.clone())
            .unwrap_or_else(|| default_stacks_api_base_url(&StacksNetwork::Testnet).to_string());

        Ok(Config {
            api_key,
            network,
            registry_base_url,
            stacks_api_mainnet_url,
            stacks_api_testnet_url,
            port,
            webhook_url,
        })
    }

    pub fn stacks_node_rpc(&self) -> StacksNodeRpc {
        StacksNodeRpc::new(&self.stacks_api_mainnet_url, &self.stacks_api_testnet_url)
    }
}
