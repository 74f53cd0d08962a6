#[derive(Deserialize, Debug, Clone, Default)]
pub struct ConfigFile {
    pub registry: Option<RegistryConfigFile>,
    pub stacks_api: Option<StacksApiConfigFile>,
    pub http: Option<HttpConfigFile>,
    pub action: Option<ActionConfigFile>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RegistryConfigFile {
    pub api_key: Option<String>,
    pub network: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StacksApiConfigFile {
    pub mainnet_url: Option<String>,
    pub testnet_url: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct HttpConfigFile {
    pub port: Option<u16>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ActionConfigFile {
    pub webhook_url: Option<String>,
}

impl ConfigFile {
    pub fn from_path(path: &str) -> Result<ConfigFile, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("unable to read config file {}: {}", path, e))?;
        toml::from_str(&content)
            .map_err(|e| format!("unable to parse config file {}: {}", path, e))
    }
}
