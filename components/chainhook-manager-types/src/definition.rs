use url::Url;

use crate::events::{append_error_context, StacksEventFilter};
use crate::network::StacksNetwork;

pub const CHAINHOOK_DEFINITION_VERSION: &str = "1";
pub const CHAINHOOK_CHAIN: &str = "stacks";

/// A chainhook subscription as submitted to the registry. Built client-side,
/// never mutated after construction; an update is a delete + re-register.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainhookDefinition {
    pub version: String,
    pub name: String,
    pub chain: String,
    pub network: StacksNetwork,
    pub filters: ChainhookFilters,
    pub action: HookAction,
    #[serde(default)]
    pub options: ChainhookOptions,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChainhookFilters {
    pub events: Vec<StacksEventFilter>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type")]
pub enum HookAction {
    HttpPost { url: String },
}

impl HookAction {
    pub fn url(&self) -> &str {
        match self {
            HookAction::HttpPost { url } => url,
        }
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        match self {
            HookAction::HttpPost { url } => {
                if let Err(e) = Url::parse(url) {
                    return Err(vec![format!("hook action url invalid ({})", e)]);
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainhookOptions {
    pub decode_clarity_values: bool,
    pub enable_on_registration: bool,
}

impl Default for ChainhookOptions {
    fn default() -> ChainhookOptions {
        ChainhookOptions {
            decode_clarity_values: true,
            enable_on_registration: true,
        }
    }
}

impl ChainhookDefinition {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = vec![];
        if self.name.is_empty() {
            errors.push("chainhook name must not be empty".to_string());
        }
        if self.filters.events.is_empty() {
            errors.push("chainhook must declare at least one event filter".to_string());
        }
        for filter in self.filters.events.iter() {
            if let Err(e) = filter.validate() {
                errors.append(&mut append_error_context("invalid 'filters' value", e));
            }
        }
        if let Err(e) = self.action.validate() {
            errors.append(&mut append_error_context("invalid 'action' value", e));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Assembles a [ChainhookDefinition] with the defaults a freshly declared
/// hook is expected to carry.
///
/// ### Examples
/// ```
/// use chainhook_manager_types::{ChainhookDefinitionBuilder, StacksEventFilter, StacksNetwork};
///
/// fn get_definition() -> Result<chainhook_manager_types::ChainhookDefinition, Vec<String>> {
///     ChainhookDefinitionBuilder::new("my-first-chainhook", StacksNetwork::Mainnet)
///         .event_filter(StacksEventFilter::ContractCall {
///             contract_identifier: "SP000000000000000000002Q6VF78.counter".into(),
///             function_name: "increment".into(),
///         })
///         .webhook_url("https://example.com/hook")
///         .finish()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ChainhookDefinitionBuilder {
    name: String,
    network: StacksNetwork,
    events: Vec<StacksEventFilter>,
    webhook_url: Option<String>,
    options: ChainhookOptions,
}

impl ChainhookDefinitionBuilder {
    pub fn new(name: &str, network: StacksNetwork) -> Self {
        ChainhookDefinitionBuilder {
            name: name.to_string(),
            network,
            events: vec![],
            webhook_url: None,
            options: ChainhookOptions::default(),
        }
    }

    /// Appends one event filter. Filters are kept as a flat ordered sequence;
    /// the registry fires the hook when any one of them matches.
    pub fn event_filter(&mut self, filter: StacksEventFilter) -> &mut Self {
        self.events.push(filter);
        self
    }

    pub fn event_filters(&mut self, filters: Vec<StacksEventFilter>) -> &mut Self {
        self.events.extend(filters);
        self
    }

    /// Sets the webhook the registry will POST occurrences to. Must be an
    /// absolute URL.
    pub fn webhook_url(&mut self, url: &str) -> &mut Self {
        self.webhook_url = Some(url.to_string());
        self
    }

    pub fn decode_clarity_values(&mut self, do_decode: bool) -> &mut Self {
        self.options.decode_clarity_values = do_decode;
        self
    }

    /// Registering a hook that stays disabled until manually enabled is an
    /// unusual but supported configuration.
    pub fn enable_on_registration(&mut self, do_enable: bool) -> &mut Self {
        self.options.enable_on_registration = do_enable;
        self
    }

    /// Attempts to convert the builder into a validated [ChainhookDefinition].
    /// Fails when no filter was supplied, the name is empty, or the webhook
    /// url is missing or not an absolute URL.
    pub fn finish(&self) -> Result<ChainhookDefinition, Vec<String>> {
        let url = match &self.webhook_url {
            Some(url) => url.clone(),
            None => return Err(vec!["webhook url is required".to_string()]),
        };
        let definition = ChainhookDefinition {
            version: CHAINHOOK_DEFINITION_VERSION.to_string(),
            name: self.name.clone(),
            chain: CHAINHOOK_CHAIN.to_string(),
            network: self.network,
            filters: ChainhookFilters {
                events: self.events.clone(),
            },
            action: HookAction::HttpPost { url },
            options: self.options.clone(),
        };
        definition.validate()?;
        Ok(definition)
    }
}
