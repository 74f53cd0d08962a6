/// Composes a fully qualified contract identifier (`address.contract-name`).
///
/// The result is treated as an opaque string by every other layer; callers
/// are responsible for supplying a deployed contract's actual coordinates.
pub fn contract_identifier(address: &str, contract_name: &str) -> String {
    format!("{}.{}", address, contract_name)
}

/// Composes an asset identifier (`address.contract-name::asset-name`) for
/// fungible and non-fungible token filters.
///
/// Registered hooks in the wild address token classes both through the
/// deploying contract's name and through the literal `ft`/`nft` segments;
/// which convention applies is the caller's call, and nothing downstream
/// second-guesses it.
pub fn asset_identifier(address: &str, contract_name: &str, asset_name: &str) -> String {
    format!("{}.{}::{}", address, contract_name, asset_name)
}

pub fn append_error_context(context: &str, errors: Vec<String>) -> Vec<String> {
    errors
        .iter()
        .map(|e| format!("{}: {}", context, e))
        .collect()
}

/// A single event predicate within a chainhook definition. A definition
/// carries an ordered sequence of these; the registry fires the hook when
/// any one of them matches.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type")]
pub enum StacksEventFilter {
    ContractCall {
        contract_identifier: String,
        function_name: String,
    },
    ContractDeploy {
        #[serde(skip_serializing_if = "Option::is_none")]
        sender: Option<String>,
    },
    ContractLog {
        contract_identifier: String,
    },
    FtMint {
        asset_identifier: String,
    },
    FtTransfer {
        asset_identifier: String,
    },
    FtBurn {
        asset_identifier: String,
    },
    NftMint {
        asset_identifier: String,
    },
    NftTransfer {
        asset_identifier: String,
    },
    NftBurn {
        asset_identifier: String,
    },
}

impl StacksEventFilter {
    /// The wire tag of this filter's event kind.
    pub fn event_type(&self) -> &'static str {
        match self {
            StacksEventFilter::ContractCall { .. } => "contract_call",
            StacksEventFilter::ContractDeploy { .. } => "contract_deploy",
            StacksEventFilter::ContractLog { .. } => "contract_log",
            StacksEventFilter::FtMint { .. } => "ft_mint",
            StacksEventFilter::FtTransfer { .. } => "ft_transfer",
            StacksEventFilter::FtBurn { .. } => "ft_burn",
            StacksEventFilter::NftMint { .. } => "nft_mint",
            StacksEventFilter::NftTransfer { .. } => "nft_transfer",
            StacksEventFilter::NftBurn { .. } => "nft_burn",
        }
    }

    /// Checks structural completeness: required fields must be non-empty.
    /// Whether the referenced contract or asset exists on chain is not this
    /// layer's concern, and no network access happens here.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = vec![];
        match self {
            StacksEventFilter::ContractCall {
                contract_identifier,
                function_name,
            } => {
                if contract_identifier.is_empty() {
                    errors.push("contract_identifier must not be empty".to_string());
                }
                if function_name.is_empty() {
                    errors.push("function_name must not be empty".to_string());
                }
            }
            StacksEventFilter::ContractDeploy { sender } => {
                if let Some(sender) = sender {
                    if sender.is_empty() {
                        errors.push("sender must not be empty when provided".to_string());
                    }
                }
            }
            StacksEventFilter::ContractLog {
                contract_identifier,
            } => {
                if contract_identifier.is_empty() {
                    errors.push("contract_identifier must not be empty".to_string());
                }
            }
            StacksEventFilter::FtMint { asset_identifier }
            | StacksEventFilter::FtTransfer { asset_identifier }
            | StacksEventFilter::FtBurn { asset_identifier }
            | StacksEventFilter::NftMint { asset_identifier }
            | StacksEventFilter::NftTransfer { asset_identifier }
            | StacksEventFilter::NftBurn { asset_identifier } => {
                if asset_identifier.is_empty() {
                    errors.push("asset_identifier must not be empty".to_string());
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(append_error_context(
                &format!("invalid filter for event '{}'", self.event_type()),
                errors,
            ))
        }
    }
}
