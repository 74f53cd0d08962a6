use strum::{Display, EnumString};

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StacksNetwork {
    Mainnet,
    Testnet,
}

impl StacksNetwork {
    pub fn is_mainnet(&self) -> bool {
        matches!(self, StacksNetwork::Mainnet)
    }
}
