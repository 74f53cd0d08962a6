extern crate serde;

#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate serde_json;

pub mod contract_interface;
pub mod definition;
pub mod events;
pub mod network;
pub mod registry;

pub use contract_interface::{
    ContractFunctionAccess, ContractFunctionArg, ContractInterface, ContractInterfaceFunction,
};
pub use definition::{
    ChainhookDefinition, ChainhookDefinitionBuilder, ChainhookFilters, ChainhookOptions,
    HookAction,
};
pub use events::{asset_identifier, contract_identifier, StacksEventFilter};
pub use network::StacksNetwork;
pub use registry::{
    ChainhookListResponse, ChainhookPagination, ChainhookStatus, RegisteredChainhook,
    MAX_CHAINHOOKS_PAGE_LIMIT,
};
