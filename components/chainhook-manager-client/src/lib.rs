extern crate serde;

#[macro_use]
extern crate serde_derive;

pub mod errors;
#[cfg(any(test, feature = "mock"))]
pub mod in_memory;
pub mod registry;
pub mod stacks_node;
pub mod utils;

pub use errors::ChainhookApiError;
pub use registry::{ChainhookRegistry, ChainhookRegistryClient};
pub use stacks_node::{ContractInterfaceResolver, StacksNodeRpc};
