// NOTE: This module is a reduced projection of the Stacks node's contract
// interface document. Only the function list is modeled; argument types are
// relayed as raw JSON since the manager renders them without interpreting
// Clarity type structure.

use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContractInterface {
    #[serde(default)]
    pub functions: Vec<ContractInterfaceFunction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractInterfaceFunction {
    pub name: String,
    pub access: ContractFunctionAccess,
    #[serde(default)]
    pub args: Vec<ContractFunctionArg>,
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractFunctionAccess {
    private,
    public,
    read_only,
}

impl ContractFunctionAccess {
    /// Whether the function can be invoked as a state-changing transaction.
    /// Read-only functions cannot, so they are not meaningful hook-trigger
    /// targets.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            ContractFunctionAccess::public | ContractFunctionAccess::private
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractFunctionArg {
    pub name: String,
    #[serde(rename = "type")]
    pub type_f: JsonValue,
}

impl ContractInterface {
    /// The subset of functions an external actor can invoke in a transaction.
    pub fn callable_functions(&self) -> Vec<ContractInterfaceFunction> {
        self.functions
            .iter()
            .filter(|f| f.access.is_callable())
            .cloned()
            .collect()
    }
}
