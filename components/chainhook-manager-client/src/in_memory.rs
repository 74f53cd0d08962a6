//! In-process stand-ins for the remote collaborators, used to exercise
//! orchestration logic without network access. Both mirror the remote
//! contracts: uuids are assigned on registration, pagination is bounded,
//! deleting an absent uuid is an error, unknown contracts resolve to an
//! empty function list.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chainhook_manager_types::{
    ChainhookDefinition, ChainhookPagination, ChainhookStatus, ContractInterface,
    ContractInterfaceFunction, RegisteredChainhook, StacksNetwork,
};
use uuid::Uuid;

use crate::errors::ChainhookApiError;
use crate::registry::ChainhookRegistry;
use crate::stacks_node::ContractInterfaceResolver;

#[derive(Default)]
pub struct InMemoryChainhookRegistry {
    entries: Mutex<Vec<RegisteredChainhook>>,
}

impl InMemoryChainhookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<RegisteredChainhook>) -> Self {
        InMemoryChainhookRegistry {
            entries: Mutex::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ChainhookRegistry for InMemoryChainhookRegistry {
    async fn register(
        &self,
        definition: &ChainhookDefinition,
    ) -> Result<RegisteredChainhook, ChainhookApiError> {
        definition
            .validate()
            .map_err(ChainhookApiError::InvalidDefinition)?;
        let registered = RegisteredChainhook {
            uuid: Uuid::new_v4().to_string(),
            definition: definition.clone(),
            status: ChainhookStatus {
                enabled: definition.options.enable_on_registration,
                status: "running".to_string(),
                occurrence_count: 0,
                evaluated_block_count: 0,
            },
        };
        self.entries.lock().unwrap().push(registered.clone());
        Ok(registered)
    }

    async fn list(
        &self,
        page: &ChainhookPagination,
    ) -> Result<Vec<RegisteredChainhook>, ChainhookApiError> {
        let (offset, limit) = page.clamped();
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, uuid: &str) -> Result<RegisteredChainhook, ChainhookApiError> {
        let entries = self.entries.lock().unwrap();
        entries
            .iter()
            .find(|entry| entry.uuid == uuid)
            .cloned()
            .ok_or_else(|| ChainhookApiError::NotFound(format!("chainhook {}", uuid)))
    }

    async fn delete(&self, uuid: &str) -> Result<(), ChainhookApiError> {
        let mut entries = self.entries.lock().unwrap();
        match entries.iter().position(|entry| entry.uuid == uuid) {
            Some(index) => {
                entries.remove(index);
                Ok(())
            }
            None => Err(ChainhookApiError::NotFound(format!("chainhook {}", uuid))),
        }
    }
}

#[derive(Default)]
pub struct InMemoryContractInterfaces {
    contracts: BTreeMap<(StacksNetwork, String), ContractInterface>,
}

impl InMemoryContractInterfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contract(
        mut self,
        network: StacksNetwork,
        contract_id: &str,
        interface: ContractInterface,
    ) -> Self {
        self.contracts
            .insert((network, contract_id.to_string()), interface);
        self
    }
}

#[async_trait]
impl ContractInterfaceResolver for InMemoryContractInterfaces {
    async fn resolve_callable_functions(
        &self,
        network: &StacksNetwork,
        principal: &str,
        contract_name: &str,
    ) -> Result<Vec<ContractInterfaceFunction>, ChainhookApiError> {
        let contract_id = format!("{}.{}", principal, contract_name);
        match self.contracts.get(&(*network, contract_id)) {
            Some(interface) => Ok(interface.callable_functions()),
            None => Ok(vec![]),
        }
    }
}
