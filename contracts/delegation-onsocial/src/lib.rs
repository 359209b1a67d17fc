use crate::errors::DelegationError;
use crate::events::{NearEventLog, EVENT_STANDARD, EVENT_VERSION};
use crate::state::DelegationState;
use crate::types::{ContractInfo, DelegationId};
use near_sdk::{env, near, AccountId, PanicOnDefault};

pub mod errors;
pub mod events;
pub mod state;
pub mod types;

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct DelegationContract {
    state: DelegationState,
}

#[near]
impl DelegationContract {
    #[init]
    pub fn new() -> Self {
        Self {
            state: DelegationState::new(),
        }
    }

    #[handle_result]
    pub fn set_delegate(
        &mut self,
        id: DelegationId,
        delegate: AccountId,
    ) -> Result<(), DelegationError> {
        self.state
            .set_delegate(&env::predecessor_account_id(), id, delegate, &mut NearEventLog)
    }

    #[handle_result]
    pub fn set_delegate_by_delegator(
        &mut self,
        custodian: AccountId,
        id: DelegationId,
        delegate: AccountId,
    ) -> Result<(), DelegationError> {
        self.state.set_delegate_by_delegator(
            &env::predecessor_account_id(),
            &custodian,
            id,
            delegate,
            &mut NearEventLog,
        )
    }

    #[handle_result]
    pub fn clear_delegate(&mut self, id: DelegationId) -> Result<(), DelegationError> {
        self.state
            .clear_delegate(&env::predecessor_account_id(), id, &mut NearEventLog)
    }

    #[handle_result]
    pub fn clear_delegate_by_delegator(
        &mut self,
        custodian: AccountId,
        id: DelegationId,
    ) -> Result<(), DelegationError> {
        self.state.clear_delegate_by_delegator(
            &env::predecessor_account_id(),
            &custodian,
            id,
            &mut NearEventLog,
        )
    }

    #[handle_result]
    pub fn set_whitelisted_delegator(
        &mut self,
        id: DelegationId,
        delegator: AccountId,
    ) -> Result<(), DelegationError> {
        self.state.set_whitelisted_delegator(
            &env::predecessor_account_id(),
            id,
            delegator,
            &mut NearEventLog,
        )
    }

    #[handle_result]
    pub fn clear_whitelisted_delegator(&mut self, id: DelegationId) -> Result<(), DelegationError> {
        self.state
            .clear_whitelisted_delegator(&env::predecessor_account_id(), id, &mut NearEventLog)
    }

    pub fn get_delegate(&self, custodian: AccountId, id: DelegationId) -> Option<AccountId> {
        self.state.delegate(&custodian, &id).cloned()
    }

    pub fn get_whitelisted_delegator(
        &self,
        custodian: AccountId,
        id: DelegationId,
    ) -> Option<AccountId> {
        self.state.whitelisted_delegator(&custodian, &id).cloned()
    }

    pub fn contract_info(&self) -> ContractInfo {
        ContractInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            standard: EVENT_STANDARD.to_string(),
            event_version: EVENT_VERSION.to_string(),
        }
    }
}
