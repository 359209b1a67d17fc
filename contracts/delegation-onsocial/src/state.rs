use crate::errors::DelegationError;
use crate::events::{DelegationEvent, EventSink};
use crate::types::{is_zero_account, DelegationId};
use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::store::LookupMap;
use near_sdk::{log, AccountId, BorshStorageKey};

/// (custodian, id)
pub type EntryKey = (AccountId, DelegationId);

#[derive(BorshSerialize, BorshDeserialize, BorshStorageKey)]
#[borsh(crate = "near_sdk::borsh")]
pub enum StorageKey {
    Delegates,
    WhitelistedDelegators,
}

/// The two registry relations. Absent keys mean "no delegate" / "no
/// delegator"; clearing an entry removes it from storage.
#[derive(BorshSerialize, BorshDeserialize)]
#[borsh(crate = "near_sdk::borsh")]
pub struct DelegationState {
    pub delegates: LookupMap<EntryKey, AccountId>,
    pub whitelisted_delegators: LookupMap<EntryKey, AccountId>,
}

impl DelegationState {
    pub fn new() -> Self {
        Self {
            delegates: LookupMap::new(StorageKey::Delegates),
            whitelisted_delegators: LookupMap::new(StorageKey::WhitelistedDelegators),
        }
    }

    pub fn delegate(&self, custodian: &AccountId, id: &DelegationId) -> Option<&AccountId> {
        self.delegates.get(&(custodian.clone(), *id))
    }

    pub fn whitelisted_delegator(
        &self,
        custodian: &AccountId,
        id: &DelegationId,
    ) -> Option<&AccountId> {
        self.whitelisted_delegators.get(&(custodian.clone(), *id))
    }

    pub fn set_delegate(
        &mut self,
        caller: &AccountId,
        id: DelegationId,
        delegate: AccountId,
        sink: &mut impl EventSink,
    ) -> Result<(), DelegationError> {
        self.assign_delegate(caller, id, delegate, sink)
    }

    pub fn set_delegate_by_delegator(
        &mut self,
        caller: &AccountId,
        custodian: &AccountId,
        id: DelegationId,
        delegate: AccountId,
        sink: &mut impl EventSink,
    ) -> Result<(), DelegationError> {
        check_target(custodian, &delegate)?;
        self.require_delegator(caller, custodian, &id)?;
        self.assign_delegate(custodian, id, delegate, sink)?;
        log!("Delegator {} set delegate for {}", caller, custodian);
        Ok(())
    }

    pub fn clear_delegate(
        &mut self,
        caller: &AccountId,
        id: DelegationId,
        sink: &mut impl EventSink,
    ) -> Result<(), DelegationError> {
        self.remove_delegate(caller, id, sink)
    }

    pub fn clear_delegate_by_delegator(
        &mut self,
        caller: &AccountId,
        custodian: &AccountId,
        id: DelegationId,
        sink: &mut impl EventSink,
    ) -> Result<(), DelegationError> {
        self.require_delegator(caller, custodian, &id)?;
        self.remove_delegate(custodian, id, sink)?;
        log!("Delegator {} cleared delegate for {}", caller, custodian);
        Ok(())
    }

    pub fn set_whitelisted_delegator(
        &mut self,
        caller: &AccountId,
        id: DelegationId,
        delegator: AccountId,
        sink: &mut impl EventSink,
    ) -> Result<(), DelegationError> {
        let previous = assign(&mut self.whitelisted_delegators, caller, id, &delegator)?;
        if let Some(previous) = previous {
            sink.record(DelegationEvent::DelegatorCleared {
                custodian: caller.clone(),
                id,
                delegator: previous,
            });
        }
        sink.record(DelegationEvent::DelegatorSet {
            custodian: caller.clone(),
            id,
            delegator,
        });
        Ok(())
    }

    pub fn clear_whitelisted_delegator(
        &mut self,
        caller: &AccountId,
        id: DelegationId,
        sink: &mut impl EventSink,
    ) -> Result<(), DelegationError> {
        let previous = remove(&mut self.whitelisted_delegators, caller, id)?;
        sink.record(DelegationEvent::DelegatorCleared {
            custodian: caller.clone(),
            id,
            delegator: previous,
        });
        Ok(())
    }

    fn require_delegator(
        &self,
        caller: &AccountId,
        custodian: &AccountId,
        id: &DelegationId,
    ) -> Result<(), DelegationError> {
        match self.whitelisted_delegator(custodian, id) {
            Some(delegator) if delegator == caller => Ok(()),
            _ => Err(DelegationError::NotAuthorized),
        }
    }

    fn assign_delegate(
        &mut self,
        custodian: &AccountId,
        id: DelegationId,
        delegate: AccountId,
        sink: &mut impl EventSink,
    ) -> Result<(), DelegationError> {
        let previous = assign(&mut self.delegates, custodian, id, &delegate)?;
        if let Some(previous) = previous {
            sink.record(DelegationEvent::DelegateCleared {
                custodian: custodian.clone(),
                id,
                delegate: previous,
            });
        }
        sink.record(DelegationEvent::DelegateSet {
            custodian: custodian.clone(),
            id,
            delegate,
        });
        Ok(())
    }

    fn remove_delegate(
        &mut self,
        custodian: &AccountId,
        id: DelegationId,
        sink: &mut impl EventSink,
    ) -> Result<(), DelegationError> {
        let previous = remove(&mut self.delegates, custodian, id)?;
        sink.record(DelegationEvent::DelegateCleared {
            custodian: custodian.clone(),
            id,
            delegate: previous,
        });
        Ok(())
    }
}

impl Default for DelegationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates and writes `target` for (custodian, id), returning the value it
/// replaced. Nothing is written unless every check passes.
fn assign(
    relation: &mut LookupMap<EntryKey, AccountId>,
    custodian: &AccountId,
    id: DelegationId,
    target: &AccountId,
) -> Result<Option<AccountId>, DelegationError> {
    check_target(custodian, target)?;
    let key = (custodian.clone(), id);
    if relation.get(&key) == Some(target) {
        return Err(DelegationError::NoOp);
    }
    Ok(relation.insert(key, target.clone()))
}

/// A custodian never points an entry at itself or at a zero account.
fn check_target(custodian: &AccountId, target: &AccountId) -> Result<(), DelegationError> {
    if target == custodian || is_zero_account(target) {
        return Err(DelegationError::InvalidTarget);
    }
    Ok(())
}

fn remove(
    relation: &mut LookupMap<EntryKey, AccountId>,
    custodian: &AccountId,
    id: DelegationId,
) -> Result<AccountId, DelegationError> {
    relation
        .remove(&(custodian.clone(), id))
        .ok_or(DelegationError::NotFound)
}
