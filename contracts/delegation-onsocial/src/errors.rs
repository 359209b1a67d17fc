use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::{env, FunctionError};
use near_sdk_macros::NearSchema;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, NearSchema, BorshSerialize, BorshDeserialize)]
#[abi(borsh)]
pub enum DelegationError {
    /// Target is the custodian itself or the zero account.
    InvalidTarget,
    /// Target already holds the entry.
    NoOp,
    /// Nothing to clear.
    NotFound,
    /// Caller is not the whitelisted delegator for the custodian and id.
    NotAuthorized,
}

impl DelegationError {
    pub fn message(&self) -> &'static str {
        match self {
            DelegationError::InvalidTarget => "Target cannot be the custodian or the zero account",
            DelegationError::NoOp => "Target is already set",
            DelegationError::NotFound => "No entry to clear",
            DelegationError::NotAuthorized => "Caller is not the whitelisted delegator",
        }
    }
}

impl fmt::Display for DelegationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self, self.message())
    }
}

impl FunctionError for DelegationError {
    fn panic(&self) -> ! {
        env::panic_str(&self.to_string())
    }
}
