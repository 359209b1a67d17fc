//! Replays delegation records into the current delegation and whitelist graph.
//!
//! The contract only emits a set record for an actual change and always
//! clears the previous value first, so a correct stream replays without
//! conflicts. Any conflict means records were lost or reordered.

use crate::decoder::{DelegationRecord, Relation};
use std::collections::BTreeMap;
use std::fmt;

/// (custodian, id)
type EntryKey = (String, String);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelegationGraph {
    delegates: BTreeMap<EntryKey, String>,
    delegators: BTreeMap<EntryKey, String>,
    applied: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// Set record for a key that still holds a different value.
    Occupied {
        record: DelegationRecord,
        current: String,
    },
    /// Set record repeating the current value.
    Unchanged { record: DelegationRecord },
    /// Clear record for an absent key.
    NotSet { record: DelegationRecord },
    /// Clear record naming a value other than the current one.
    Mismatch {
        record: DelegationRecord,
        current: String,
    },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Occupied { record, current } => write!(
                f,
                "{} for ({}, {}) while {} is still set",
                record.kind.as_str(),
                record.custodian,
                record.id,
                current
            ),
            ReplayError::Unchanged { record } => write!(
                f,
                "{} for ({}, {}) repeats current value {}",
                record.kind.as_str(),
                record.custodian,
                record.id,
                record.counterparty
            ),
            ReplayError::NotSet { record } => write!(
                f,
                "{} for ({}, {}) but nothing is set",
                record.kind.as_str(),
                record.custodian,
                record.id
            ),
            ReplayError::Mismatch { record, current } => write!(
                f,
                "{} of {} for ({}, {}) but current value is {}",
                record.kind.as_str(),
                record.counterparty,
                record.custodian,
                record.id,
                current
            ),
        }
    }
}

impl std::error::Error for ReplayError {}

impl DelegationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a full record stream. On failure returns the
    /// position of the offending record alongside the error.
    pub fn replay<'a, I>(records: I) -> Result<Self, (usize, ReplayError)>
    where
        I: IntoIterator<Item = &'a DelegationRecord>,
    {
        let mut graph = Self::new();
        for (position, record) in records.into_iter().enumerate() {
            graph.apply(record).map_err(|e| (position, e))?;
        }
        Ok(graph)
    }

    pub fn apply(&mut self, record: &DelegationRecord) -> Result<(), ReplayError> {
        let relation = match record.kind.relation() {
            Relation::Delegate => &mut self.delegates,
            Relation::Delegator => &mut self.delegators,
        };
        let key = (record.custodian.clone(), record.id.clone());

        if record.kind.is_set() {
            match relation.get(&key) {
                Some(current) if current == &record.counterparty => {
                    return Err(ReplayError::Unchanged {
                        record: record.clone(),
                    });
                }
                Some(current) => {
                    return Err(ReplayError::Occupied {
                        record: record.clone(),
                        current: current.clone(),
                    });
                }
                None => {
                    relation.insert(key, record.counterparty.clone());
                }
            }
        } else {
            match relation.get(&key) {
                None => {
                    return Err(ReplayError::NotSet {
                        record: record.clone(),
                    });
                }
                Some(current) if current != &record.counterparty => {
                    return Err(ReplayError::Mismatch {
                        record: record.clone(),
                        current: current.clone(),
                    });
                }
                Some(_) => {
                    relation.remove(&key);
                }
            }
        }

        self.applied += 1;
        Ok(())
    }

    /// Number of records applied so far.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    pub fn delegate_of(&self, custodian: &str, id: &str) -> Option<&str> {
        self.delegates
            .get(&(custodian.to_string(), id.to_string()))
            .map(String::as_str)
    }

    pub fn delegator_of(&self, custodian: &str, id: &str) -> Option<&str> {
        self.delegators
            .get(&(custodian.to_string(), id.to_string()))
            .map(String::as_str)
    }

    /// All (id, delegate) pairs set by `custodian`, ordered by id.
    pub fn delegations_of(&self, custodian: &str) -> Vec<(&str, &str)> {
        entries_of(&self.delegates, custodian)
    }

    /// All (id, delegator) pairs whitelisted by `custodian`, ordered by id.
    pub fn whitelist_of(&self, custodian: &str) -> Vec<(&str, &str)> {
        entries_of(&self.delegators, custodian)
    }

    /// All (custodian, id) pairs currently delegated to `delegate`.
    pub fn delegated_to(&self, delegate: &str) -> Vec<(&str, &str)> {
        entries_pointing_at(&self.delegates, delegate)
    }

    /// All (custodian, id) pairs for which `delegator` is whitelisted.
    pub fn whitelisted_as(&self, delegator: &str) -> Vec<(&str, &str)> {
        entries_pointing_at(&self.delegators, delegator)
    }

    pub fn delegate_count(&self) -> usize {
        self.delegates.len()
    }

    pub fn delegator_count(&self) -> usize {
        self.delegators.len()
    }
}

fn entries_of<'a>(
    relation: &'a BTreeMap<EntryKey, String>,
    custodian: &str,
) -> Vec<(&'a str, &'a str)> {
    relation
        .range((custodian.to_string(), String::new())..)
        .take_while(|((owner, _), _)| owner == custodian)
        .map(|((_, id), account)| (id.as_str(), account.as_str()))
        .collect()
}

fn entries_pointing_at<'a>(
    relation: &'a BTreeMap<EntryKey, String>,
    account: &str,
) -> Vec<(&'a str, &'a str)> {
    relation
        .iter()
        .filter(|(_, target)| target.as_str() == account)
        .map(|((custodian, id), _)| (custodian.as_str(), id.as_str()))
        .collect()
}
