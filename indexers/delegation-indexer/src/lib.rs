//! Delegation Indexer
//!
//! Decodes NEP-297 JSON events from delegation-onsocial receipt logs and
//! replays them into the delegation and whitelist graph. The contract keeps
//! no reverse index and offers no enumeration; views such as "every id
//! alice.near has delegated" or "everything delegated to bob.near" are
//! built here from the log alone.
//!
//! Typical use:
//!   1. `decode_logs` over the receipt logs of the contract, in block order
//!   2. `DelegationGraph::replay` (or `apply` incrementally per block)
//!   3. `RecordFilter` to rebuild a partial view for one account or id

pub mod decoder;
pub mod filter;
pub mod graph;

pub use decoder::{
    decode_event_json, decode_event_log, decode_logs, DecodeError, DelegationRecord, RecordKind,
    Relation,
};
pub use filter::RecordFilter;
pub use graph::{DelegationGraph, ReplayError};
