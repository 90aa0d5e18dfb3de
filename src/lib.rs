//! Maintenance-cycle resolution of on-chain governance proposals.
//!
//! At each maintenance boundary the host node calls
//! [`ProposalResolver::process_proposals`], which walks pending proposals from the newest
//! id down, decides approval for every expired one and writes approved parameter
//! changes into the network config. Every node must reach identical results, so the
//! walk order and the effect order are fully deterministic.

pub mod approval;
pub mod config;
pub mod error;
pub mod parameter;
pub mod proposal;
pub mod resolver;
pub mod store;

pub use crate::approval::{approval_bytes, sign_approval, ApprovalPredicate, SuperMajority};
pub use crate::config::{DynamicConfigStore, EncodedConfigStore, NetworkConfig};
pub use crate::error::{Error, Result};
pub use crate::parameter::{apply_parameters, Parameter};
pub use crate::proposal::{ParameterCode, Proposal, ProposalId, ProposalState, Timestamp};
pub use crate::resolver::{ProposalResolver, Resolution};
pub use crate::store::{EncodedProposalStore, KvBackend, MemoryProposalStore, ProposalStore};

pub type NodeId = u64;
