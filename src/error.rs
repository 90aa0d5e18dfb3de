use thiserror::Error;

use crate::proposal::{ProposalId, ProposalState};

#[derive(Error, Debug)]
pub enum Error {
    #[error("We experienced an IO error")]
    IO(#[from] std::io::Error),
    #[error("Proposal {id} is missing from the proposal store, ids 1..={latest} must all exist")]
    MissingProposal { id: ProposalId, latest: ProposalId },
    #[error("Proposal {id} can not move from {from:?} to {to:?}")]
    InvalidStateTransition {
        id: ProposalId,
        from: ProposalState,
        to: ProposalState,
    },
    #[error("Dynamic property {key} is not set")]
    MissingProperty { key: &'static str },
    #[error("Dynamic property {key} holds a malformed value: 0x{value}")]
    CorruptProperty { key: &'static str, value: String },
    #[error("Failed to encode with bincode")]
    Encoding(#[from] bincode::Error),
    #[error("Failed to parse network config: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
