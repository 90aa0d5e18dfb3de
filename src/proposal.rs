use std::collections::BTreeMap;

use blsttc::SignatureShare;
use core::fmt::Debug;
use serde::{Deserialize, Serialize};

use crate::{Error, NodeId, Result};

pub type ProposalId = u64;
pub type ParameterCode = u64;
/// Milliseconds since the unix epoch, as reported by the maintenance scheduler.
pub type Timestamp = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    Pending,
    Canceled,
    Approved,
    Disapproved,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: NodeId,
    pub parameters: BTreeMap<ParameterCode, u64>,
    pub create_time: Timestamp,
    pub expiration_time: Timestamp,
    /// Approval signature shares collected by the voting subsystem, keyed by voter.
    pub approvals: BTreeMap<NodeId, SignatureShare>,
    state: ProposalState,
}

impl Debug for Proposal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "P{}-{:?}-exp{}-{:?}-A{:?}",
            self.id,
            self.state,
            self.expiration_time,
            self.parameters,
            self.approvals.keys().collect::<Vec<_>>()
        )
    }
}

impl Proposal {
    pub fn new(
        id: ProposalId,
        proposer: NodeId,
        parameters: BTreeMap<ParameterCode, u64>,
        create_time: Timestamp,
        expiration_time: Timestamp,
    ) -> Self {
        Proposal {
            id,
            proposer,
            parameters,
            create_time,
            expiration_time,
            approvals: Default::default(),
            state: ProposalState::Pending,
        }
    }

    /// Durable stores key proposal records by the big-endian id.
    pub fn db_key(id: ProposalId) -> [u8; 8] {
        id.to_be_bytes()
    }

    pub fn create_db_key(&self) -> [u8; 8] {
        Self::db_key(self.id)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    pub fn state(&self) -> ProposalState {
        self.state
    }

    pub fn has_processed(&self) -> bool {
        matches!(
            self.state,
            ProposalState::Approved | ProposalState::Disapproved
        )
    }

    pub fn has_canceled(&self) -> bool {
        self.state == ProposalState::Canceled
    }

    pub fn has_expired(&self, time: Timestamp) -> bool {
        self.expiration_time <= time
    }

    /// Cancellation belongs to the voting subsystem; only a pending proposal may be canceled.
    pub fn cancel(&mut self) -> Result<()> {
        self.set_state(ProposalState::Canceled)
    }

    /// Moves a pending proposal to its next state. Final states never revert.
    pub fn set_state(&mut self, to: ProposalState) -> Result<()> {
        match (self.state, to) {
            (ProposalState::Pending, ProposalState::Canceled)
            | (ProposalState::Pending, ProposalState::Approved)
            | (ProposalState::Pending, ProposalState::Disapproved) => {
                self.state = to;
                Ok(())
            }
            (from, to) => Err(Error::InvalidStateTransition {
                id: self.id,
                from,
                to,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal() -> Proposal {
        Proposal::new(7, 1, BTreeMap::from_iter([(2, 500), (99, 1234)]), 10, 100)
    }

    #[test]
    fn test_db_key_is_big_endian_id() {
        assert_eq!(Proposal::db_key(1), [0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(proposal().create_db_key(), [0, 0, 0, 0, 0, 0, 0, 7]);
    }

    #[test]
    fn test_expired_at_and_after_expiration_time() {
        let p = proposal();
        assert!(!p.has_expired(99));
        assert!(p.has_expired(100));
        assert!(p.has_expired(101));
    }

    #[test]
    fn test_decoding_a_stored_record() -> Result<()> {
        let mut p = proposal();
        p.set_state(ProposalState::Disapproved)?;
        let decoded = Proposal::from_bytes(&p.to_bytes()?)?;
        assert_eq!(decoded, p);
        assert!(decoded.has_processed());
        assert!(Proposal::from_bytes(&[1, 2, 3]).is_err());
        Ok(())
    }

    #[test]
    fn test_final_states_never_revert() -> Result<()> {
        let mut p = proposal();
        p.set_state(ProposalState::Approved)?;
        assert!(matches!(
            p.set_state(ProposalState::Pending),
            Err(Error::InvalidStateTransition { id: 7, .. })
        ));
        assert!(matches!(
            p.set_state(ProposalState::Disapproved),
            Err(Error::InvalidStateTransition { .. })
        ));
        assert_eq!(p.state(), ProposalState::Approved);
        Ok(())
    }

    #[test]
    fn test_canceled_proposal_can_not_be_resolved() -> Result<()> {
        let mut p = proposal();
        p.cancel()?;
        assert!(p.has_canceled());
        assert!(!p.has_processed());
        assert!(p.set_state(ProposalState::Approved).is_err());
        Ok(())
    }
}
