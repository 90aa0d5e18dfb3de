use std::collections::{BTreeMap, BTreeSet};

use blsttc::{PublicKeySet, SecretKeyShare, SignatureShare};
use log::{debug, warn};
use serde::Serialize;

use crate::proposal::{ParameterCode, Proposal, ProposalId};
use crate::{NodeId, Result};

/// Decides whether a proposal gathered enough validator approvals by the time it is resolved.
pub trait ApprovalPredicate {
    fn has_most_approvals(&self, proposal: &Proposal) -> bool;
}

impl<F: Fn(&Proposal) -> bool> ApprovalPredicate for F {
    fn has_most_approvals(&self, proposal: &Proposal) -> bool {
        self(proposal)
    }
}

#[derive(Serialize)]
struct ApprovalPayload<'a> {
    id: ProposalId,
    parameters: &'a BTreeMap<ParameterCode, u64>,
}

/// The bytes a validator signs to approve a proposal.
pub fn approval_bytes(proposal: &Proposal) -> Result<Vec<u8>> {
    Ok(bincode::serialize(&ApprovalPayload {
        id: proposal.id,
        parameters: &proposal.parameters,
    })?)
}

pub fn sign_approval(proposal: &Proposal, secret_key: &SecretKeyShare) -> Result<SignatureShare> {
    Ok(secret_key.sign(approval_bytes(proposal)?))
}

/// Approval by more than `threshold` active validators of the key set, counting
/// only signature shares that verify over the proposal.
#[derive(Debug, Clone)]
pub struct SuperMajority {
    pub validators: PublicKeySet,
    pub active: BTreeSet<NodeId>,
}

impl SuperMajority {
    pub fn new(validators: PublicKeySet, active: BTreeSet<NodeId>) -> Self {
        SuperMajority { validators, active }
    }

    pub fn count_valid_approvals(&self, proposal: &Proposal) -> usize {
        let msg = match approval_bytes(proposal) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("[GOV] could not encode proposal {}: {:?}", proposal.id, e);
                return 0;
            }
        };

        proposal
            .approvals
            .iter()
            .filter(|(voter, _)| self.active.contains(*voter))
            .filter(|(voter, sig)| {
                let valid = self
                    .validators
                    .public_key_share(**voter)
                    .verify(sig, &msg);
                if !valid {
                    debug!(
                        "[GOV] dropping invalid approval from {} on proposal {}",
                        voter, proposal.id
                    );
                }
                valid
            })
            .count()
    }
}

impl ApprovalPredicate for SuperMajority {
    fn has_most_approvals(&self, proposal: &Proposal) -> bool {
        self.count_valid_approvals(proposal) > self.validators.threshold()
    }
}
