use log::info;

use crate::approval::ApprovalPredicate;
use crate::config::DynamicConfigStore;
use crate::parameter::apply_parameters;
use crate::proposal::{Proposal, ProposalId, ProposalState, Timestamp};
use crate::store::ProposalStore;
use crate::{Error, Result};

/// What a single maintenance pass did, in scan order (highest id first).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub approved: Vec<ProposalId>,
    pub disapproved: Vec<ProposalId>,
    pub canceled: Vec<ProposalId>,
    /// Pending proposals that had not expired yet.
    pub pending: Vec<ProposalId>,
    /// The already processed proposal the scan stopped at, if any.
    pub halted_at: Option<ProposalId>,
    /// Scan cursor when the pass finished; 0 when every id was visited.
    pub cursor: ProposalId,
}

impl Resolution {
    pub fn resolved(&self) -> usize {
        self.approved.len() + self.disapproved.len()
    }
}

/// Resolves expired governance proposals once per maintenance cycle.
///
/// Proposals are visited from `latest_proposal_num` downwards. An already processed
/// proposal is the low-water mark: everything below it was resolved by an earlier pass,
/// so the scan stops there. Canceled and unexpired proposals are stepped over.
#[derive(Debug)]
pub struct ProposalResolver<P, C, A> {
    pub proposals: P,
    pub config: C,
    pub approval: A,
}

impl<P, C, A> ProposalResolver<P, C, A>
where
    P: ProposalStore,
    C: DynamicConfigStore,
    A: ApprovalPredicate,
{
    pub fn new(proposals: P, config: C, approval: A) -> Self {
        ProposalResolver {
            proposals,
            config,
            approval,
        }
    }

    pub fn into_parts(self) -> (P, C, A) {
        (self.proposals, self.config, self.approval)
    }

    pub fn process_proposals(&mut self, maintenance_time: Timestamp) -> Result<Resolution> {
        let latest_proposal_num = self.config.latest_proposal_num()?;
        let mut resolution = Resolution::default();
        if latest_proposal_num == 0 {
            info!("[GOV] latest proposal num is 0, nothing to process");
            return Ok(resolution);
        }

        let mut proposal_num = latest_proposal_num;
        while proposal_num > 0 {
            let proposal = self
                .proposals
                .get(proposal_num)?
                .ok_or(Error::MissingProposal {
                    id: proposal_num,
                    latest: latest_proposal_num,
                })?;

            if proposal.has_processed() {
                info!(
                    "[GOV] proposal {} has been processed, skipping it and all before it",
                    proposal.id
                );
                resolution.halted_at = Some(proposal.id);
                break;
            }

            if proposal.has_canceled() {
                info!("[GOV] proposal {} has been canceled, skipping it", proposal.id);
                resolution.canceled.push(proposal.id);
            } else if proposal.has_expired(maintenance_time) {
                let id = proposal.id;
                match self.process_proposal(proposal)? {
                    ProposalState::Approved => resolution.approved.push(id),
                    _ => resolution.disapproved.push(id),
                }
            } else {
                info!("[GOV] proposal {} has not expired, skipping it", proposal.id);
                resolution.pending.push(proposal.id);
            }

            proposal_num -= 1;
        }

        resolution.cursor = proposal_num;
        info!(
            "[GOV] process proposals done at {}, oldest proposal [{}], {} resolved",
            maintenance_time,
            proposal_num,
            resolution.resolved()
        );
        Ok(resolution)
    }

    /// Gives an expired pending proposal its final state and persists it, applying its
    /// parameters to the network config first when it was approved.
    pub fn process_proposal(&mut self, mut proposal: Proposal) -> Result<ProposalState> {
        if self.approval.has_most_approvals(&proposal) {
            info!(
                "[GOV] proposal {} received most approvals, setting dynamic parameters {:?}",
                proposal.id, proposal.parameters
            );
            proposal.set_state(ProposalState::Approved)?;
            self.set_dynamic_parameters(&proposal)?;
        } else {
            info!(
                "[GOV] proposal {} has not received enough approvals, disapproving it",
                proposal.id
            );
            proposal.set_state(ProposalState::Disapproved)?;
        }

        let state = proposal.state();
        self.proposals.put(proposal)?;
        Ok(state)
    }

    pub fn set_dynamic_parameters(&mut self, proposal: &Proposal) -> Result<()> {
        apply_parameters(&proposal.parameters, &mut self.config)
    }
}
