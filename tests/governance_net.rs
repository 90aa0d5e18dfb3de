use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

use blsttc::SecretKeySet;
use governance_resolver::{
    sign_approval, DynamicConfigStore, MemoryProposalStore, NetworkConfig, NodeId, ParameterCode,
    Proposal, ProposalId, ProposalStore, Result, SuperMajority, Timestamp,
};
use rand::prelude::StdRng;

/// Proposal store that records every read and write the resolver makes.
#[derive(Debug, Default)]
pub struct CountingStore {
    pub inner: MemoryProposalStore,
    pub reads: Cell<usize>,
    pub writes: Vec<ProposalId>,
}

impl CountingStore {
    pub fn with_proposals(proposals: impl IntoIterator<Item = Proposal>) -> Self {
        CountingStore {
            inner: MemoryProposalStore::from_iter(proposals),
            ..Default::default()
        }
    }

    pub fn proposal(&self, id: ProposalId) -> &Proposal {
        &self.inner.proposals[&id]
    }

    pub fn reset_counts(&mut self) {
        self.reads.set(0);
        self.writes.clear();
    }
}

impl ProposalStore for CountingStore {
    fn get(&self, id: ProposalId) -> Result<Option<Proposal>> {
        self.reads.set(self.reads.get() + 1);
        self.inner.get(id)
    }

    fn put(&mut self, proposal: Proposal) -> Result<()> {
        self.writes.push(proposal.id);
        self.inner.put(proposal)
    }
}

/// Network config that records every setter call.
#[derive(Debug, Default)]
pub struct CountingConfig {
    pub inner: NetworkConfig,
    pub saves: Vec<(&'static str, u64)>,
}

impl CountingConfig {
    pub fn with_latest(latest_proposal_num: ProposalId) -> Self {
        CountingConfig {
            inner: NetworkConfig {
                latest_proposal_num,
                ..Default::default()
            },
            saves: Default::default(),
        }
    }
}

impl DynamicConfigStore for CountingConfig {
    fn latest_proposal_num(&self) -> Result<ProposalId> {
        self.inner.latest_proposal_num()
    }
    fn account_upgrade_cost(&self) -> Result<u64> {
        self.inner.account_upgrade_cost()
    }
    fn create_account_fee(&self) -> Result<u64> {
        self.inner.create_account_fee()
    }
    fn transaction_fee(&self) -> Result<u64> {
        self.inner.transaction_fee()
    }
    fn save_latest_proposal_num(&mut self, num: ProposalId) -> Result<()> {
        self.saves.push(("latest_proposal_num", num));
        self.inner.save_latest_proposal_num(num)
    }
    fn save_account_upgrade_cost(&mut self, value: u64) -> Result<()> {
        self.saves.push(("account_upgrade_cost", value));
        self.inner.save_account_upgrade_cost(value)
    }
    fn save_create_account_fee(&mut self, value: u64) -> Result<()> {
        self.saves.push(("create_account_fee", value));
        self.inner.save_create_account_fee(value)
    }
    fn save_transaction_fee(&mut self, value: u64) -> Result<()> {
        self.saves.push(("transaction_fee", value));
        self.inner.save_transaction_fee(value)
    }
}

pub fn pending(
    id: ProposalId,
    expiration_time: Timestamp,
    parameters: impl IntoIterator<Item = (ParameterCode, u64)>,
) -> Proposal {
    Proposal::new(id, 0, BTreeMap::from_iter(parameters), 0, expiration_time)
}

pub fn canceled(id: ProposalId, expiration_time: Timestamp) -> Proposal {
    let mut proposal = pending(id, expiration_time, [(2, 1)]);
    proposal.cancel().unwrap();
    proposal
}

/// A validator set plus the proposal submission path, standing in for the voting subsystem.
pub struct Net {
    pub validators: SecretKeySet,
    pub n_validators: u64,
    pub proposals: MemoryProposalStore,
    pub config: NetworkConfig,
}

impl Net {
    pub fn with_validators(threshold: usize, n: u64, mut rng: &mut StdRng) -> Self {
        Net {
            validators: SecretKeySet::random(threshold, &mut rng),
            n_validators: n,
            proposals: Default::default(),
            config: Default::default(),
        }
    }

    pub fn validator_ids(&self) -> BTreeSet<NodeId> {
        BTreeSet::from_iter(1..=self.n_validators)
    }

    pub fn super_majority(&self) -> SuperMajority {
        SuperMajority::new(self.validators.public_keys(), self.validator_ids())
    }

    pub fn submit(
        &mut self,
        proposer: NodeId,
        parameters: impl IntoIterator<Item = (ParameterCode, u64)>,
        create_time: Timestamp,
        expiration_time: Timestamp,
    ) -> Result<ProposalId> {
        let id = self.config.latest_proposal_num()? + 1;
        let proposal = Proposal::new(
            id,
            proposer,
            BTreeMap::from_iter(parameters),
            create_time,
            expiration_time,
        );
        self.proposals.put(proposal)?;
        self.config.save_latest_proposal_num(id)?;
        Ok(id)
    }

    pub fn approve(&mut self, id: ProposalId, voter: NodeId) -> Result<()> {
        let mut proposal = self.proposals.proposals[&id].clone();
        let sig = sign_approval(&proposal, &self.validators.secret_key_share(voter))?;
        proposal.approvals.insert(voter, sig);
        self.proposals.put(proposal)
    }

    pub fn cancel(&mut self, id: ProposalId) -> Result<()> {
        let mut proposal = self.proposals.proposals[&id].clone();
        proposal.cancel()?;
        self.proposals.put(proposal)
    }
}
