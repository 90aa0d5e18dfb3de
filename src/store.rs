use std::collections::BTreeMap;

use log::debug;

use crate::proposal::{Proposal, ProposalId};
use crate::Result;

/// A byte-level key-value store. The storage engine behind it is owned by the host node.
pub trait KvBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;
    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()>;
}

impl KvBackend for BTreeMap<Vec<u8>, Vec<u8>> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(BTreeMap::get(self, key).cloned())
    }

    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        self.insert(key, value);
        Ok(())
    }
}

pub trait ProposalStore {
    fn get(&self, id: ProposalId) -> Result<Option<Proposal>>;
    fn put(&mut self, proposal: Proposal) -> Result<()>;
}

impl<S: ProposalStore + ?Sized> ProposalStore for &mut S {
    fn get(&self, id: ProposalId) -> Result<Option<Proposal>> {
        (**self).get(id)
    }

    fn put(&mut self, proposal: Proposal) -> Result<()> {
        (**self).put(proposal)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryProposalStore {
    pub proposals: BTreeMap<ProposalId, Proposal>,
}

impl MemoryProposalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromIterator<Proposal> for MemoryProposalStore {
    fn from_iter<I: IntoIterator<Item = Proposal>>(iter: I) -> Self {
        MemoryProposalStore {
            proposals: iter.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

impl ProposalStore for MemoryProposalStore {
    fn get(&self, id: ProposalId) -> Result<Option<Proposal>> {
        Ok(self.proposals.get(&id).cloned())
    }

    fn put(&mut self, proposal: Proposal) -> Result<()> {
        self.proposals.insert(proposal.id, proposal);
        Ok(())
    }
}

/// Proposals persisted as bincode records under their big-endian id.
#[derive(Debug, Default)]
pub struct EncodedProposalStore<B: KvBackend> {
    backend: B,
}

impl<B: KvBackend> EncodedProposalStore<B> {
    pub fn new(backend: B) -> Self {
        EncodedProposalStore { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}

impl<B: KvBackend> ProposalStore for EncodedProposalStore<B> {
    fn get(&self, id: ProposalId) -> Result<Option<Proposal>> {
        match self.backend.get(&Proposal::db_key(id))? {
            Some(bytes) => Ok(Some(Proposal::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put(&mut self, proposal: Proposal) -> Result<()> {
        let bytes = proposal.to_bytes()?;
        debug!(
            "[GOV] storing proposal {} under {} ({} bytes)",
            proposal.id,
            hex::encode(proposal.create_db_key()),
            bytes.len()
        );
        self.backend.put(proposal.create_db_key().to_vec(), bytes)
    }
}
