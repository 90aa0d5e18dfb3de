use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::proposal::ProposalId;
use crate::store::KvBackend;
use crate::{Error, Result};

const LATEST_PROPOSAL_NUM: &str = "LATEST_PROPOSAL_NUM";
const ACCOUNT_UPGRADE_COST: &str = "ACCOUNT_UPGRADE_COST";
const CREATE_ACCOUNT_FEE: &str = "CREATE_ACCOUNT_FEE";
const TRANSACTION_FEE: &str = "TRANSACTION_FEE";

/// The mutable network parameters governance proposals act on.
///
/// Parameter values are only written by the resolver when a proposal is approved,
/// `latest_proposal_num` only by the proposal submission path.
pub trait DynamicConfigStore {
    fn latest_proposal_num(&self) -> Result<ProposalId>;
    fn account_upgrade_cost(&self) -> Result<u64>;
    fn create_account_fee(&self) -> Result<u64>;
    fn transaction_fee(&self) -> Result<u64>;

    fn save_latest_proposal_num(&mut self, num: ProposalId) -> Result<()>;
    fn save_account_upgrade_cost(&mut self, value: u64) -> Result<()>;
    fn save_create_account_fee(&mut self, value: u64) -> Result<()>;
    fn save_transaction_fee(&mut self, value: u64) -> Result<()>;
}

impl<C: DynamicConfigStore + ?Sized> DynamicConfigStore for &mut C {
    fn latest_proposal_num(&self) -> Result<ProposalId> {
        (**self).latest_proposal_num()
    }
    fn account_upgrade_cost(&self) -> Result<u64> {
        (**self).account_upgrade_cost()
    }
    fn create_account_fee(&self) -> Result<u64> {
        (**self).create_account_fee()
    }
    fn transaction_fee(&self) -> Result<u64> {
        (**self).transaction_fee()
    }
    fn save_latest_proposal_num(&mut self, num: ProposalId) -> Result<()> {
        (**self).save_latest_proposal_num(num)
    }
    fn save_account_upgrade_cost(&mut self, value: u64) -> Result<()> {
        (**self).save_account_upgrade_cost(value)
    }
    fn save_create_account_fee(&mut self, value: u64) -> Result<()> {
        (**self).save_create_account_fee(value)
    }
    fn save_transaction_fee(&mut self, value: u64) -> Result<()> {
        (**self).save_transaction_fee(value)
    }
}

/// In-memory network parameters, also the shape of the genesis config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub latest_proposal_num: ProposalId,
    pub account_upgrade_cost: u64,
    pub create_account_fee: u64,
    pub transaction_fee: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            latest_proposal_num: 0,
            account_upgrade_cost: 9_999_000_000,
            create_account_fee: 100_000,
            transaction_fee: 10,
        }
    }
}

impl NetworkConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_toml_str(&std::fs::read_to_string(path)?)?;
        info!("[GOV] loaded network config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}

impl DynamicConfigStore for NetworkConfig {
    fn latest_proposal_num(&self) -> Result<ProposalId> {
        Ok(self.latest_proposal_num)
    }
    fn account_upgrade_cost(&self) -> Result<u64> {
        Ok(self.account_upgrade_cost)
    }
    fn create_account_fee(&self) -> Result<u64> {
        Ok(self.create_account_fee)
    }
    fn transaction_fee(&self) -> Result<u64> {
        Ok(self.transaction_fee)
    }
    fn save_latest_proposal_num(&mut self, num: ProposalId) -> Result<()> {
        self.latest_proposal_num = num;
        Ok(())
    }
    fn save_account_upgrade_cost(&mut self, value: u64) -> Result<()> {
        self.account_upgrade_cost = value;
        Ok(())
    }
    fn save_create_account_fee(&mut self, value: u64) -> Result<()> {
        self.create_account_fee = value;
        Ok(())
    }
    fn save_transaction_fee(&mut self, value: u64) -> Result<()> {
        self.transaction_fee = value;
        Ok(())
    }
}

/// Dynamic properties kept in a durable key-value backend, one 8 byte big-endian value per key.
#[derive(Debug)]
pub struct EncodedConfigStore<B: KvBackend> {
    backend: B,
}

impl<B: KvBackend> EncodedConfigStore<B> {
    /// Wraps a backend that already holds the dynamic properties.
    pub fn open(backend: B) -> Self {
        EncodedConfigStore { backend }
    }

    /// Seeds a fresh backend with the genesis parameters.
    pub fn genesis(backend: B, genesis: &NetworkConfig) -> Result<Self> {
        let mut store = Self::open(backend);
        store.save(LATEST_PROPOSAL_NUM, genesis.latest_proposal_num)?;
        store.save(ACCOUNT_UPGRADE_COST, genesis.account_upgrade_cost)?;
        store.save(CREATE_ACCOUNT_FEE, genesis.create_account_fee)?;
        store.save(TRANSACTION_FEE, genesis.transaction_fee)?;
        Ok(store)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    fn load(&self, key: &'static str) -> Result<u64> {
        let bytes = self
            .backend
            .get(key.as_bytes())?
            .ok_or(Error::MissingProperty { key })?;
        let raw: [u8; 8] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| Error::CorruptProperty {
                key,
                value: hex::encode(&bytes),
            })?;
        Ok(u64::from_be_bytes(raw))
    }

    fn save(&mut self, key: &'static str, value: u64) -> Result<()> {
        self.backend
            .put(key.as_bytes().to_vec(), value.to_be_bytes().to_vec())
    }
}

impl<B: KvBackend> DynamicConfigStore for EncodedConfigStore<B> {
    fn latest_proposal_num(&self) -> Result<ProposalId> {
        self.load(LATEST_PROPOSAL_NUM)
    }
    fn account_upgrade_cost(&self) -> Result<u64> {
        self.load(ACCOUNT_UPGRADE_COST)
    }
    fn create_account_fee(&self) -> Result<u64> {
        self.load(CREATE_ACCOUNT_FEE)
    }
    fn transaction_fee(&self) -> Result<u64> {
        self.load(TRANSACTION_FEE)
    }
    fn save_latest_proposal_num(&mut self, num: ProposalId) -> Result<()> {
        self.save(LATEST_PROPOSAL_NUM, num)
    }
    fn save_account_upgrade_cost(&mut self, value: u64) -> Result<()> {
        self.save(ACCOUNT_UPGRADE_COST, value)
    }
    fn save_create_account_fee(&mut self, value: u64) -> Result<()> {
        self.save(CREATE_ACCOUNT_FEE, value)
    }
    fn save_transaction_fee(&mut self, value: u64) -> Result<()> {
        self.save(TRANSACTION_FEE, value)
    }
}
