use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::DynamicConfigStore;
use crate::proposal::ParameterCode;
use crate::Result;

/// Network parameters a governance proposal may change, by their on-chain code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Parameter {
    AccountUpgradeCost,
    CreateAccountFee,
    TransactionFee,
}

impl Parameter {
    pub const ALL: [Parameter; 3] = [
        Parameter::AccountUpgradeCost,
        Parameter::CreateAccountFee,
        Parameter::TransactionFee,
    ];

    /// Codes without a setter in this release map to `None`.
    pub fn from_code(code: ParameterCode) -> Option<Self> {
        match code {
            1 => Some(Parameter::AccountUpgradeCost),
            2 => Some(Parameter::CreateAccountFee),
            3 => Some(Parameter::TransactionFee),
            _ => None,
        }
    }

    pub fn code(self) -> ParameterCode {
        match self {
            Parameter::AccountUpgradeCost => 1,
            Parameter::CreateAccountFee => 2,
            Parameter::TransactionFee => 3,
        }
    }

    pub fn apply(self, value: u64, config: &mut impl DynamicConfigStore) -> Result<()> {
        match self {
            Parameter::AccountUpgradeCost => config.save_account_upgrade_cost(value),
            Parameter::CreateAccountFee => config.save_create_account_fee(value),
            Parameter::TransactionFee => config.save_transaction_fee(value),
        }
    }

    pub fn current(self, config: &impl DynamicConfigStore) -> Result<u64> {
        match self {
            Parameter::AccountUpgradeCost => config.account_upgrade_cost(),
            Parameter::CreateAccountFee => config.create_account_fee(),
            Parameter::TransactionFee => config.transaction_fee(),
        }
    }
}

/// Writes every known parameter of an approved proposal to the network config.
///
/// Unknown codes are dropped so proposals created by newer releases still resolve.
pub fn apply_parameters(
    parameters: &BTreeMap<ParameterCode, u64>,
    config: &mut impl DynamicConfigStore,
) -> Result<()> {
    for (code, value) in parameters.iter() {
        match Parameter::from_code(*code) {
            Some(parameter) => {
                info!("[GOV] setting {:?} (code {}) to {}", parameter, code, value);
                parameter.apply(*value, config)?;
            }
            None => warn!("[GOV] ignoring unknown parameter code {} = {}", code, value),
        }
    }
    Ok(())
}
