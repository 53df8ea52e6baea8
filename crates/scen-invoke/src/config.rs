//! Invocation options

use std::path::Path;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::caller::TxRequest;
use crate::error::ConfigError;

/// Options merged into every transaction a driver sends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationOpts {
    /// Gas limit used unless `total_gas` is set
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    /// Gas price in wei
    #[serde(default = "default_gas_price")]
    pub gas_price: u64,
    /// Overrides `gas_limit` when set
    #[serde(default)]
    pub total_gas: Option<u64>,
    /// Skip sends and fabricate empty receipts
    #[serde(default)]
    pub dry_run: bool,
}

fn default_gas_limit() -> u64 {
    2_000_000_000
}

fn default_gas_price() -> u64 {
    1_000_000_000
}

impl Default for InvocationOpts {
    fn default() -> Self {
        Self {
            gas_limit: default_gas_limit(),
            gas_price: default_gas_price(),
            total_gas: None,
            dry_run: false,
        }
    }
}

impl InvocationOpts {
    /// Parse options from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load options from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Gas limit actually applied
    pub fn effective_gas_limit(&self) -> u64 {
        self.total_gas.unwrap_or(self.gas_limit)
    }

    /// Apply gas settings to a request
    pub fn apply(&self, mut tx: TxRequest) -> TxRequest {
        tx.gas_limit = Some(self.effective_gas_limit());
        tx.gas_price = Some(U256::from(self.gas_price));
        tx
    }
}
