//! Transaction receipts as seen by the invocation layer

use bytes::Bytes;
use primitive_types::{H160, H256};

/// Log entry emitted during execution
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Log {
    /// Emitting contract
    pub address: H160,
    /// Indexed topics; the first is the event signature hash
    pub topics: Vec<H256>,
    /// Non-indexed payload
    pub data: Bytes,
}

impl Log {
    /// Create a log entry
    pub fn new(address: H160, topics: Vec<H256>, data: impl Into<Bytes>) -> Self {
        Self {
            address,
            topics,
            data: data.into(),
        }
    }

    /// Event signature hash
    pub fn topic0(&self) -> Option<&H256> {
        self.topics.first()
    }
}

/// Mined (or fabricated) transaction receipt
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Receipt {
    /// Transaction hash
    pub transaction_hash: H256,
    /// Block number; `None` for dry runs
    pub block_number: Option<u64>,
    /// Gas used by this transaction
    pub gas_used: u64,
    /// Deployed contract address, for creations
    pub contract_address: Option<H160>,
    /// Emitted logs
    pub logs: Vec<Log>,
}

impl Receipt {
    /// Empty receipt standing in for a transaction that was never sent
    pub fn dry_run() -> Self {
        Self::default()
    }

    /// Logs whose first topic is `topic`
    pub fn logs_with_topic<'a>(&'a self, topic: &'a H256) -> impl Iterator<Item = &'a Log> + 'a {
        self.logs.iter().filter(move |log| log.topic0() == Some(topic))
    }
}
