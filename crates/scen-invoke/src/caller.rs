//! Contract call capability and a scripted mock

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use primitive_types::{H160, H256, U256};

use crate::error::CallerError;
use crate::receipt::Receipt;

/// A transaction as handed to the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxRequest {
    /// Sender
    pub from: H160,
    /// Recipient; `None` for contract creation
    pub to: Option<H160>,
    /// Call data, or init code for creations
    pub data: Bytes,
    /// Attached value in wei
    pub value: U256,
    /// Gas limit
    pub gas_limit: Option<u64>,
    /// Gas price in wei
    pub gas_price: Option<U256>,
}

impl TxRequest {
    /// Call `to` with `data`
    pub fn call(from: H160, to: H160, data: impl Into<Bytes>) -> Self {
        Self {
            from,
            to: Some(to),
            data: data.into(),
            ..Self::default()
        }
    }

    /// Attach value
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// Executes transactions against a chain (object-safe)
#[async_trait]
pub trait ContractCaller: Send + Sync {
    /// Static call; nothing is mined
    async fn call(&self, tx: &TxRequest) -> Result<Bytes, CallerError>;

    /// Send and wait for the receipt
    async fn send(&self, tx: &TxRequest) -> Result<Receipt, CallerError>;

    /// Create a contract from `tx.data`; returns its address and receipt
    async fn deploy(&self, tx: &TxRequest) -> Result<(H160, Receipt), CallerError>;
}

#[derive(Default)]
struct Script {
    calls: VecDeque<Result<Bytes, CallerError>>,
    sends: VecDeque<Result<Receipt, CallerError>>,
    deploys: VecDeque<Result<(H160, Receipt), CallerError>>,
    requests: Vec<(&'static str, TxRequest)>,
}

/// Caller that replays scripted responses in order.
///
/// Unscripted calls return empty data, unscripted sends a receipt using
/// [`MockCaller::DEFAULT_GAS`] gas, and unscripted deploys a fixed address.
#[derive(Clone, Default)]
pub struct MockCaller {
    script: Arc<Mutex<Script>>,
}

impl MockCaller {
    /// Gas reported by unscripted receipts
    pub const DEFAULT_GAS: u64 = 21_000;

    /// Create a mock with no scripted responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Address returned by unscripted deploys
    pub fn default_deploy_address() -> H160 {
        H160::repeat_byte(0xde)
    }

    fn with_script<R>(&self, f: impl FnOnce(&mut Script) -> R) -> Result<R, CallerError> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| CallerError::Transport("MockCaller mutex poisoned".to_string()))?;
        Ok(f(&mut script))
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().expect("MockCaller mutex poisoned")
    }

    /// Queue the result of the next static call
    ///
    /// # Panics
    /// Panics if the mutex is poisoned (a panic while holding the lock).
    pub fn push_call(&self, result: Result<Bytes, CallerError>) {
        self.script().calls.push_back(result);
    }

    /// Queue the result of the next send
    ///
    /// # Panics
    /// Panics if the mutex is poisoned.
    pub fn push_send(&self, result: Result<Receipt, CallerError>) {
        self.script().sends.push_back(result);
    }

    /// Queue the result of the next deploy
    ///
    /// # Panics
    /// Panics if the mutex is poisoned.
    pub fn push_deploy(&self, result: Result<(H160, Receipt), CallerError>) {
        self.script().deploys.push_back(result);
    }

    /// Requests seen so far, tagged `call`, `send` or `deploy`
    ///
    /// # Panics
    /// Panics if the mutex is poisoned.
    pub fn requests(&self) -> Vec<(&'static str, TxRequest)> {
        self.script().requests.clone()
    }

    fn default_receipt(seq: usize) -> Receipt {
        Receipt {
            transaction_hash: H256::from_low_u64_be(seq as u64 + 1),
            block_number: Some(seq as u64 + 1),
            gas_used: Self::DEFAULT_GAS,
            ..Receipt::default()
        }
    }
}

#[async_trait]
impl ContractCaller for MockCaller {
    async fn call(&self, tx: &TxRequest) -> Result<Bytes, CallerError> {
        self.with_script(|s| {
            s.requests.push(("call", tx.clone()));
            s.calls.pop_front().unwrap_or_else(|| Ok(Bytes::new()))
        })?
    }

    async fn send(&self, tx: &TxRequest) -> Result<Receipt, CallerError> {
        self.with_script(|s| {
            s.requests.push(("send", tx.clone()));
            let seq = s.requests.len();
            s.sends
                .pop_front()
                .unwrap_or_else(|| Ok(Self::default_receipt(seq)))
        })?
    }

    async fn deploy(&self, tx: &TxRequest) -> Result<(H160, Receipt), CallerError> {
        self.with_script(|s| {
            s.requests.push(("deploy", tx.clone()));
            let seq = s.requests.len();
            s.deploys.pop_front().unwrap_or_else(|| {
                let address = Self::default_deploy_address();
                let receipt = Receipt {
                    contract_address: Some(address),
                    ..Self::default_receipt(seq)
                };
                Ok((address, receipt))
            })
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_defaults() {
        let caller = MockCaller::new();
        let tx = TxRequest::call(H160::zero(), H160::repeat_byte(1), vec![1, 2, 3]);

        assert!(caller.call(&tx).await.unwrap().is_empty());
        assert_eq!(caller.send(&tx).await.unwrap().gas_used, MockCaller::DEFAULT_GAS);
        let (address, receipt) = caller.deploy(&tx).await.unwrap();
        assert_eq!(address, MockCaller::default_deploy_address());
        assert_eq!(receipt.contract_address, Some(address));

        let kinds: Vec<_> = caller.requests().into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec!["call", "send", "deploy"]);
    }

    fn poisoned() -> MockCaller {
        let caller = MockCaller::new();
        let holder = caller.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.script.lock().unwrap();
            panic!("panic while scripting");
        })
        .join();
        caller
    }

    #[tokio::test]
    async fn test_poisoned_mock_fails_calls() {
        let caller = poisoned();
        let err = caller.call(&TxRequest::default()).await.unwrap_err();
        assert_eq!(err, CallerError::Transport("MockCaller mutex poisoned".to_string()));
    }

    #[test]
    #[should_panic(expected = "MockCaller mutex poisoned")]
    fn test_poisoned_mock_rejects_scripting() {
        poisoned().push_call(Ok(Bytes::new()));
    }

    #[test]
    #[should_panic(expected = "MockCaller mutex poisoned")]
    fn test_poisoned_mock_rejects_inspection() {
        poisoned().requests();
    }

    #[tokio::test]
    async fn test_mock_scripted_in_order() {
        let caller = MockCaller::new();
        caller.push_call(Err(CallerError::Rejected("first (1)".into())));
        caller.push_call(Ok(Bytes::from_static(&[9])));

        let tx = TxRequest::default();
        assert!(caller.call(&tx).await.is_err());
        assert_eq!(caller.call(&tx).await.unwrap(), Bytes::from_static(&[9]));
        assert!(caller.call(&tx).await.unwrap().is_empty());
    }
}
