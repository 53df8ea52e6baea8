//! Drivers that run a transaction and fold every outcome into an [`Invocation`]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use primitive_types::{H160, U256};

use crate::abi::{self, Token};
use crate::caller::{ContractCaller, TxRequest};
use crate::config::InvocationOpts;
use crate::error::{AbiError, CallerError, InvocationError};
use crate::interface::Interface;
use crate::invocation::Invocation;
use crate::receipt::Receipt;
use crate::reporter::{ErrorReporter, NoErrorReporter};

/// Running total of gas used by sent transactions; clones share the total
#[derive(Debug, Clone, Default)]
pub struct GasCounter(Arc<AtomicU64>);

impl GasCounter {
    /// Create a counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Add gas
    pub fn add(&self, gas: u64) {
        self.0.fetch_add(gas, Ordering::Relaxed);
    }

    /// Current total
    pub fn value(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Compiled contract: interface plus init code
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    /// Interface, named after the contract
    pub interface: Interface,
    /// Init code
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Create an artifact
    pub fn new(interface: Interface, bytecode: impl Into<Bytes>) -> Self {
        Self {
            interface,
            bytecode: bytecode.into(),
        }
    }

    /// Contract name
    pub fn name(&self) -> &str {
        self.interface.name()
    }

    /// Parse a compiler artifact with `contractName`, `abi` and hex `bytecode`
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Raw {
            contract_name: String,
            abi: serde_json::Value,
            #[serde(default)]
            bytecode: String,
        }

        let raw: Raw = serde_json::from_str(json).map_err(|e| AbiError::Json(e.to_string()))?;
        let interface = Interface::from_json(raw.contract_name, &raw.abi.to_string())?;
        let code = raw.bytecode.trim_start_matches("0x");
        let bytecode = hex::decode(code).map_err(|e| AbiError::Json(format!("bytecode: {}", e)))?;
        Ok(Self::new(interface, bytecode))
    }
}

/// Runs transactions through a [`ContractCaller`] with shared options.
///
/// Every driver method returns an [`Invocation`]; failures are carried in it
/// rather than returned as `Err`.
pub struct Driver<'a> {
    caller: &'a dyn ContractCaller,
    opts: InvocationOpts,
    gas: Option<GasCounter>,
}

impl<'a> Driver<'a> {
    /// Create a driver
    pub fn new(caller: &'a dyn ContractCaller, opts: InvocationOpts) -> Self {
        Self {
            caller,
            opts,
            gas: None,
        }
    }

    /// Accumulate gas of mined transactions into `counter`
    pub fn with_gas_counter(mut self, counter: GasCounter) -> Self {
        self.gas = Some(counter);
        self
    }

    /// Options in effect
    pub fn opts(&self) -> &InvocationOpts {
        &self.opts
    }

    /// Call `method` on a contract.
    ///
    /// A static call runs first; if it fails the transaction is not sent. In
    /// dry-run mode the send is skipped and an empty receipt stands in for it.
    pub async fn invoke(
        &self,
        tx: TxRequest,
        contract: &Interface,
        method: &str,
        reporter: &dyn ErrorReporter,
    ) -> Invocation<Bytes> {
        let tx = self.opts.apply(tx);
        tracing::debug!("Invoking {}.{}", contract.name(), method);

        let (value, receipt, error) = self.execute(&tx, method, reporter).await;
        Invocation::new(value, receipt, error, reporter).with_call(contract, method, &tx.data)
    }

    /// Plain value transfer; there is no method to decode
    pub async fn fallback(&self, from: H160, to: H160, value: U256) -> Invocation<Bytes> {
        let tx = self
            .opts
            .apply(TxRequest::call(from, to, Bytes::new()).with_value(value));
        tracing::debug!("Transferring {} wei to {:?}", value, to);

        let (value, receipt, error) = self.execute(&tx, "fallback", &NoErrorReporter).await;
        Invocation::new(value, receipt, error, &NoErrorReporter)
    }

    /// Deploy `artifact` with constructor `args`; the value is the new address
    pub async fn deploy(&self, from: H160, artifact: &ContractArtifact, args: &[Token]) -> Invocation<H160> {
        let mut data = artifact.bytecode.to_vec();
        match artifact.interface.encode_constructor(args) {
            Ok(encoded) => data.extend(encoded),
            Err(e) => {
                tracing::warn!("Cannot encode constructor of {}: {}", artifact.name(), e);
                return Invocation::new(None, None, Some(InvocationError::Encode(e)), &NoErrorReporter);
            }
        }

        let tx = self.opts.apply(TxRequest {
            from,
            data: data.into(),
            ..TxRequest::default()
        });

        if self.opts.dry_run {
            let address = dry_run_address(&tx);
            tracing::info!("Dry run: deploying {} at fake address {:?}", artifact.name(), address);
            return Invocation::new(Some(address), None, None, &NoErrorReporter);
        }

        match self.caller.deploy(&tx).await {
            Ok((address, receipt)) => {
                self.record_gas(&receipt);
                tracing::info!("Deployed {} at {:?}", artifact.name(), address);
                Invocation::new(Some(address), Some(receipt), None, &NoErrorReporter)
            }
            Err(e) => {
                tracing::warn!("Deploy of {} failed: {}", artifact.name(), e);
                let error = InvocationError::classify(e, |_| None);
                Invocation::new(None, None, Some(error), &NoErrorReporter)
            }
        }
    }

    async fn execute(
        &self,
        tx: &TxRequest,
        label: &str,
        reporter: &dyn ErrorReporter,
    ) -> (Option<Bytes>, Option<Receipt>, Option<InvocationError>) {
        let classify = |e: CallerError| InvocationError::classify(e, |code| reporter.resolve_error(code));

        let value = match self.caller.call(tx).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("Preflight call of {} failed: {}", label, e);
                return (None, None, Some(classify(e)));
            }
        };

        if self.opts.dry_run {
            tracing::info!("Dry run: invoking `{}`", label);
            return (Some(value), Some(Receipt::dry_run()), None);
        }

        match self.caller.send(tx).await {
            Ok(receipt) => {
                self.record_gas(&receipt);
                (Some(value), Some(receipt), None)
            }
            Err(e) => {
                tracing::debug!("Send of {} failed: {}", label, e);
                (None, None, Some(classify(e)))
            }
        }
    }

    fn record_gas(&self, receipt: &Receipt) {
        if let Some(gas) = &self.gas {
            gas.add(receipt.gas_used);
        }
    }
}

/// Deterministic stand-in address derived from sender and init code
fn dry_run_address(tx: &TxRequest) -> H160 {
    let mut preimage = tx.from.as_bytes().to_vec();
    preimage.extend_from_slice(&tx.data);
    H160::from_slice(&abi::keccak256(&preimage).as_bytes()[12..])
}

/// Render raw call data as `Contract.method(\n\targ=value\n)`
pub fn decode_call(contract: &Interface, input: &[u8]) -> Result<String, AbiError> {
    let function = contract.function_for_data(input)?;
    let values = contract.decode_function_data(function, input)?;

    let args: Vec<String> = function
        .inputs
        .iter()
        .zip(values)
        .map(|(param, value)| format!("{}={}", param.name, value))
        .collect();

    Ok(format!(
        "{}.{}(\n\t{}\n)",
        contract.name(),
        function.name,
        args.join("\n\t")
    ))
}
