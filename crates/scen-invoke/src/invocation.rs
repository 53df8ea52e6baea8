//! Result of one contract call, send, deploy or transfer

use std::fmt;

use crate::abi::Token;
use crate::error::InvocationError;
use crate::failure::{decode_failures, Failure};
use crate::interface::Interface;
use crate::receipt::Receipt;
use crate::reporter::ErrorReporter;

/// One decoded call argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedArg {
    /// Declared input name
    pub name: String,
    /// Decoded value
    pub value: Token,
}

/// Outcome of a single external contract interaction.
///
/// Three channels are reconciled here: the transport error (if the caller
/// failed), the decoded call arguments, and the on-chain failure logs found
/// in the receipt. The invocation only succeeded when both error channels are
/// clean.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation<T> {
    /// Returned value, when the call produced one
    pub value: Option<T>,
    /// Receipt, absent for purely local failures
    pub receipt: Option<Receipt>,
    /// Transport or revert error
    pub error: Option<InvocationError>,
    /// Failure logs decoded from the receipt
    pub failures: Vec<Failure>,
    /// Called method, when known
    pub method: Option<String>,
    /// Decoded call arguments, in declaration order
    pub args: Vec<DecodedArg>,
    /// Gas used according to the receipt
    pub gas_used: u64,
}

impl<T> Invocation<T> {
    /// Build an invocation, decoding failure logs from the receipt
    pub fn new(
        value: Option<T>,
        receipt: Option<Receipt>,
        error: Option<InvocationError>,
        reporter: &dyn ErrorReporter,
    ) -> Self {
        let failures = receipt
            .as_ref()
            .map(|r| decode_failures(r, reporter))
            .unwrap_or_default();
        let gas_used = receipt.as_ref().map_or(0, |r| r.gas_used);

        Self {
            value,
            receipt,
            error,
            failures,
            method: None,
            args: Vec::new(),
            gas_used,
        }
    }

    /// Record the called method and decode its arguments from `data`.
    ///
    /// Decoding problems leave the arguments empty.
    pub fn with_call(mut self, interface: &Interface, method: &str, data: &[u8]) -> Self {
        self.method = Some(method.to_string());

        let decoded = interface
            .function(method)
            .and_then(|function| Ok((function, interface.decode_function_data(function, data)?)));

        match decoded {
            Ok((function, tokens)) => {
                self.args = function
                    .inputs
                    .iter()
                    .zip(tokens)
                    .map(|(param, value)| DecodedArg {
                        name: param.name.clone(),
                        value,
                    })
                    .collect();
            }
            Err(e) => {
                tracing::warn!("Could not decode arguments of {}.{}: {}", interface.name(), method, e);
            }
        }

        self
    }

    /// No transport error and no failure logs
    pub fn succeeded(&self) -> bool {
        self.error.is_none() && self.failures.is_empty()
    }

    /// `"method(arg=value,...)"`, or `unknown method`
    pub fn invocation(&self) -> String {
        match &self.method {
            Some(method) => {
                let args: Vec<String> = self
                    .args
                    .iter()
                    .map(|arg| format!("{}={}", arg.name, arg.value))
                    .collect();
                format!("\"{}({})\"", method, args.join(","))
            }
            None => "unknown method".to_string(),
        }
    }

    /// Replace the value, keeping everything else
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Invocation<U> {
        Invocation {
            value: self.value.map(f),
            receipt: self.receipt,
            error: self.error,
            failures: self.failures,
            method: self.method,
            args: self.args,
            gas_used: self.gas_used,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Invocation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tx = self
            .receipt
            .as_ref()
            .map(|r| format!("{:?}", r.transaction_hash))
            .unwrap_or_default();
        let value = self
            .value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default();
        let error = self
            .error
            .as_ref()
            .map_or_else(|| "null".to_string(), |e| e.to_string());
        let failures: Vec<String> = self.failures.iter().map(|f| f.to_string()).collect();

        write!(
            f,
            "Invocation<{}, tx={}, value={}, error={}, failures={}>",
            self.invocation(),
            tx,
            value,
            error,
            failures.join(",")
        )
    }
}
