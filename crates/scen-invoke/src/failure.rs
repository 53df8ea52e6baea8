//! On-chain `Failure(uint256,uint256,uint256)` logs

use std::fmt;

use primitive_types::{H256, U256};

use crate::abi::{self, ParamType, Token};
use crate::receipt::Receipt;
use crate::reporter::ErrorReporter;

/// Event signature of application-level failure logs
pub const FAILURE_EVENT: &str = "Failure(uint256,uint256,uint256)";

/// Topic hash of [`FAILURE_EVENT`]
pub fn failure_topic() -> H256 {
    abi::keccak256(FAILURE_EVENT.as_bytes())
}

/// One decoded failure log
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Failure {
    /// Error name
    pub error: String,
    /// Info name
    pub info: String,
    /// Detail rendering
    pub detail: String,
}

impl Failure {
    /// Create a failure
    pub fn new(error: impl Into<String>, info: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            info: info.into(),
            detail: detail.into(),
        }
    }

    /// Resolve raw codes through `reporter`, falling back to `unknown ...=<n>` labels
    pub fn from_codes(error: U256, info: U256, detail: U256, reporter: &dyn ErrorReporter) -> Self {
        let error_name = as_u64(error)
            .and_then(|code| reporter.resolve_error(code))
            .unwrap_or_else(|| format!("unknown error={}", error));
        let info_name = as_u64(info)
            .and_then(|code| reporter.resolve_info(code))
            .unwrap_or_else(|| format!("unknown info={}", info));
        let detail_name = match (as_u64(error), as_u64(detail)) {
            (Some(error), Some(detail)) => reporter.resolve_detail(error, detail),
            _ => format!("unknown detail={}", detail),
        };
        Self::new(error_name, info_name, detail_name)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failure<error={},info={},detail={}>",
            self.error, self.info, self.detail
        )
    }
}

fn as_u64(value: U256) -> Option<u64> {
    (value <= U256::from(u64::MAX)).then(|| value.low_u64())
}

/// Decode every failure log in the receipt, in log order.
///
/// Logs with a malformed payload are skipped with a warning; decoding never fails.
pub fn decode_failures(receipt: &Receipt, reporter: &dyn ErrorReporter) -> Vec<Failure> {
    let topic = failure_topic();
    let types = [ParamType::Uint(256), ParamType::Uint(256), ParamType::Uint(256)];

    receipt
        .logs_with_topic(&topic)
        .filter_map(|log| match abi::decode(&types, &log.data) {
            Ok(tokens) => match tokens.as_slice() {
                [Token::Uint(error), Token::Uint(info), Token::Uint(detail)] => {
                    Some(Failure::from_codes(*error, *info, *detail, reporter))
                }
                _ => None,
            },
            Err(e) => {
                tracing::warn!("Skipping malformed failure log from {:?}: {}", log.address, e);
                None
            }
        })
        .collect()
}
