//! Invocation error types

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// ABI encoding and decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// Payload could not be decoded
    #[error("abi decode error: {0}")]
    Decode(String),

    /// Values could not be encoded
    #[error("abi encode error: {0}")]
    Encode(String),

    /// Type string not understood
    #[error("unknown abi type: {0}")]
    UnknownType(String),

    /// Interface has no such function
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Call data does not start with the fragment's selector
    #[error("selector mismatch for {function}: expected 0x{expected}, got 0x{actual}")]
    SelectorMismatch {
        /// Function name
        function: String,
        /// Selector of the fragment, hex
        expected: String,
        /// Selector found in the data, hex
        actual: String,
    },

    /// Interface JSON could not be read
    #[error("invalid abi json: {0}")]
    Json(String),
}

/// Failure raised by a [`ContractCaller`](crate::ContractCaller)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallerError {
    /// Node rejected or reverted the request; the message may carry a code
    #[error("{0}")]
    Rejected(String),

    /// Connection-level failure
    #[error("transport error: {0}")]
    Transport(String),
}

impl CallerError {
    /// Message used for revert classification
    pub fn message(&self) -> &str {
        match self {
            CallerError::Rejected(msg) => msg,
            CallerError::Transport(msg) => msg,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// File content is not valid TOML for the options
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Why an invocation did not succeed at the transport level.
///
/// Carried as data on [`Invocation`](crate::Invocation); never returned as `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    /// Caller failed and the message carries no recognizable code
    Transport {
        /// Underlying failure
        cause: CallerError,
    },

    /// Caller failed with a message of the form `<text> (<code>)`
    Revert {
        /// Underlying failure
        cause: CallerError,
        /// Text before the code
        message: String,
        /// Numeric on-chain error code
        code: u64,
        /// Code resolved through the error reporter
        error: Option<String>,
    },

    /// Request could not be built; nothing was sent
    Encode(AbiError),
}

impl InvocationError {
    /// Classify a caller failure, resolving revert codes with `resolve`
    pub fn classify(cause: CallerError, resolve: impl FnOnce(u64) -> Option<String>) -> Self {
        match parse_revert(cause.message()) {
            Some((message, code)) => {
                let message = message.to_string();
                InvocationError::Revert {
                    error: resolve(code),
                    cause,
                    message,
                    code,
                }
            }
            None => InvocationError::Transport { cause },
        }
    }

    /// Underlying caller failure, if the caller was reached
    pub fn cause(&self) -> Option<&CallerError> {
        match self {
            InvocationError::Transport { cause } => Some(cause),
            InvocationError::Revert { cause, .. } => Some(cause),
            InvocationError::Encode(_) => None,
        }
    }

    /// Revert code, if one was recognized
    pub fn code(&self) -> Option<u64> {
        match self {
            InvocationError::Revert { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationError::Transport { cause } => write!(f, "InvocationError<err={}>", cause),
            InvocationError::Revert {
                message,
                code,
                error,
                ..
            } => write!(
                f,
                "InvocationRevertError<errMessage={},errCode={},error={}>",
                message,
                code,
                error.as_deref().unwrap_or("null")
            ),
            InvocationError::Encode(e) => write!(f, "InvocationError<err={}>", e),
        }
    }
}

impl std::error::Error for InvocationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvocationError::Encode(e) => Some(e),
            _ => self.cause().map(|c| c as &(dyn std::error::Error + 'static)),
        }
    }
}

static REVERT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*) \(([0-9]+)\)$").expect("revert pattern must compile"));

/// Split `"<text> (<digits>)"` into text and code.
///
/// The code is the trailing parenthesised decimal group; the text is everything
/// before the separating space and may be empty. Messages spanning several
/// lines never match.
pub fn parse_revert(message: &str) -> Option<(&str, u64)> {
    let captures = REVERT_PATTERN.captures(message)?;
    let text = captures.get(1)?.as_str();
    let code = captures.get(2)?.as_str().parse().ok()?;
    Some((text, code))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Revert parsing ====================

    #[test]
    fn test_parse_revert() {
        assert_eq!(
            parse_revert("execution reverted: insufficient balance (13)"),
            Some(("execution reverted: insufficient balance", 13))
        );
        assert_eq!(parse_revert("oops (0)"), Some(("oops", 0)));
    }

    #[test]
    fn test_parse_revert_uses_last_group() {
        assert_eq!(parse_revert("a (1) b (2)"), Some(("a (1) b", 2)));
    }

    #[test]
    fn test_parse_revert_rejects() {
        assert_eq!(parse_revert("execution reverted"), None);
        assert_eq!(parse_revert("code (x13)"), None);
        assert_eq!(parse_revert("code ()"), None);
        assert_eq!(parse_revert("(13)"), None);
        assert_eq!(parse_revert("code (13) trailing"), None);
        assert_eq!(parse_revert("code(13)"), None);
    }

    #[test]
    fn test_parse_revert_empty_text() {
        assert_eq!(parse_revert(" (13)"), Some(("", 13)));
    }

    #[test]
    fn test_parse_revert_single_line_only() {
        assert_eq!(parse_revert("line one\nreverted (13)"), None);
        assert_eq!(parse_revert("reverted (13)\n"), None);
    }

    #[test]
    fn test_parse_revert_code_too_wide() {
        assert_eq!(parse_revert("huge (99999999999999999999999)"), None);
    }

    // ==================== Classification ====================

    #[test]
    fn test_classify_revert() {
        let cause = CallerError::Rejected("execution reverted: insufficient balance (13)".into());
        let err = InvocationError::classify(cause.clone(), |code| {
            (code == 13).then(|| "TOKEN_INSUFFICIENT_BALANCE".to_string())
        });
        assert_eq!(
            err,
            InvocationError::Revert {
                cause,
                message: "execution reverted: insufficient balance".to_string(),
                code: 13,
                error: Some("TOKEN_INSUFFICIENT_BALANCE".to_string()),
            }
        );
        assert_eq!(err.code(), Some(13));
    }

    #[test]
    fn test_classify_transport() {
        let cause = CallerError::Transport("connection refused".into());
        let err = InvocationError::classify(cause.clone(), |_| None);
        assert_eq!(err, InvocationError::Transport { cause });
        assert_eq!(err.code(), None);
        assert_eq!(
            err.to_string(),
            "InvocationError<err=transport error: connection refused>"
        );
    }

    #[test]
    fn test_revert_display() {
        let err = InvocationError::classify(CallerError::Rejected("nope (2)".into()), |_| None);
        assert_eq!(
            err.to_string(),
            "InvocationRevertError<errMessage=nope,errCode=2,error=null>"
        );
    }
}
