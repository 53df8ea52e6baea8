//! ABI values and parameter types

use std::fmt;
use std::str::FromStr;

use primitive_types::{H160, U256};

use crate::AbiError;

/// Decoded ABI value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// 20-byte address
    Address(H160),
    /// Unsigned integer of any width
    Uint(U256),
    /// Signed integer of any width
    Int(I256),
    /// Boolean
    Bool(bool),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// `bytesN`
    FixedBytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// `T[]`
    Array(Vec<Token>),
    /// `T[N]`
    FixedArray(Vec<Token>),
    /// Tuple
    Tuple(Vec<Token>),
}

/// Signed 256-bit integer as sign and magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct I256 {
    /// Magnitude
    pub abs: U256,
    /// Sign
    pub negative: bool,
}

impl I256 {
    /// Create from sign and magnitude
    pub fn new(abs: U256, negative: bool) -> Self {
        Self {
            abs,
            negative: negative && !abs.is_zero(),
        }
    }

    /// Interpret a 32-byte two's complement word
    pub fn from_word(word: &[u8]) -> Self {
        if word.first().map_or(false, |b| b & 0x80 != 0) {
            let magnitude = !U256::from_big_endian(word);
            Self::new(magnitude.overflowing_add(U256::one()).0, true)
        } else {
            Self::new(U256::from_big_endian(word), false)
        }
    }

    /// Two's complement 32-byte word
    pub fn to_word(&self) -> [u8; 32] {
        let value = if self.negative {
            (!self.abs).overflowing_add(U256::one()).0
        } else {
            self.abs
        };
        let mut word = [0u8; 32];
        value.to_big_endian(&mut word);
        word
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

/// Rendering used in invocation logs: numbers in decimal, addresses and bytes
/// as `0x` hex, lists comma-separated.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Address(a) => write!(f, "0x{}", hex::encode(a.as_bytes())),
            Token::Uint(v) => write!(f, "{}", v),
            Token::Int(v) => write!(f, "{}", v),
            Token::Bool(b) => write!(f, "{}", b),
            Token::Bytes(b) | Token::FixedBytes(b) => write!(f, "0x{}", hex::encode(b)),
            Token::String(s) => f.write_str(s),
            Token::Array(items) | Token::FixedArray(items) | Token::Tuple(items) => {
                let parts: Vec<String> = items.iter().map(|t| t.to_string()).collect();
                f.write_str(&parts.join(","))
            }
        }
    }
}

/// Solidity parameter type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// `address`
    Address,
    /// `uintN`
    Uint(usize),
    /// `intN`
    Int(usize),
    /// `bool`
    Bool,
    /// `bytes`
    Bytes,
    /// `bytesN`
    FixedBytes(usize),
    /// `string`
    String,
    /// `T[]`
    Array(Box<ParamType>),
    /// `T[N]`
    FixedArray(Box<ParamType>, usize),
    /// `(T1,T2,...)`
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Whether the encoding lives in the tail
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            ParamType::Tuple(types) => types.iter().any(|t| t.is_dynamic()),
            _ => false,
        }
    }

    /// Bytes occupied in the head
    pub fn head_len(&self) -> usize {
        match self {
            ParamType::FixedArray(inner, size) if !self.is_dynamic() => inner.head_len() * size,
            ParamType::Tuple(types) if !self.is_dynamic() => types.iter().map(|t| t.head_len()).sum(),
            _ => 32,
        }
    }
}

/// Canonical type string, as used in signatures
impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => f.write_str("address"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::Bool => f.write_str("bool"),
            ParamType::Bytes => f.write_str("bytes"),
            ParamType::FixedBytes(size) => write!(f, "bytes{}", size),
            ParamType::String => f.write_str("string"),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
            ParamType::FixedArray(inner, size) => write!(f, "{}[{}]", inner, size),
            ParamType::Tuple(types) => {
                let parts: Vec<String> = types.iter().map(|t| t.to_string()).collect();
                write!(f, "({})", parts.join(","))
            }
        }
    }
}

impl FromStr for ParamType {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let unknown = || AbiError::UnknownType(s.to_string());

        if let Some(head) = s.strip_suffix(']') {
            let open = head.rfind('[').ok_or_else(unknown)?;
            let inner: ParamType = head[..open].parse()?;
            let size = &head[open + 1..];
            return if size.is_empty() {
                Ok(ParamType::Array(Box::new(inner)))
            } else {
                let size = size.parse().map_err(|_| unknown())?;
                Ok(ParamType::FixedArray(Box::new(inner), size))
            };
        }

        if let Some(body) = s.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
            return split_tuple(body)
                .into_iter()
                .map(str::parse)
                .collect::<Result<Vec<_>, _>>()
                .map(ParamType::Tuple);
        }

        let sized = |rest: &str, default: usize| -> Result<usize, AbiError> {
            if rest.is_empty() {
                Ok(default)
            } else {
                rest.parse().map_err(|_| unknown())
            }
        };

        match s {
            "address" => Ok(ParamType::Address),
            "bool" => Ok(ParamType::Bool),
            "string" => Ok(ParamType::String),
            "bytes" => Ok(ParamType::Bytes),
            _ => {
                if let Some(rest) = s.strip_prefix("uint") {
                    Ok(ParamType::Uint(sized(rest, 256)?))
                } else if let Some(rest) = s.strip_prefix("int") {
                    Ok(ParamType::Int(sized(rest, 256)?))
                } else if let Some(rest) = s.strip_prefix("bytes") {
                    match sized(rest, 0)? {
                        size @ 1..=32 => Ok(ParamType::FixedBytes(size)),
                        _ => Err(unknown()),
                    }
                } else {
                    Err(unknown())
                }
            }
        }
    }
}

/// Split tuple members at top-level commas
fn split_tuple(body: &str) -> Vec<&str> {
    if body.trim().is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}
