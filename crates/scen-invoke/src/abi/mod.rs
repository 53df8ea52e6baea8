//! Solidity ABI codec
//!
//! Enough of the ABI to read call data and event payloads back into named,
//! printable values:
//!
//! ```rust
//! use primitive_types::U256;
//! use scen_invoke::abi::{decode, encode, function_selector, ParamType, Token};
//!
//! let selector = function_selector("balanceOf(address)");
//! assert_eq!(selector, [0x70, 0xa0, 0x82, 0x31]);
//!
//! let types = [ParamType::Uint(256)];
//! let data = encode(&types, &[Token::Uint(U256::from(7))]).unwrap();
//! assert_eq!(decode(&types, &data).unwrap(), vec![Token::Uint(U256::from(7))]);
//! ```

mod decode;
mod encode;
mod types;

use primitive_types::H256;
use sha3::{Digest, Keccak256};

pub use decode::decode;
pub use encode::{encode, encode_function_call};
pub use types::{ParamType, Token, I256};

/// Keccak-256 of `data`
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256::from_slice(&hasher.finalize())
}

/// First four bytes of the signature hash
pub fn function_selector(signature: &str) -> [u8; 4] {
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&keccak256(signature.as_bytes()).as_bytes()[..4]);
    selector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(&[])),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_event_topic() {
        // Transfer(address,address,uint256)
        assert_eq!(
            hex::encode(keccak256(b"Transfer(address,address,uint256)")),
            "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }
}
