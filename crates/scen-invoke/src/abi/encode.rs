//! ABI encoding

use primitive_types::U256;

use super::types::{ParamType, Token};
use crate::AbiError;

/// Encode values against their declared types as one ABI tuple
pub fn encode(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    if types.len() != tokens.len() {
        return Err(AbiError::Encode(format!(
            "expected {} values, got {}",
            types.len(),
            tokens.len()
        )));
    }

    let head_len: usize = types.iter().map(|t| t.head_len()).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for (ty, token) in types.iter().zip(tokens) {
        let encoded = encode_token(ty, token)?;
        if ty.is_dynamic() {
            head.extend_from_slice(&uint_word(U256::from(head_len + tail.len())));
            tail.extend(encoded);
        } else {
            head.extend(encoded);
        }
    }

    head.extend(tail);
    Ok(head)
}

/// Selector followed by the encoded arguments
pub fn encode_function_call(
    selector: [u8; 4],
    types: &[ParamType],
    tokens: &[Token],
) -> Result<Vec<u8>, AbiError> {
    let mut data = selector.to_vec();
    data.extend(encode(types, tokens)?);
    Ok(data)
}

fn encode_token(ty: &ParamType, token: &Token) -> Result<Vec<u8>, AbiError> {
    let encoded = match (ty, token) {
        (ParamType::Address, Token::Address(addr)) => {
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(addr.as_bytes());
            word.to_vec()
        }
        (ParamType::Uint(_), Token::Uint(value)) => uint_word(*value).to_vec(),
        (ParamType::Int(_), Token::Int(value)) => value.to_word().to_vec(),
        (ParamType::Bool, Token::Bool(b)) => uint_word(U256::from(*b as u8)).to_vec(),
        (ParamType::FixedBytes(size), Token::FixedBytes(bytes)) if bytes.len() <= *size => {
            let mut word = [0u8; 32];
            word[..bytes.len()].copy_from_slice(bytes);
            word.to_vec()
        }
        (ParamType::Bytes, Token::Bytes(bytes)) => padded_bytes(bytes),
        (ParamType::String, Token::String(s)) => padded_bytes(s.as_bytes()),
        (ParamType::Array(inner), Token::Array(items)) => {
            let mut out = uint_word(U256::from(items.len())).to_vec();
            out.extend(encode(&vec![(**inner).clone(); items.len()], items)?);
            out
        }
        (ParamType::FixedArray(inner, size), Token::FixedArray(items)) => {
            encode(&vec![(**inner).clone(); *size], items)?
        }
        (ParamType::Tuple(types), Token::Tuple(items)) => encode(types, items)?,
        _ => {
            return Err(AbiError::Encode(format!(
                "value {} does not fit type {}",
                token, ty
            )))
        }
    };
    Ok(encoded)
}

fn uint_word(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

fn padded_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = uint_word(U256::from(bytes.len())).to_vec();
    out.extend_from_slice(bytes);
    out.resize(32 + bytes.len().div_ceil(32) * 32, 0);
    out
}
