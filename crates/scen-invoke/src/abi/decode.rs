//! ABI decoding

use primitive_types::{H160, U256};

use super::types::{ParamType, Token, I256};
use crate::AbiError;

/// Decode a sequence of values laid out as one ABI tuple
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    decode_tuple(types, data, 0)
}

/// Decode the tuple whose head starts at `base`; offsets are relative to `base`
fn decode_tuple(types: &[ParamType], data: &[u8], base: usize) -> Result<Vec<Token>, AbiError> {
    let mut head = base;
    let mut tokens = Vec::with_capacity(types.len());

    for ty in types {
        let token = if ty.is_dynamic() {
            let offset = read_usize(data, head)?;
            decode_at(ty, data, checked_add(base, offset)?)?
        } else {
            decode_at(ty, data, head)?
        };
        tokens.push(token);
        head += ty.head_len();
    }

    Ok(tokens)
}

/// Decode one value whose encoding starts at `at`
fn decode_at(ty: &ParamType, data: &[u8], at: usize) -> Result<Token, AbiError> {
    match ty {
        ParamType::Address => {
            let word = word(data, at)?;
            Ok(Token::Address(H160::from_slice(&word[12..])))
        }
        ParamType::Uint(_) => Ok(Token::Uint(U256::from_big_endian(word(data, at)?))),
        ParamType::Int(_) => Ok(Token::Int(I256::from_word(word(data, at)?))),
        ParamType::Bool => Ok(Token::Bool(word(data, at)?[31] != 0)),
        ParamType::FixedBytes(size) => word(data, at)?
            .get(..*size)
            .map(|bytes| Token::FixedBytes(bytes.to_vec()))
            .ok_or_else(|| AbiError::Decode(format!("bytes{} is wider than a word", size))),
        ParamType::Bytes => Ok(Token::Bytes(read_bytes(data, at)?.to_vec())),
        ParamType::String => {
            let bytes = read_bytes(data, at)?;
            String::from_utf8(bytes.to_vec())
                .map(Token::String)
                .map_err(|e| AbiError::Decode(format!("invalid utf-8: {}", e)))
        }
        ParamType::Array(inner) => {
            let len = read_usize(data, at)?;
            let types = vec![(**inner).clone(); len];
            decode_tuple(&types, data, checked_add(at, 32)?).map(Token::Array)
        }
        ParamType::FixedArray(inner, size) => {
            let types = vec![(**inner).clone(); *size];
            decode_tuple(&types, data, at).map(Token::FixedArray)
        }
        ParamType::Tuple(types) => decode_tuple(types, data, at).map(Token::Tuple),
    }
}

fn word(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    slice(data, at, 32)
}

fn slice(data: &[u8], at: usize, len: usize) -> Result<&[u8], AbiError> {
    let end = checked_add(at, len)?;
    data.get(at..end).ok_or_else(|| {
        AbiError::Decode(format!(
            "insufficient data: need {} bytes, have {}",
            end,
            data.len()
        ))
    })
}

fn read_usize(data: &[u8], at: usize) -> Result<usize, AbiError> {
    let value = U256::from_big_endian(word(data, at)?);
    if value > U256::from(data.len()) {
        return Err(AbiError::Decode(format!("offset or length {} out of range", value)));
    }
    Ok(value.low_u64() as usize)
}

fn read_bytes(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    let len = read_usize(data, at)?;
    slice(data, checked_add(at, 32)?, len)
}

fn checked_add(a: usize, b: usize) -> Result<usize, AbiError> {
    a.checked_add(b)
        .ok_or_else(|| AbiError::Decode("offset overflow".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::encode;

    #[test]
    fn test_decode_words() {
        let mut data = [0u8; 96];
        data[12..32].copy_from_slice(&[0x11; 20]);
        data[63] = 100;
        data[95] = 1;

        let tokens = decode(
            &[ParamType::Address, ParamType::Uint(256), ParamType::Bool],
            &data,
        )
        .unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Address(H160::repeat_byte(0x11)),
                Token::Uint(U256::from(100)),
                Token::Bool(true),
            ]
        );
    }

    #[test]
    fn test_decode_string() {
        let mut data = vec![0u8; 96];
        data[31] = 32;
        data[63] = 5;
        data[64..69].copy_from_slice(b"hello");

        let tokens = decode(&[ParamType::String], &data).unwrap();
        assert_eq!(tokens, vec![Token::String("hello".to_string())]);
    }

    #[test]
    fn test_decode_negative_int() {
        let tokens = decode(&[ParamType::Int(256)], &[0xff; 32]).unwrap();
        assert_eq!(tokens, vec![Token::Int(I256::from(-1))]);
    }

    #[test]
    fn test_decode_nested_dynamic() {
        let tokens = vec![
            Token::Uint(U256::from(7)),
            Token::Array(vec![
                Token::String("a".to_string()),
                Token::String("bc".to_string()),
            ]),
            Token::Bytes(vec![1, 2, 3]),
        ];
        let types = vec![
            ParamType::Uint(256),
            ParamType::Array(Box::new(ParamType::String)),
            ParamType::Bytes,
        ];
        let data = encode(&types, &tokens).unwrap();
        assert_eq!(decode(&types, &data).unwrap(), tokens);
    }

    #[test]
    fn test_decode_insufficient_data() {
        let err = decode(&[ParamType::Uint(256)], &[0u8; 16]).unwrap_err();
        assert_eq!(
            err,
            AbiError::Decode("insufficient data: need 32 bytes, have 16".to_string())
        );
    }

    #[test]
    fn test_decode_huge_offset() {
        let data = [0xffu8; 32];
        assert!(decode(&[ParamType::Bytes], &data).is_err());
    }
}
