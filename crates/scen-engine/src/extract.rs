//! Building blocks for argument extractors
//!
//! Extractors receive `Option<&Event>`: `None` for implicit arguments. These
//! helpers cover the common token conversions so extractor closures stay short.

use primitive_types::U256;
use scen_event::{must_string, Event};

use crate::world::{Address, World};
use crate::EngineError;

/// Require that the extractor was handed a tree slot
pub fn required(event: Option<&Event>) -> Result<&Event, EngineError> {
    event.ok_or_else(|| EngineError::extraction("expected an argument, got none"))
}

/// Bare token
pub fn atom(event: Option<&Event>) -> Result<String, EngineError> {
    Ok(must_string(required(event)?)?.to_string())
}

/// Unsigned integer, decimal or `0x`-prefixed hex
pub fn uint(event: Option<&Event>) -> Result<U256, EngineError> {
    let token = must_string(required(event)?)?;
    let parsed = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        Some(hex) => U256::from_str_radix(hex, 16).ok(),
        None => U256::from_dec_str(token).ok(),
    };
    parsed.ok_or_else(|| EngineError::extraction(format!("expected number, got {}", token)))
}

/// `True` / `False`, case-insensitive
pub fn boolean(event: Option<&Event>) -> Result<bool, EngineError> {
    let token = must_string(required(event)?)?;
    match token.to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(EngineError::extraction(format!(
            "expected boolean, got {}",
            token
        ))),
    }
}

/// Address literal or world alias
pub fn address<W: World>(world: &W, event: Option<&Event>) -> Result<Address, EngineError> {
    let token = must_string(required(event)?)?;
    if let Some(address) = parse_address(token) {
        return Ok(address);
    }
    world
        .resolve_alias(token)
        .ok_or_else(|| EngineError::extraction(format!("unknown address or alias {}", token)))
}

fn parse_address(token: &str) -> Option<Address> {
    let digits = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X"))?;
    let bytes = hex::decode(digits).ok()?;
    (bytes.len() == 20).then(|| Address::from_slice(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scen_event::event;

    struct Aliases;

    impl World for Aliases {
        fn resolve_alias(&self, alias: &str) -> Option<Address> {
            (alias == "Geoff").then(|| Address::repeat_byte(0x11))
        }
    }

    #[test]
    fn test_required() {
        assert!(required(None).is_err());
        let e = Event::atom("A");
        assert_eq!(required(Some(&e)).unwrap(), &e);
    }

    #[test]
    fn test_uint_decimal_and_hex() {
        assert_eq!(uint(Some(&Event::atom("100"))).unwrap(), U256::from(100));
        assert_eq!(uint(Some(&Event::atom("0xff"))).unwrap(), U256::from(255));
        assert!(uint(Some(&Event::atom("abc"))).is_err());
        assert!(uint(Some(&event!["1"])).is_err());
    }

    #[test]
    fn test_boolean() {
        assert!(boolean(Some(&Event::atom("True"))).unwrap());
        assert!(!boolean(Some(&Event::atom("false"))).unwrap());
        assert!(boolean(Some(&Event::atom("maybe"))).is_err());
    }

    #[test]
    fn test_address_literal_and_alias() {
        let literal = Event::atom("0x1111111111111111111111111111111111111111");
        assert_eq!(
            address(&Aliases, Some(&literal)).unwrap(),
            Address::repeat_byte(0x11)
        );
        assert_eq!(
            address(&Aliases, Some(&Event::atom("Geoff"))).unwrap(),
            Address::repeat_byte(0x11)
        );
        assert!(address(&Aliases, Some(&Event::atom("Torrey"))).is_err());
    }

    #[test]
    fn test_address_short_hex_falls_back_to_alias() {
        assert!(address(&Aliases, Some(&Event::atom("0x11"))).is_err());
    }

    #[test]
    fn test_address_upper_prefix_and_mixed_case() {
        let upper = Event::atom("0XABCDEFabcdef0000000000000000000000000001");
        let parsed = address(&Aliases, Some(&upper)).unwrap();
        assert_eq!(&parsed.as_bytes()[..6], &[0xab, 0xcd, 0xef, 0xab, 0xcd, 0xef]);
        assert_eq!(parsed.as_bytes()[19], 0x01);
    }

    #[test]
    fn test_address_bad_hex_is_not_a_literal() {
        let bad = Event::atom("0xzz11111111111111111111111111111111111111");
        assert!(address(&Aliases, Some(&bad)).is_err());
        let long = Event::atom(format!("0x{}", "11".repeat(21)));
        assert!(address(&Aliases, Some(&long)).is_err());
    }
}
