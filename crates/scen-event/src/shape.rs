//! Shape helpers for argument extractors

use crate::{Event, EventError};

/// Elements of a list, or the event itself wrapped in a one-element vector
pub fn must_array(event: &Event) -> Vec<Event> {
    event.as_args().to_vec()
}

/// Require a list with `len` elements, or between `len` and `max_len` when
/// `max_len` is given.
pub fn must_len(event: &Event, len: usize, max_len: Option<usize>) -> Result<&[Event], EventError> {
    let items = event
        .as_list()
        .ok_or_else(|| EventError::ExpectedList(event.to_string()))?;

    let ok = match max_len {
        None => items.len() == len,
        Some(max) => items.len() >= len && items.len() <= max,
    };

    if ok {
        Ok(items)
    } else {
        Err(EventError::Length {
            expected: match max_len {
                None => len.to_string(),
                Some(max) => format!("{}-{}", len, max),
            },
            actual: items.len(),
            event: event.to_string(),
        })
    }
}

/// Require a bare token
pub fn must_string(event: &Event) -> Result<&str, EventError> {
    event
        .as_atom()
        .ok_or_else(|| EventError::ExpectedAtom(event.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event;

    #[test]
    fn test_must_array() {
        assert_eq!(must_array(&Event::atom("A")), vec![Event::atom("A")]);
        assert_eq!(
            must_array(&event!["A", "B"]),
            vec![Event::atom("A"), Event::atom("B")]
        );
        assert!(must_array(&event![]).is_empty());
    }

    #[test]
    fn test_must_len_exact() {
        let e = event!["A", "B"];
        assert_eq!(must_len(&e, 2, None).unwrap().len(), 2);

        let err = must_len(&e, 3, None).unwrap_err();
        assert_eq!(
            err,
            EventError::Length {
                expected: "3".to_string(),
                actual: 2,
                event: "(A B)".to_string(),
            }
        );
    }

    #[test]
    fn test_must_len_range() {
        let e = event!["A", "B"];
        assert!(must_len(&e, 1, Some(3)).is_ok());
        assert!(must_len(&e, 3, Some(4)).is_err());
    }

    #[test]
    fn test_must_len_rejects_atom() {
        let err = must_len(&Event::atom("A"), 1, None).unwrap_err();
        assert_eq!(err, EventError::ExpectedList("A".to_string()));
    }

    #[test]
    fn test_must_string() {
        assert_eq!(must_string(&Event::atom("A")).unwrap(), "A");
        assert!(must_string(&event!["A"]).is_err());
    }
}
