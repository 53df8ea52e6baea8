//! Event tree type and normalization rules

use std::fmt;

/// One parsed scenario expression.
///
/// Produced once by the parser and immutable afterwards. Equality is
/// structural.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Opaque token
    Atom(String),
    /// Ordered sequence of sub-events
    List(Vec<Event>),
}

impl Event {
    /// Create an atom
    pub fn atom(token: impl Into<String>) -> Self {
        Event::Atom(token.into())
    }

    /// Create a list
    pub fn list(items: impl IntoIterator<Item = Event>) -> Self {
        Event::List(items.into_iter().collect())
    }

    /// Empty list
    pub fn empty() -> Self {
        Event::List(Vec::new())
    }

    /// Check if this is an atom
    pub fn is_atom(&self) -> bool {
        matches!(self, Event::Atom(_))
    }

    /// Check if this is a list
    pub fn is_list(&self) -> bool {
        matches!(self, Event::List(_))
    }

    /// Get the token of an atom
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Event::Atom(token) => Some(token),
            Event::List(_) => None,
        }
    }

    /// Get the children of a list
    pub fn as_list(&self) -> Option<&[Event]> {
        match self {
            Event::Atom(_) => None,
            Event::List(items) => Some(items),
        }
    }

    /// Strip one redundant wrapping layer.
    ///
    /// `((Exactly 1.0))` becomes `(Exactly 1.0)`. Only a singleton list whose
    /// element is itself a list is touched, and only one level is removed per
    /// call.
    pub fn unwrap_double(&self) -> &Event {
        match self {
            Event::List(items) if items.len() == 1 && items[0].is_list() => &items[0],
            other => other,
        }
    }

    /// View the event as an argument list.
    ///
    /// A bare atom behaves like a one-element list, so `True` reads the same as
    /// `(True)`.
    pub fn as_args(&self) -> &[Event] {
        match self {
            Event::List(items) => items,
            atom => std::slice::from_ref(atom),
        }
    }

    /// Owned version of [`Event::as_args`]
    pub fn into_args(self) -> Vec<Event> {
        match self {
            Event::List(items) => items,
            atom => vec![atom],
        }
    }
}

impl From<&str> for Event {
    fn from(token: &str) -> Self {
        Event::Atom(token.to_string())
    }
}

impl From<String> for Event {
    fn from(token: String) -> Self {
        Event::Atom(token)
    }
}

impl From<Vec<Event>> for Event {
    fn from(items: Vec<Event>) -> Self {
        Event::List(items)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Atom(token) => f.write_str(token),
            Event::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event;

    // ==================== Construction ====================

    #[test]
    fn test_macro_builds_nested_lists() {
        let e = event!["Foo", ["Bar", "Baz"]];
        assert_eq!(
            e,
            Event::List(vec![
                Event::atom("Foo"),
                Event::list([Event::atom("Bar"), Event::atom("Baz")]),
            ])
        );
        assert_eq!(event![], Event::empty());
    }

    #[test]
    fn test_accessors() {
        let atom = Event::atom("Foo");
        assert!(atom.is_atom());
        assert_eq!(atom.as_atom(), Some("Foo"));
        assert!(atom.as_list().is_none());

        let list = event!["Foo"];
        assert!(list.is_list());
        assert_eq!(list.as_list().map(|l| l.len()), Some(1));
        assert!(list.as_atom().is_none());
    }

    // ==================== Normalization ====================

    #[test]
    fn test_unwrap_double_removes_one_layer() {
        let e = event![["Exactly", "1.0"]];
        assert_eq!(e.unwrap_double(), &event!["Exactly", "1.0"]);
    }

    #[test]
    fn test_unwrap_double_is_single_step() {
        let e = event![[["Foo"]]];
        assert_eq!(e.unwrap_double(), &event![["Foo"]]);
    }

    #[test]
    fn test_unwrap_double_leaves_other_shapes() {
        let single_atom = event!["Foo"];
        assert_eq!(single_atom.unwrap_double(), &single_atom);

        let pair = event![["Foo"], ["Bar"]];
        assert_eq!(pair.unwrap_double(), &pair);

        let atom = Event::atom("Foo");
        assert_eq!(atom.unwrap_double(), &atom);
    }

    #[test]
    fn test_as_args_wraps_atom() {
        let atom = Event::atom("True");
        assert_eq!(atom.as_args(), &[Event::atom("True")]);
        assert_eq!(atom.clone().into_args(), vec![Event::atom("True")]);

        let list = event!["A", "B"];
        assert_eq!(list.as_args().len(), 2);
    }

    // ==================== Display ====================

    #[test]
    fn test_display() {
        assert_eq!(Event::atom("Foo").to_string(), "Foo");
        assert_eq!(event!["Foo", ["Bar", "1"]].to_string(), "(Foo (Bar 1))");
        assert_eq!(event![].to_string(), "()");
    }
}
