//! # scen-event
//!
//! The parsed tree for one scenario line.
//!
//! An external parser turns text such as `Erc20 Transfer Geoff (Exactly 1.0)`
//! into an [`Event`]: either an opaque atom or an ordered list of events. Everything
//! else in the engine (matching, binding, dispatch) reads this tree and never
//! mutates it.
//!
//! This crate also carries the two normalization rules the matcher relies on and
//! the small shape helpers used by argument extractors.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod event;
mod shape;

pub use error::EventError;
pub use event::Event;
pub use shape::{must_array, must_len, must_string};

/// Build an [`Event::List`] from nested literals.
///
/// Strings become atoms and bracketed groups become nested lists:
///
/// ```
/// use scen_event::{event, Event};
///
/// let e = event!["Erc20", "Transfer", ["Exactly", "1.0"]];
/// assert_eq!(
///     e,
///     Event::List(vec![
///         Event::atom("Erc20"),
///         Event::atom("Transfer"),
///         Event::List(vec![Event::atom("Exactly"), Event::atom("1.0")]),
///     ])
/// );
/// ```
#[macro_export]
macro_rules! event {
    (@item [$($inner:tt),* $(,)?]) => {
        $crate::Event::List(vec![$($crate::event!(@item $inner)),*])
    };
    (@item $atom:expr) => {
        $crate::Event::from($atom)
    };
    ($($item:tt),* $(,)?) => {
        $crate::Event::List(vec![$($crate::event!(@item $item)),*])
    };
}
