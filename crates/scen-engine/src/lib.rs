//! # scen-engine
//!
//! Matching, argument binding and dispatch for scenario events.
//!
//! ## Overview
//!
//! - **Expression**: a named pattern plus an ordered argument schema
//! - **Arg**: one slot in the schema, with its extractor and binding flags
//! - **Command**: an expression whose processor returns the next world
//! - **Fetcher**: an expression whose function returns a value
//! - **CommandLoop**: evaluates scenario lines one after another
//!
//! ## Example
//!
//! ```rust
//! use futures::FutureExt;
//! use scen_engine::{extract, process_command_event, Arg, BoundArgs, Command, Process};
//! use scen_event::event;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), scen_engine::EngineError> {
//! let print: Command<Vec<String>, String> = Command::view(
//!     "#### Print\n* \"Print message\" - Records a message",
//!     "Print",
//!     vec![Arg::sync("message", |_, e| extract::atom(e))],
//!     |mut world: Vec<String>, mut args: BoundArgs<String>| {
//!         async move {
//!             world.push(args.value("message")?);
//!             Ok(world)
//!         }
//!         .boxed()
//!     },
//! )?;
//!
//! let commands: Vec<Box<dyn Process<Vec<String>>>> = vec![Box::new(print)];
//! let world = process_command_event("Core", &commands, vec![], &event!["Print", "hello"], None).await?;
//! assert_eq!(world, vec!["hello".to_string()]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod arg;
mod command;
mod error;
mod expression;
pub mod extract;
mod runner;
mod world;

pub use arg::{Arg, Bound, BoundArgs, Extractor, FromArgs};
pub use command::{get_fetcher_value, process_command_event, Command, Fetch, Fetcher, Process};
pub use error::EngineError;
pub use expression::{clean_doc, Describe, Expression};
pub use runner::{CommandLoop, LineReport, Parser};
pub use world::{Address, World};
