//! # scen-invoke
//!
//! Contract invocation results for scenario commands.
//!
//! ## Features
//!
//! - **Invocation**: one call, send, deploy or transfer folded into a single result
//! - **Failure**: on-chain `Failure(uint256,uint256,uint256)` logs decoded to names
//! - **ErrorReporter**: pluggable code-to-name tables
//! - **Driver**: preflight, send, dry run and gas accounting over a [`ContractCaller`]
//! - **ABI**: enough of the Solidity ABI to decode call data and log payloads
//!
//! ## Quick Start
//!
//! ```rust
//! use primitive_types::{H160, U256};
//! use scen_invoke::abi::{ParamType, Token};
//! use scen_invoke::{
//!     Driver, FunctionFragment, Interface, InvocationOpts, MockCaller, NoErrorReporter, Param,
//!     TxRequest,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), scen_invoke::AbiError> {
//! let erc20 = Interface::new("Erc20").with_function(FunctionFragment::new(
//!     "transfer",
//!     vec![
//!         Param::new("dst", ParamType::Address),
//!         Param::new("amount", ParamType::Uint(256)),
//!     ],
//!     vec![],
//! ));
//! let data = erc20.encode_function_data(
//!     "transfer",
//!     &[Token::Address(H160::repeat_byte(2)), Token::Uint(U256::from(10))],
//! )?;
//!
//! let caller = MockCaller::new();
//! let driver = Driver::new(&caller, InvocationOpts::default());
//! let tx = TxRequest::call(H160::repeat_byte(1), H160::repeat_byte(9), data);
//! let invocation = driver.invoke(tx, &erc20, "transfer", &NoErrorReporter).await;
//!
//! assert!(invocation.succeeded());
//! assert_eq!(invocation.args.len(), 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
mod caller;
mod config;
mod driver;
mod error;
mod failure;
mod interface;
mod invocation;
mod receipt;
mod reporter;

pub use caller::{ContractCaller, MockCaller, TxRequest};
pub use config::InvocationOpts;
pub use driver::{decode_call, ContractArtifact, Driver, GasCounter};
pub use error::{parse_revert, AbiError, CallerError, ConfigError, InvocationError};
pub use failure::{decode_failures, failure_topic, Failure, FAILURE_EVENT};
pub use interface::{FunctionFragment, Interface, Param};
pub use invocation::{DecodedArg, Invocation};
pub use receipt::{Log, Receipt};
pub use reporter::{ErrorReporter, NoErrorReporter, TableErrorReporter};
