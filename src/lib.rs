//! Smoke-test runner for deployed programs.
//!
//! The harness builds a connection context from an explicit configuration, resolves a
//! handle to a program from its interface description, invokes one instruction
//! (`initialize` by default) with empty arguments, and reports the transaction signature
//! returned by the backend. One attempt, no retries: any failure fails the run.
//!
//! # Usage
//!
//! ## Prerequisites
//!
//! Generate a signing key pair used to sign RPC requests:
//!
//! ```sh
//! openssl ecparam -genkey -name secp521r1 -noout -out wallet.pem
//! ```
//!
//! Build the program so that its interface file lands in `target/idl`.
//!
//! ## Run from configuration
//!
//! ```rust,no_run
//! # use program_smoke::{SmokeConfig, SmokeTest, Error};
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! // Reads an optional file plus `SMOKE_*` (and `ANCHOR_PROVIDER_URL`) variables
//! let config = SmokeConfig::load(None)?;
//!
//! let report = SmokeTest::from_config(&config)?.run().await?;
//! tracing::info!("Took {}", report.finished_at - report.started_at);
//! # Ok(())
//! # }
//! ```
//!
//! ## Build everything by hand
//!
//! ```rust,no_run
//! # use program_smoke::{Provider, Wallet, Workspace, Error};
//! # use std::path::Path;
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let provider = Provider::builder("http://127.0.0.1:8899".parse().unwrap())
//!     .with_wallet(Wallet::from_pem_file("my-kid", Path::new("wallet.pem"))?)
//!     .build()?;
//!
//! let program = Workspace::load(Path::new("target/idl"))?
//!     .program(&provider, "OrbitPhysicalMarket")?;
//!
//! let tx = program.initialize().await?;
//! println!("Your transaction signature {}", tx);
//! # Ok(())
//! # }
//! ```

#![deny(missing_debug_implementations)]
#![forbid(unsafe_code)]

mod common;
pub mod config;
pub mod error;
pub mod idl;
mod middlewares;
pub mod program;
pub mod provider;
pub mod runner;
pub mod workspace;

pub use config::SmokeConfig;
pub use error::Error;
pub use program::{Invocation, Program, TransactionSignature};
pub use provider::{Provider, Wallet};
pub use runner::{RunReport, RunState, SmokeTest};
pub use workspace::Workspace;
