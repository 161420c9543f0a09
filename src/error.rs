//! Standard errors used by all functions in the crate.

use serde_json::Value;
use std::{fmt, path::PathBuf};

/// Error collecting all possible failures of a smoke test run.
///
/// Every variant means the same thing to the caller: the run did not complete
/// successfully. The variants only exist to make the failure easier to diagnose.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Reqwest error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    /// Error returned by the remote RPC endpoint.
    #[error("{0}")]
    RpcError(#[from] RpcError),
    /// Error building the request signature with the wallet key.
    #[error("Error signing request: {0}")]
    SigningError(#[from] truelayer_signing::Error),
    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
    /// Failed to read a file or directory.
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A program interface file could not be parsed.
    #[error("Invalid program interface {}: {source}", .path.display())]
    Idl {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The workspace has no program with the given name.
    #[error("Program {0} not found in workspace")]
    UnknownProgram(String),
    /// The program interface carries no address and none was configured.
    #[error("Program {0} has no address")]
    MissingAddress(String),
    /// The program interface does not declare the requested instruction.
    #[error("Program {program} has no instruction named {instruction}")]
    UnknownInstruction {
        program: String,
        instruction: String,
    },
    /// The arguments do not match the instruction declaration.
    #[error("Invalid arguments for instruction {instruction}: {reason}")]
    InvalidArguments { instruction: String, reason: String },
    /// The endpoint URL cannot be used to reach an RPC server.
    #[error("Invalid RPC endpoint: {0}")]
    InvalidEndpoint(String),
    /// The remote call succeeded but returned an empty signature.
    #[error("RPC endpoint returned an empty transaction signature")]
    EmptySignature,
    /// The smoke test was already executed once.
    #[error("Smoke test already ran")]
    AlreadyRun,
    /// Catch-all variant for unexpected errors.
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<reqwest_middleware::Error> for Error {
    fn from(e: reqwest_middleware::Error) -> Self {
        match e {
            reqwest_middleware::Error::Reqwest(e) => Error::HttpError(e),
            reqwest_middleware::Error::Middleware(e) => {
                e.downcast::<Error>().unwrap_or_else(Error::Other)
            }
        }
    }
}

impl From<Error> for reqwest_middleware::Error {
    fn from(e: Error) -> Self {
        reqwest_middleware::Error::Middleware(e.into())
    }
}

/// JSON-RPC error reported by the remote endpoint.
#[derive(thiserror::Error, Debug)]
pub struct RpcError {
    /// JSON-RPC error code.
    pub code: i64,
    /// Short description of the error.
    pub message: String,
    /// HTTP status returned by the server.
    pub status: u16,
    /// Identifier of the request that failed, if the server echoed it back.
    pub request_id: Option<String>,
    /// Additional error payload, typically program logs.
    pub data: Option<Value>,
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RPC error {} (HTTP {}): {}",
            self.code, self.status, self.message
        )?;

        if let Some(ref request_id) = self.request_id {
            write!(f, "\nRequest ID: {}", request_id)?;
        }

        if let Some(ref data) = self.data {
            write!(f, "\nAdditional data: {}", data)?;
        }

        Ok(())
    }
}
