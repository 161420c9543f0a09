use crate::{common::DEFAULT_INSTRUCTION, Error};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single instruction call: the instruction name and its arguments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Builder)]
#[builder(derive(Debug))]
pub struct Invocation {
    #[builder(setter(into))]
    pub instruction: String,
    /// JSON object holding one entry per declared argument.
    #[builder(default = "serde_json::Value::Object(Default::default())")]
    pub args: Value,
}

impl Invocation {
    pub fn new(instruction: impl Into<String>, args: Value) -> Self {
        Self {
            instruction: instruction.into(),
            args,
        }
    }

    /// `initialize` with no arguments.
    pub fn initialize() -> Self {
        Self::new(DEFAULT_INSTRUCTION, Value::Object(Default::default()))
    }
}

/// Signature of the transaction executed by a successful call.
///
/// Always non-empty.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionSignature(String);

impl TransactionSignature {
    pub fn new(signature: impl Into<String>) -> Result<Self, Error> {
        let signature = signature.into();
        if signature.trim().is_empty() {
            return Err(Error::EmptySignature);
        }

        Ok(Self(signature))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TransactionSignature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct RpcRequest<'a> {
    pub(crate) jsonrpc: &'static str,
    pub(crate) id: &'a str,
    pub(crate) method: &'static str,
    pub(crate) params: SendInstructionParams<'a>,
}

#[derive(Serialize, Debug)]
pub(crate) struct SendInstructionParams<'a> {
    pub(crate) program: &'a str,
    pub(crate) instruction: &'a str,
    pub(crate) args: &'a Value,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RpcResponse {
    pub(crate) result: Option<String>,
    pub(crate) error: Option<crate::middlewares::error_handling::ErrorObject>,
}
