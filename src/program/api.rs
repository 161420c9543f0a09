use super::model::{Invocation, RpcRequest, RpcResponse, SendInstructionParams, TransactionSignature};
use crate::{
    common::{JSONRPC_VERSION, REQUEST_ID_HEADER, SEND_INSTRUCTION_METHOD},
    error::RpcError,
    idl::{InstructionInterface, ProgramInterface},
    middlewares::error_handling::request_id_from_response,
    provider::Provider,
    Error,
};
use std::sync::Arc;
use uuid::Uuid;

/// Handle to a deployed program, bound to a [`Provider`](crate::provider::Provider).
///
/// Read-only and cheap to clone.
#[derive(Clone, Debug)]
pub struct Program {
    provider: Provider,
    interface: Arc<ProgramInterface>,
    address: String,
}

impl Program {
    /// Creates a handle from an interface and the address the program is deployed at.
    pub fn new(provider: Provider, interface: ProgramInterface, address: impl Into<String>) -> Self {
        Self {
            provider,
            interface: Arc::new(interface),
            address: address.into(),
        }
    }

    /// Program name, as declared in its interface.
    pub fn name(&self) -> &str {
        &self.interface.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn instructions(&self) -> &[InstructionInterface] {
        &self.interface.instructions
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// Invokes `initialize` with no arguments.
    pub async fn initialize(&self) -> Result<TransactionSignature, Error> {
        self.rpc(&Invocation::initialize()).await
    }

    /// Sends one instruction to the program and waits for the transaction signature.
    ///
    /// The instruction and its arguments are checked against the program interface
    /// before anything is sent. The request is attempted exactly once.
    #[tracing::instrument(
        name = "Invoke Program Instruction",
        skip(self, invocation),
        fields(program = %self.interface.name, instruction = %invocation.instruction)
    )]
    pub async fn rpc(&self, invocation: &Invocation) -> Result<TransactionSignature, Error> {
        let instruction = self
            .interface
            .instruction(&invocation.instruction)
            .ok_or_else(|| Error::UnknownInstruction {
                program: self.interface.name.clone(),
                instruction: invocation.instruction.clone(),
            })?;
        instruction.check_args(&invocation.args)?;

        let request_id = Uuid::new_v4().to_string();
        let body = RpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id: &request_id,
            method: SEND_INSTRUCTION_METHOD,
            params: SendInstructionParams {
                program: &self.address,
                instruction: &instruction.name,
                args: &invocation.args,
            },
        };

        tracing::debug!(request_id = %request_id, "Sending instruction");

        let response = self
            .provider
            .inner
            .client
            .post(self.provider.inner.endpoint.clone())
            .header(REQUEST_ID_HEADER, &request_id)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let echoed_request_id = request_id_from_response(&response);
        let res: RpcResponse = response.json().await?;

        match res {
            RpcResponse {
                error: Some(error), ..
            } => Err(Error::RpcError(RpcError {
                code: error.code,
                message: error.message,
                status,
                request_id: echoed_request_id.or(Some(request_id)),
                data: error.data,
            })),
            RpcResponse {
                result: Some(signature),
                ..
            } => {
                let signature = TransactionSignature::new(signature)?;
                tracing::info!(signature = %signature, "Instruction executed");
                Ok(signature)
            }
            RpcResponse { result: None, .. } => Err(Error::EmptySignature),
        }
    }
}
