use crate::{
    common::REQUEST_ID_HEADER,
    error::{Error, RpcError},
};
use async_trait::async_trait;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use serde_json::Value;
use task_local_extensions::Extensions;

/// Generic JSON-RPC server error code, used when the body carries no error object.
pub(crate) const SERVER_ERROR_CODE: i64 = -32000;

/// Reqwest middleware which translates non-success HTTP responses
/// into [`Error::RpcError`](crate::error::Error)s.
///
/// Successful responses are passed through untouched: JSON-RPC errors carried by a
/// `200 OK` are decoded by the caller together with the result.
pub struct ErrorHandlingMiddleware;

#[async_trait]
impl Middleware for ErrorHandlingMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let response = next.run(req, extensions).await?;

        if !response.status().is_success() {
            tracing::debug!("Failed HTTP request. Status code: {}", response.status());

            let rpc_error = rpc_error_from_response(response).await?;
            return Err(Error::RpcError(rpc_error).into());
        }

        Ok(response)
    }
}

/// Error object of a JSON-RPC response.
#[derive(serde::Deserialize, Debug)]
pub(crate) struct ErrorObject {
    pub(crate) code: i64,
    pub(crate) message: String,
    pub(crate) data: Option<Value>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(untagged)]
enum ErrorResponseBody {
    JsonRpc { error: ErrorObject },
    Unknown,
}

async fn rpc_error_from_response(response: Response) -> reqwest_middleware::Result<RpcError> {
    let status = response.status().as_u16();
    let request_id = request_id_from_response(&response);

    let bytes = response.bytes().await?;
    let error_response: ErrorResponseBody =
        serde_json::from_slice(&bytes).unwrap_or(ErrorResponseBody::Unknown);

    let rpc_error = match error_response {
        ErrorResponseBody::JsonRpc { error } => RpcError {
            code: error.code,
            message: error.message,
            status,
            request_id,
            data: error.data,
        },
        ErrorResponseBody::Unknown => RpcError {
            code: SERVER_ERROR_CODE,
            message: "server_error".to_string(),
            status,
            request_id,
            data: None,
        },
    };

    Ok(rpc_error)
}

pub(crate) fn request_id_from_response(response: &Response) -> Option<String> {
    response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}
