use crate::{
    common::{REQUEST_ID_HEADER, SIGNATURE_HEADER},
    error::Error,
    provider::Wallet,
};
use async_trait::async_trait;
use reqwest::{header::HeaderValue, Method, Request, Response};
use reqwest_middleware::{Middleware, Next};
use task_local_extensions::Extensions;

/// Middleware to attach a wallet signature to all outgoing `POST` requests.
///
/// The signature covers the method, the path, the `X-Request-Id` header and the body,
/// and is built with [`truelayer_signing`](truelayer_signing).
pub struct SigningMiddleware {
    pub(crate) wallet: Wallet,
}

#[async_trait]
impl Middleware for SigningMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        if *req.method() == Method::POST {
            let mut signer = truelayer_signing::sign_with_pem(
                self.wallet.key_id(),
                self.wallet.private_key_pem(),
            )
            .method(req.method().as_str())
            .path(req.url().path());

            if let Some(request_id) = req.headers().get(REQUEST_ID_HEADER) {
                signer = signer.header(REQUEST_ID_HEADER, request_id.as_bytes());
            }

            if let Some(body) = req.body() {
                let bytes = body
                    .as_bytes()
                    .ok_or_else(|| anyhow::anyhow!("Cannot sign a streaming request body"))?;
                signer = signer.body(bytes);
            }

            let signature = signer.sign().map_err(Error::from)?;
            let header_value = HeaderValue::from_str(&signature)
                .map_err(|e| reqwest_middleware::Error::Middleware(e.into()))?;
            req.headers_mut().insert(SIGNATURE_HEADER, header_value);
        }

        next.run(req, extensions).await
    }
}
