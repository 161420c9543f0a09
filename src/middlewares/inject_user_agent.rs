use async_trait::async_trait;
use reqwest::{
    header::{HeaderValue, USER_AGENT},
    Request, Response,
};
use reqwest_middleware::{Middleware, Next};
use task_local_extensions::Extensions;

/// Default `User-Agent` sent by the harness.
pub static DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Middleware to inject the `User-Agent` header to all outgoing requests.
pub struct InjectUserAgentMiddleware {
    pub(crate) user_agent: HeaderValue,
}

impl InjectUserAgentMiddleware {
    pub fn new(user_agent: HeaderValue) -> Self {
        Self { user_agent }
    }
}

#[async_trait]
impl Middleware for InjectUserAgentMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        req.headers_mut()
            .insert(USER_AGENT, self.user_agent.clone());

        next.run(req, extensions).await
    }
}
