//! Connection context used to reach the backend.

use crate::{
    config::{ProviderConfig, WalletConfig},
    middlewares::{
        error_handling::ErrorHandlingMiddleware,
        inject_user_agent::{InjectUserAgentMiddleware, DEFAULT_USER_AGENT},
        signing::SigningMiddleware,
    },
    Error,
};
use reqwest::{header::HeaderValue, Url};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_tracing::TracingMiddleware;
use secrecy::{ExposeSecret, Secret};
use std::{
    fmt::{Debug, Formatter},
    path::Path,
    sync::Arc,
};

/// Signing credentials of the harness.
///
/// The private key is kept in a [`secrecy::Secret`] and is never printed.
#[derive(Clone)]
pub struct Wallet {
    key_id: String,
    private_key_pem: Secret<String>,
}

impl Wallet {
    /// Creates a wallet from a key id and a PEM-encoded EC private key.
    pub fn new(key_id: impl Into<String>, private_key_pem: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            private_key_pem: Secret::new(private_key_pem.into()),
        }
    }

    /// Reads the private key from a PEM file.
    pub fn from_pem_file(key_id: impl Into<String>, path: &Path) -> Result<Self, Error> {
        let pem = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::new(key_id, pem))
    }

    /// Identifier of the signing key.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub(crate) fn private_key_pem(&self) -> &[u8] {
        self.private_key_pem.expose_secret().as_bytes()
    }

    /// Produces a throwaway signature to make sure the key is usable.
    fn check(&self) -> Result<(), Error> {
        truelayer_signing::sign_with_pem(&self.key_id, self.private_key_pem())
            .method("POST")
            .path("/")
            .sign()?;

        Ok(())
    }
}

impl Debug for Wallet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl TryFrom<&WalletConfig> for Wallet {
    type Error = Error;

    fn try_from(config: &WalletConfig) -> Result<Self, Self::Error> {
        Wallet::from_pem_file(config.key_id.clone(), &config.private_key_path)
    }
}

pub(crate) struct ProviderInner {
    pub(crate) client: ClientWithMiddleware,
    pub(crate) endpoint: Url,
    pub(crate) key_id: Option<String>,
}

impl Debug for ProviderInner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderInner")
            .field("endpoint", &self.endpoint)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

/// Connection context: an RPC endpoint plus the HTTP stack used to call it.
///
/// Built once and never mutated. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Provider {
    pub(crate) inner: Arc<ProviderInner>,
}

impl Provider {
    /// Returns a new builder targeting the given endpoint.
    pub fn builder(endpoint: Url) -> ProviderBuilder {
        ProviderBuilder::new(endpoint)
    }

    /// Builds a provider from its configuration, loading the wallet key from disk.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, Error> {
        let endpoint = Url::parse(&config.url)
            .map_err(|e| Error::InvalidEndpoint(format!("{}: {}", config.url, e)))?;
        let wallet = Wallet::try_from(&config.wallet)?;

        Provider::builder(endpoint).with_wallet(wallet).build()
    }

    /// RPC endpoint this provider talks to.
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Id of the key used to sign requests, if any.
    pub fn key_id(&self) -> Option<&str> {
        self.inner.key_id.as_deref()
    }
}

/// Builder for a [`Provider`](crate::provider::Provider).
#[derive(Debug)]
pub struct ProviderBuilder {
    client: reqwest::Client,
    endpoint: Url,
    wallet: Option<Wallet>,
    user_agent: String,
}

impl ProviderBuilder {
    /// Creates a new builder targeting the given endpoint.
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            wallet: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Sets a specific reqwest [`Client`](reqwest::Client) to use.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Configures the wallet used to sign every request.
    pub fn with_wallet(mut self, wallet: Wallet) -> Self {
        self.wallet = Some(wallet);
        self
    }

    /// Overrides the `User-Agent` header.
    ///
    /// Defaults to `program-smoke/<version>`.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Consumes the builder and builds a new [`Provider`](crate::provider::Provider).
    ///
    /// Fails if the endpoint is not an HTTP(S) URL or the wallet key cannot sign.
    pub fn build(self) -> Result<Provider, Error> {
        if !matches!(self.endpoint.scheme(), "http" | "https") {
            return Err(Error::InvalidEndpoint(format!(
                "unsupported scheme {} in {}",
                self.endpoint.scheme(),
                self.endpoint
            )));
        }

        if let Some(wallet) = &self.wallet {
            wallet.check()?;
        }

        let user_agent = HeaderValue::from_str(&self.user_agent)
            .map_err(|e| Error::Other(anyhow::anyhow!("Invalid user agent: {}", e)))?;

        let key_id = self.wallet.as_ref().map(|w| w.key_id().to_string());
        let client = build_client_with_middleware(self.client, user_agent, self.wallet);

        tracing::debug!(endpoint = %self.endpoint, "Provider ready");

        Ok(Provider {
            inner: Arc::new(ProviderInner {
                client,
                endpoint: self.endpoint,
                key_id,
            }),
        })
    }
}

fn build_client_with_middleware(
    client: reqwest::Client,
    user_agent: HeaderValue,
    wallet: Option<Wallet>,
) -> ClientWithMiddleware {
    let mut builder = reqwest_middleware::ClientBuilder::new(client)
        .with(InjectUserAgentMiddleware::new(user_agent))
        .with(TracingMiddleware::default())
        .with(ErrorHandlingMiddleware);

    if let Some(wallet) = wallet {
        builder = builder.with(SigningMiddleware { wallet });
    }

    builder.build()
}
