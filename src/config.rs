//! Explicit configuration of a smoke test run.
//!
//! Values are layered, from lowest to highest priority:
//!
//! 1. built-in defaults,
//! 2. the framework variable `ANCHOR_PROVIDER_URL`,
//! 3. an optional configuration file (any format supported by [`config`]),
//! 4. environment variables prefixed with `SMOKE_`, using `__` to separate nested keys
//!    (e.g. `SMOKE_PROVIDER__WALLET__KEY_ID`).
//!
//! The resulting [`SmokeConfig`] is a plain value: nothing else in the crate reads the
//! process environment.

use crate::{
    common::{DEFAULT_IDL_DIR, DEFAULT_INSTRUCTION, DEFAULT_RPC_URL},
    Error,
};
use serde::Deserialize;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

static ENV_PREFIX: &str = "SMOKE";
static ANCHOR_PROVIDER_URL: &str = "ANCHOR_PROVIDER_URL";

/// Full configuration of a smoke test run.
#[derive(Deserialize, Debug, Clone)]
pub struct SmokeConfig {
    /// How to reach the backend.
    pub provider: ProviderConfig,
    /// Where to find program interfaces.
    pub workspace: WorkspaceConfig,
    /// Name of the program under test, in any case style.
    pub program: String,
    /// Instruction to invoke. Defaults to `initialize`.
    pub instruction: String,
}

/// Connection settings.
#[derive(Deserialize, Debug, Clone)]
pub struct ProviderConfig {
    /// RPC endpoint URL.
    pub url: String,
    /// Credentials used to sign requests.
    pub wallet: WalletConfig,
}

/// Signing credentials.
#[derive(Deserialize, Debug, Clone)]
pub struct WalletConfig {
    /// Identifier of the key, sent along with every signature.
    pub key_id: String,
    /// Path to the PEM-encoded EC private key.
    ///
    /// `ANCHOR_WALLET` is not used as a fallback: it points at a JSON keypair, which cannot
    /// sign requests.
    pub private_key_path: PathBuf,
}

/// Program interface lookup settings.
#[derive(Deserialize, Debug, Clone)]
pub struct WorkspaceConfig {
    /// Directory holding one JSON interface file per program.
    pub idl_dir: PathBuf,
    /// Program address overrides, keyed by program name.
    #[serde(default)]
    pub programs: HashMap<String, String>,
}

impl SmokeConfig {
    /// Loads the configuration from an optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        Self::load_from(path, std::env::vars().collect())
    }

    /// Loads the configuration from an optional file and the given set of variables.
    pub fn load_from(path: Option<&Path>, vars: HashMap<String, String>) -> Result<Self, Error> {
        let mut builder = config::Config::builder()
            .set_default("provider.url", DEFAULT_RPC_URL)?
            .set_default("workspace.idl_dir", DEFAULT_IDL_DIR)?
            .set_default("instruction", DEFAULT_INSTRUCTION)?;

        if let Some(url) = vars.get(ANCHOR_PROVIDER_URL) {
            builder = builder.set_default("provider.url", url.as_str())?;
        }

        if let Some(path) = path {
            tracing::debug!("Reading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(Some(vars)),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }
}
