use crate::common::mock_server::RpcMockServer;
use openssl::{
    ec::{EcGroup, EcKey},
    nid::Nid,
};
use program_smoke::{Program, Provider, SmokeConfig, Workspace};
use serde_json::json;
use std::collections::HashMap;
use tempfile::TempDir;
use uuid::Uuid;

/// Program under test, spelled the way callers usually write it.
static PROGRAM_NAME: &str = "OrbitPhysicalMarket";

pub struct TestContext {
    pub provider: Provider,
    pub workspace: Workspace,
    config: SmokeConfig,
    mock_server: RpcMockServer,
    _files: TempDir,
}

impl TestContext {
    pub async fn start() -> Self {
        // Generate a fresh wallet and program address for this specific test
        let signing_key_id = Uuid::new_v4().to_string();
        let signing_private_key =
            EcKey::generate(&EcGroup::from_curve_name(Nid::SECP521R1).unwrap()).unwrap();
        let program_address = Uuid::new_v4().simple().to_string();

        let mock_server = RpcMockServer::start(
            &signing_key_id,
            signing_private_key.public_key_to_pem().unwrap(),
            &program_address,
        )
        .await;

        // Lay out the files the program build would produce
        let files = tempfile::tempdir().unwrap();
        let idl_dir = files.path().join("idl");
        std::fs::create_dir(&idl_dir).unwrap();
        std::fs::write(
            idl_dir.join("orbit_physical_market.json"),
            json!({
                "version": "0.1.0",
                "name": "orbit_physical_market",
                "instructions": [{ "name": "initialize", "accounts": [], "args": [] }],
                "metadata": { "address": program_address }
            })
            .to_string(),
        )
        .unwrap();
        let wallet_path = files.path().join("wallet.pem");
        std::fs::write(&wallet_path, signing_private_key.private_key_to_pem().unwrap()).unwrap();

        let vars: HashMap<String, String> = [
            ("SMOKE_PROVIDER__URL", mock_server.url().to_string()),
            ("SMOKE_PROVIDER__WALLET__KEY_ID", signing_key_id),
            (
                "SMOKE_PROVIDER__WALLET__PRIVATE_KEY_PATH",
                wallet_path.display().to_string(),
            ),
            ("SMOKE_WORKSPACE__IDL_DIR", idl_dir.display().to_string()),
            ("SMOKE_PROGRAM", PROGRAM_NAME.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        let config = SmokeConfig::load_from(None, vars).unwrap();

        let provider = Provider::from_config(&config.provider).unwrap();
        let workspace = Workspace::from_config(&config.workspace).unwrap();

        Self {
            provider,
            workspace,
            config,
            mock_server,
            _files: files,
        }
    }

    /// Configuration pointing at the mock backend.
    pub fn config(&self) -> SmokeConfig {
        self.config.clone()
    }

    pub fn program(&self) -> Program {
        self.workspace
            .program(&self.provider, &self.config.program)
            .unwrap()
    }

    /// Number of requests that reached the backend, accepted or rejected.
    pub fn received_requests(&self) -> usize {
        self.mock_server.received_requests()
    }

    /// Number of instructions the backend accepted.
    pub fn received_calls(&self) -> usize {
        self.mock_server.received_calls().len()
    }

    pub fn fail_next_call(&self, status: u16) {
        self.mock_server.fail_next_call(status)
    }
}
