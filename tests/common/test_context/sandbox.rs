use program_smoke::{Program, Provider, SmokeConfig, Workspace};

pub struct TestContext {
    pub provider: Provider,
    pub workspace: Workspace,
    config: SmokeConfig,
}

impl TestContext {
    pub async fn start() -> Self {
        // Take the endpoint, wallet and workspace from the env (`SMOKE_*` / `ANCHOR_PROVIDER_URL`)
        let config = SmokeConfig::load(None).unwrap();

        let provider = Provider::from_config(&config.provider).unwrap();
        let workspace = Workspace::from_config(&config.workspace).unwrap();

        Self {
            provider,
            workspace,
            config,
        }
    }

    pub fn config(&self) -> SmokeConfig {
        self.config.clone()
    }

    pub fn program(&self) -> Program {
        self.workspace
            .program(&self.provider, &self.config.program)
            .unwrap()
    }
}
