//! The smoke test itself: one instruction, one attempt, one signature.

use crate::{
    config::SmokeConfig,
    program::{Invocation, Program, TransactionSignature},
    provider::Provider,
    workspace::Workspace,
    Error,
};
use chrono::{DateTime, Utc};

/// Progress of a [`SmokeTest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// Not run yet.
    Pending,
    /// The call succeeded with this signature.
    Completed(TransactionSignature),
    /// The call failed with this message.
    Failed(String),
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub program: String,
    pub instruction: String,
    pub signature: TransactionSignature,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Runs a single instruction against a program exactly once.
///
/// ```rust,no_run
/// # use program_smoke::{SmokeConfig, SmokeTest, Error};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Error> {
/// let config = SmokeConfig::load(None)?;
/// let mut smoke_test = SmokeTest::from_config(&config)?;
/// let report = smoke_test.run().await?;
/// assert!(!report.signature.as_str().is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SmokeTest {
    program: Program,
    invocation: Invocation,
    state: RunState,
}

impl SmokeTest {
    /// Smoke test calling `initialize` with no arguments.
    pub fn new(program: Program) -> Self {
        Self::with_invocation(program, Invocation::initialize())
    }

    pub fn with_invocation(program: Program, invocation: Invocation) -> Self {
        Self {
            program,
            invocation,
            state: RunState::Pending,
        }
    }

    /// Sets up the provider, loads the workspace and resolves the configured program.
    ///
    /// Nothing is sent to the backend here: a bad configuration fails before any call.
    pub fn from_config(config: &SmokeConfig) -> Result<Self, Error> {
        let provider = Provider::from_config(&config.provider)?;
        let workspace = Workspace::from_config(&config.workspace)?;
        let program = workspace.program(&provider, &config.program)?;

        Ok(Self::with_invocation(
            program,
            Invocation::new(
                config.instruction.clone(),
                serde_json::Value::Object(Default::default()),
            ),
        ))
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Issues the call on its own task and waits for it.
    ///
    /// On success the signature is printed to standard output. A second call returns
    /// [`Error::AlreadyRun`](crate::Error::AlreadyRun) without contacting the backend.
    #[tracing::instrument(
        name = "Run Smoke Test",
        skip(self),
        fields(program = %self.program.name(), instruction = %self.invocation.instruction)
    )]
    pub async fn run(&mut self) -> Result<RunReport, Error> {
        if self.state != RunState::Pending {
            return Err(Error::AlreadyRun);
        }

        let started_at = Utc::now();
        let program = self.program.clone();
        let invocation = self.invocation.clone();
        let task = tokio::spawn(async move { program.rpc(&invocation).await });

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => Err(Error::Other(anyhow::anyhow!("Smoke test task failed: {}", e))),
        };

        match outcome {
            Ok(signature) => {
                println!("Your transaction signature {}", signature);
                self.state = RunState::Completed(signature.clone());

                Ok(RunReport {
                    program: self.program.name().to_string(),
                    instruction: self.invocation.instruction.clone(),
                    signature,
                    started_at,
                    finished_at: Utc::now(),
                })
            }
            Err(e) => {
                tracing::warn!("Smoke test failed: {}", e);
                self.state = RunState::Failed(e.to_string());
                Err(e)
            }
        }
    }
}
