//! Registry of the programs available to the harness.

use crate::{
    config::WorkspaceConfig,
    idl::{canonical_name, ProgramInterface},
    program::Program,
    provider::Provider,
    Error,
};
use std::{collections::HashMap, path::Path};

/// Programs known to the harness, keyed by canonical name.
///
/// Usually loaded from the directory where the program build writes its interface files,
/// but it can also be assembled in memory.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    programs: HashMap<String, ProgramInterface>,
    addresses: HashMap<String, String>,
}

impl Workspace {
    /// Reads every `*.json` file in `idl_dir` as a program interface.
    #[tracing::instrument(name = "Load Workspace", level = "debug")]
    pub fn load(idl_dir: &Path) -> Result<Self, Error> {
        let io_error = |source: std::io::Error| Error::Io {
            path: idl_dir.to_path_buf(),
            source,
        };

        let mut paths = std::fs::read_dir(idl_dir)
            .map_err(io_error)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_error)?;
        paths.retain(|p| p.extension().map_or(false, |ext| ext == "json"));
        paths.sort();

        let mut interfaces = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = std::fs::read(&path).map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?;
            let interface: ProgramInterface =
                serde_json::from_slice(&bytes).map_err(|source| Error::Idl {
                    path: path.clone(),
                    source,
                })?;

            tracing::debug!(program = %interface.name, path = %path.display(), "Found program interface");
            interfaces.push(interface);
        }

        Ok(Self::from_interfaces(interfaces))
    }

    /// Builds a workspace from the given interfaces.
    ///
    /// If two interfaces share a canonical name, the last one wins.
    pub fn from_interfaces(interfaces: impl IntoIterator<Item = ProgramInterface>) -> Self {
        let mut programs = HashMap::new();
        for interface in interfaces {
            let key = canonical_name(&interface.name);
            if let Some(previous) = programs.insert(key, interface) {
                tracing::warn!(program = %previous.name, "Duplicate program interface replaced");
            }
        }

        Self {
            programs,
            addresses: HashMap::new(),
        }
    }

    /// Loads the configured directory and applies the configured address overrides.
    pub fn from_config(config: &WorkspaceConfig) -> Result<Self, Error> {
        let workspace = Self::load(&config.idl_dir)?;

        Ok(config
            .programs
            .iter()
            .fold(workspace, |ws, (name, address)| ws.with_address(name, address)))
    }

    /// Overrides the address of a program, e.g. for a different cluster.
    pub fn with_address(mut self, name: &str, address: impl Into<String>) -> Self {
        self.addresses.insert(canonical_name(name), address.into());
        self
    }

    /// Names of all the known programs, as declared in their interfaces.
    pub fn program_names(&self) -> impl Iterator<Item = &str> {
        self.programs.values().map(|p| p.name.as_str())
    }

    /// Interface of the named program, if known.
    pub fn interface(&self, name: &str) -> Option<&ProgramInterface> {
        self.programs.get(&canonical_name(name))
    }

    /// Resolves a program handle bound to the given provider.
    pub fn program(&self, provider: &Provider, name: &str) -> Result<Program, Error> {
        let key = canonical_name(name);
        let interface = self
            .programs
            .get(&key)
            .ok_or_else(|| Error::UnknownProgram(name.to_string()))?;

        let address = self
            .addresses
            .get(&key)
            .or(interface.address.as_ref())
            .cloned()
            .ok_or_else(|| Error::MissingAddress(interface.name.clone()))?;

        Ok(Program::new(provider.clone(), interface.clone(), address))
    }
}
