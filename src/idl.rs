//! Program interface descriptions (IDL) produced by the program build.
//!
//! Two layouts are in circulation:
//!
//! ```json
//! { "name": "orbit_physical_market", "instructions": [], "metadata": { "address": "Fg6P..." } }
//! ```
//!
//! and the newer one, where the address moved to the top level and the name into `metadata`:
//!
//! ```json
//! { "address": "Fg6P...", "metadata": { "name": "orbit_physical_market" }, "instructions": [] }
//! ```
//!
//! Both deserialize into the same [`ProgramInterface`].

use crate::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Interface of a deployed program: its name, address and instructions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "RawProgramInterface")]
pub struct ProgramInterface {
    pub name: String,
    pub address: Option<String>,
    pub instructions: Vec<InstructionInterface>,
}

impl ProgramInterface {
    /// Looks up an instruction, ignoring the case style of the name.
    pub fn instruction(&self, name: &str) -> Option<&InstructionInterface> {
        let wanted = canonical_name(name);
        self.instructions
            .iter()
            .find(|ix| canonical_name(&ix.name) == wanted)
    }
}

/// Declaration of a single program instruction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InstructionInterface {
    pub name: String,
    #[serde(default)]
    pub args: Vec<FieldInterface>,
}

impl InstructionInterface {
    /// Checks that `args` is an object carrying exactly the declared arguments.
    pub fn check_args(&self, args: &Value) -> Result<(), Error> {
        let invalid = |reason: String| Error::InvalidArguments {
            instruction: self.name.clone(),
            reason,
        };

        let object = args
            .as_object()
            .ok_or_else(|| invalid("arguments must be a JSON object".to_string()))?;

        if let Some(missing) = self.args.iter().find(|f| !object.contains_key(&f.name)) {
            return Err(invalid(format!("missing argument {}", missing.name)));
        }

        if let Some(unexpected) = object
            .keys()
            .find(|k| !self.args.iter().any(|f| &f.name == *k))
        {
            return Err(invalid(format!("unexpected argument {}", unexpected)));
        }

        Ok(())
    }
}

/// Named instruction argument. The type is kept opaque.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldInterface {
    pub name: String,
    #[serde(default, rename = "type")]
    pub ty: Value,
}

#[derive(Deserialize)]
struct RawProgramInterface {
    name: Option<String>,
    address: Option<String>,
    metadata: Option<RawMetadata>,
    #[serde(default)]
    instructions: Vec<InstructionInterface>,
}

#[derive(Deserialize)]
struct RawMetadata {
    name: Option<String>,
    address: Option<String>,
}

impl TryFrom<RawProgramInterface> for ProgramInterface {
    type Error = String;

    fn try_from(raw: RawProgramInterface) -> Result<Self, Self::Error> {
        let (meta_name, meta_address) = raw
            .metadata
            .map(|m| (m.name, m.address))
            .unwrap_or_default();

        let name = raw
            .name
            .or(meta_name)
            .ok_or_else(|| "program name is missing".to_string())?;

        Ok(ProgramInterface {
            name,
            address: raw.address.or(meta_address),
            instructions: raw.instructions,
        })
    }
}

/// Normalizes a program or instruction name for comparison: separators are dropped and
/// letters lowercased, so that `OrbitPhysicalMarket`, `orbitPhysicalMarket`,
/// `orbit-physical-market`, `orbit_physical_market` and `orbitphysicalmarket` all compare
/// equal.
pub fn canonical_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | '.') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
