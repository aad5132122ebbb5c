use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, thiserror::Error)]
pub enum FoundryError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse foundry.toml: {0}")]
    Parse(#[from] toml_edit::de::Error),
    #[error("failed to render foundry config as JSON: {0}")]
    Render(#[from] serde_json::Error),
}

/// The subset of `foundry.toml` the build rules consume. Unknown keys and
/// tables (`[rpc_endpoints]`, `[fmt]`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FoundryConfig {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profile: BTreeMap<String, Profile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remappings: Vec<String>,
}

/// A `[profile.<name>]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Profile {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub solc_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub evm_version: String,
    #[serde(skip_serializing_if = "is_false")]
    pub via_ir: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optimizer: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub optimizer_runs: u64,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub src: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub out: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub libs: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub test: String,
    #[serde(skip_serializing_if = "is_false")]
    pub cache: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cache_path: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remappings: Vec<String>,

    #[serde(skip_serializing_if = "is_zero")]
    pub fuzz_runs: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub invariant_runs: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub verbosity: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub no_match_test: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub match_test: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub match_contract: String,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl FoundryConfig {
    /// Read and parse a `foundry.toml` file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or is not valid TOML of
    /// the expected shape.
    pub fn from_path(path: &Path) -> Result<Self, FoundryError> {
        let contents = fs::read_to_string(path).map_err(|source| FoundryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&contents)?;
        debug!(
            path = %path.display(),
            profiles = config.profile.len(),
            "parsed foundry config"
        );
        Ok(config)
    }

    /// Parse `foundry.toml` contents.
    ///
    /// # Errors
    ///
    /// Returns [`FoundryError::Parse`] for invalid TOML or mistyped values.
    pub fn parse(contents: &str) -> Result<Self, FoundryError> {
        Ok(toml_edit::de::from_str(contents)?)
    }

    /// The named profile, falling back to `default`. An empty name means
    /// `default`.
    #[must_use]
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        let name = if name.is_empty() {
            DEFAULT_PROFILE
        } else {
            name
        };
        self.profile
            .get(name)
            .or_else(|| self.profile.get(DEFAULT_PROFILE))
    }

    #[must_use]
    pub fn solc_version(&self, profile: &str) -> Option<&str> {
        self.profile(profile)
            .map(|p| p.solc_version.as_str())
            .filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn evm_version(&self, profile: &str) -> Option<&str> {
        self.profile(profile)
            .map(|p| p.evm_version.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Top-level remappings followed by the profile's own.
    #[must_use]
    pub fn remappings(&self, profile: &str) -> Vec<&str> {
        let mut remappings: Vec<&str> = self.remappings.iter().map(String::as_str).collect();
        if let Some(profile) = self.profile(profile) {
            remappings.extend(profile.remappings.iter().map(String::as_str));
        }
        remappings
    }

    /// `(enabled, runs)`; `(false, 0)` when no profile applies.
    #[must_use]
    pub fn optimizer(&self, profile: &str) -> (bool, u64) {
        self.profile(profile)
            .map_or((false, 0), |p| (p.optimizer, p.optimizer_runs))
    }

    /// Pretty JSON with unset fields omitted.
    ///
    /// # Errors
    ///
    /// Returns [`FoundryError::Render`] if serialization fails.
    pub fn to_json(&self) -> Result<String, FoundryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
