use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::debug;

use crate::process::run_command;

pub const DEFAULT_DEPS_PACKAGE: &str = "//third_party/solidity";

const IMPORT_ERROR_MARKER: &str = "Unable to resolve import \"";
const COMPILER_VERSION_MARKER: &str = "Source file requires different compiler version";
const STACK_TOO_DEEP_MARKER: &str = "Stack too deep";

/// Import prefixes of well-known libraries and the dependency target that
/// provides each. Checked in order; the first match wins.
const KNOWN_DEPS: &[(&str, &str)] = &[
    ("@openzeppelin/contracts", "openzeppelin-contracts"),
    ("@openzeppelin", "openzeppelin-contracts"),
    ("openzeppelin-contracts", "openzeppelin-contracts"),
    ("forge-std", "forge-std"),
    ("@rari-capital/solmate", "solmate"),
    ("@solmate", "solmate"),
    ("solmate", "solmate"),
    ("solady", "solady"),
];

#[derive(Debug, Clone)]
pub struct ForgeOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Stderr with hints appended; only set when forge failed.
    pub enhanced: Option<String>,
}

impl ForgeOutcome {
    /// The stderr text to show the user.
    #[must_use]
    pub fn display_stderr(&self) -> &str {
        self.enhanced.as_deref().unwrap_or(&self.stderr)
    }
}

#[derive(Debug, Clone)]
pub struct ForgeWrapper {
    remappings: Vec<String>,
    deps_package: String,
}

impl ForgeWrapper {
    #[must_use]
    pub fn new(remappings: Vec<String>) -> Self {
        Self {
            remappings,
            deps_package: DEFAULT_DEPS_PACKAGE.to_string(),
        }
    }

    /// Package label suggestions are rendered under (`<label>:<dep>`).
    #[must_use]
    pub fn with_deps_package(mut self, deps_package: impl Into<String>) -> Self {
        self.deps_package = deps_package.into();
        self
    }

    /// Run forge and enhance its stderr when it exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error when forge cannot be started; a failing forge run is
    /// reported through [`ForgeOutcome::exit_code`].
    pub fn run(&self, forge: &Path, args: &[String]) -> Result<ForgeOutcome> {
        let program = forge.to_string_lossy();
        debug!(forge = %program, ?args, "running forge");
        let output = run_command(&program, args).context("failed to run forge")?;
        let enhanced = (output.code != 0).then(|| self.enhance_error(&output.stderr));
        Ok(ForgeOutcome {
            exit_code: output.code,
            stdout: output.stdout,
            stderr: output.stderr,
            enhanced,
        })
    }

    /// Append hints for recognised failure classes to forge's stderr. Output
    /// without a recognised error is returned unchanged.
    #[must_use]
    pub fn enhance_error(&self, stderr: &str) -> String {
        let mut enhanced = String::from(stderr);

        let imports = unresolved_imports(stderr);
        if !imports.is_empty() {
            let rule = "=".repeat(60);
            let _ = write!(
                enhanced,
                "\n\n{rule}\nHINT: Import resolution failed\n{rule}\n\n"
            );
            for import in imports {
                let _ = writeln!(enhanced, "  Import: {import}");
                let suggestions = self.suggest_deps(import);
                if !suggestions.is_empty() {
                    enhanced.push_str("  Suggested deps:\n");
                    for suggestion in suggestions {
                        let _ = writeln!(enhanced, "    - {suggestion}");
                    }
                }
                enhanced.push('\n');
            }
            if !self.remappings.is_empty() {
                enhanced.push_str("Available remappings:\n");
                for remapping in &self.remappings {
                    let _ = writeln!(enhanced, "  {remapping}");
                }
            }
        }

        if stderr.contains(COMPILER_VERSION_MARKER) {
            enhanced.push_str("\n\nHINT: Compiler version mismatch.\n");
            enhanced.push_str("Try specifying solc_version in your sol_contract rule.\n");
        }

        if stderr.contains(STACK_TOO_DEEP_MARKER) {
            enhanced.push_str("\n\nHINT: Stack too deep error.\n");
            enhanced.push_str("Consider:\n");
            enhanced.push_str("  - Breaking up the function into smaller functions\n");
            enhanced.push_str("  - Using structs to group variables\n");
            enhanced.push_str("  - Enabling optimizer with higher runs\n");
        }

        enhanced
    }

    /// Dependencies that could provide `import`: one known library target at
    /// most, plus every loaded remapping whose prefix already covers it.
    #[must_use]
    pub fn suggest_deps(&self, import: &str) -> Vec<String> {
        let mut suggestions = Vec::new();
        if let Some((_, dep)) = KNOWN_DEPS
            .iter()
            .find(|(prefix, _)| import.starts_with(prefix))
        {
            suggestions.push(format!("{}:{dep}", self.deps_package));
        }
        for remapping in &self.remappings {
            let Some((left, _)) = remapping.split_once('=') else {
                continue;
            };
            if import.starts_with(left.trim_end_matches('/')) {
                suggestions.push(format!("(remapping exists: {remapping})"));
            }
        }
        suggestions
    }
}

fn unresolved_imports(stderr: &str) -> Vec<&str> {
    let mut imports = Vec::new();
    let mut rest = stderr;
    while let Some(start) = rest.find(IMPORT_ERROR_MARKER) {
        let tail = &rest[start + IMPORT_ERROR_MARKER.len()..];
        let Some(end) = tail.find('"') else {
            break;
        };
        if end > 0 {
            imports.push(&tail[..end]);
        }
        rest = &tail[end + 1..];
    }
    imports
}

/// Locate the forge binary. Values containing a path separator are used as
/// given; bare names are searched for on `PATH`.
///
/// # Errors
///
/// Returns an error when a bare name is not found on `PATH`.
pub fn resolve_forge(spec: &str) -> Result<PathBuf> {
    let candidate = Path::new(spec);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        return Ok(candidate.to_path_buf());
    }
    which::which(spec)
        .with_context(|| format!("{spec} not found on PATH; pass --forge or set PSOL_FORGE"))
}
