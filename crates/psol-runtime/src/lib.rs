//! Running forge for the Solidity build rules.

mod forge;
mod process;
mod remappings;

pub use forge::{resolve_forge, ForgeOutcome, ForgeWrapper, DEFAULT_DEPS_PACKAGE};
pub use process::{run_command, RunOutput};
pub use remappings::{load_remappings, parse_remappings};
