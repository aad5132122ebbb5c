//! `foundry.toml` parsing for the Solidity build rules.

pub mod config;

pub use config::{FoundryConfig, FoundryError, Profile, DEFAULT_PROFILE};
