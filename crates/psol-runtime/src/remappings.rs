use std::{fs, path::Path};

use tracing::warn;

/// Read a remapping file: one `left/=right/` entry per line, surrounding
/// whitespace trimmed, blank lines skipped. An unreadable file contributes no
/// remappings.
#[must_use]
pub fn load_remappings(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(contents) => parse_remappings(&contents),
        Err(err) => {
            warn!(path = %path.display(), %err, "ignoring unreadable remapping file");
            Vec::new()
        }
    }
}

#[must_use]
pub fn parse_remappings(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
