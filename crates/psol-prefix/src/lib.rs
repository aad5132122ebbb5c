//! Import-prefix detection for vendored Solidity libraries.
//!
//! A library downloaded as a repository archive is imported under the name its
//! `package.json` declares (`@openzeppelin/contracts`, `solmate`, `forge-std`).
//! Candidates are checked in priority order:
//!
//! 1. `package.json` inside the package directory (e.g. `contracts/package.json`)
//! 2. `package.json` at the repository root
//! 3. the caller-supplied fallback name

use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
};

use serde::Serialize;
use tracing::{debug, info, trace};
use zip::{result::ZipError, ZipArchive};

mod manifest;

pub use manifest::{canonical_name, is_placeholder};

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("failed to open archive {origin}")]
    ArchiveOpen {
        origin: String,
        #[source]
        source: ZipError,
    },
}

/// What to resolve: the package directory inside the archive's top-level
/// folder and the name to fall back on.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionRequest<'a> {
    pub package_dir: &'a str,
    pub fallback_name: &'a str,
}

impl<'a> ResolutionRequest<'a> {
    #[must_use]
    pub fn new(package_dir: &'a str, fallback_name: &'a str) -> Self {
        Self {
            package_dir,
            fallback_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixSource {
    NestedManifest,
    RootManifest,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPrefix {
    pub prefix: String,
    pub source: PrefixSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestCandidate {
    pub path: String,
    /// Lower ranks are checked first.
    pub rank: u8,
    pub source: PrefixSource,
}

/// Resolve the import prefix of the package inside the zip at `zip_path`.
///
/// # Errors
///
/// Returns [`DetectError::ArchiveOpen`] when the file is missing, unreadable, or
/// not a zip archive. Every manifest problem falls through to the next
/// candidate instead.
pub fn resolve_prefix(
    zip_path: &Path,
    request: &ResolutionRequest<'_>,
) -> Result<ResolvedPrefix, DetectError> {
    let origin = zip_path.display().to_string();
    let file = File::open(zip_path).map_err(|err| DetectError::ArchiveOpen {
        origin: origin.clone(),
        source: err.into(),
    })?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|source| DetectError::ArchiveOpen { origin, source })?;
    Ok(resolve_in_archive(&mut archive, request))
}

/// Same as [`resolve_prefix`] for an archive held in any seekable reader.
///
/// # Errors
///
/// Returns [`DetectError::ArchiveOpen`] when the bytes are not a zip archive.
pub fn resolve_prefix_from_reader<R: Read + Seek>(
    reader: R,
    request: &ResolutionRequest<'_>,
) -> Result<ResolvedPrefix, DetectError> {
    let mut archive = ZipArchive::new(reader).map_err(|source| DetectError::ArchiveOpen {
        origin: "<reader>".to_string(),
        source,
    })?;
    Ok(resolve_in_archive(&mut archive, request))
}

fn resolve_in_archive<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    request: &ResolutionRequest<'_>,
) -> ResolvedPrefix {
    let root = archive_root(archive);
    debug!(root = %root, package_dir = request.package_dir, "detecting import prefix");

    for candidate in manifest_candidates(&root, request.package_dir) {
        let Some(contents) = read_entry(archive, &candidate.path) else {
            continue;
        };
        if let Some(prefix) = manifest::prefix_from_manifest(&candidate.path, &contents) {
            info!(%prefix, path = %candidate.path, "import prefix from manifest");
            return ResolvedPrefix {
                prefix,
                source: candidate.source,
            };
        }
    }

    info!(prefix = request.fallback_name, "no usable manifest; using fallback name");
    ResolvedPrefix {
        prefix: request.fallback_name.to_string(),
        source: PrefixSource::Fallback,
    }
}

/// The repository folder source-hosting archives wrap everything in
/// (`owner-repo-revision/`): the first directory entry, or `""` when the
/// archive has none.
pub fn archive_root<R: Read + Seek>(archive: &mut ZipArchive<R>) -> String {
    for index in 0..archive.len() {
        match archive.by_index_raw(index) {
            Ok(entry) if entry.is_dir() => {
                let name = entry.name();
                return name.strip_suffix('/').unwrap_or(name).to_string();
            }
            Ok(_) => {}
            Err(err) => debug!(index, %err, "skipping unreadable archive entry"),
        }
    }
    String::new()
}

#[must_use]
pub fn manifest_candidates(root: &str, package_dir: &str) -> [ManifestCandidate; 2] {
    [
        ManifestCandidate {
            path: join_archive_path(&[root, package_dir, MANIFEST_FILE]),
            rank: 0,
            source: PrefixSource::NestedManifest,
        },
        ManifestCandidate {
            path: join_archive_path(&[root, MANIFEST_FILE]),
            rank: 1,
            source: PrefixSource::RootManifest,
        },
    ]
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Option<Vec<u8>> {
    let mut entry = match archive.by_name(path) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            trace!(%path, "manifest not present");
            return None;
        }
        Err(err) => {
            debug!(%path, %err, "unable to open manifest entry");
            return None;
        }
    };
    let mut contents = Vec::new();
    if let Err(err) = entry.read_to_end(&mut contents) {
        debug!(%path, %err, "unable to read manifest entry");
        return None;
    }
    Some(contents)
}

/// Slash-join archive path parts, dropping empty and `.` segments and letting
/// `..` remove the preceding one.
fn join_archive_path(parts: &[&str]) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in parts.iter().flat_map(|part| part.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Render a remapping line: `<prefix>/=<out_dir>/<name>/`.
#[must_use]
pub fn format_remapping(prefix: &str, out_dir: &str, name: &str) -> String {
    format!("{prefix}/={out_dir}/{name}/")
}
