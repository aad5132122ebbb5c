use serde_json::Value;
use tracing::debug;

/// Manifest names that mark a workspace/monorepo umbrella rather than an
/// importable package. Compared case-insensitively.
const PLACEHOLDER_NAMES: &[&str] = &["workspace", "root", "monorepo"];

/// Historical `package.json` names mapped to the prefix sources import today.
const LEGACY_RENAMES: &[(&str, &str)] = &[
    // Tags up to v6 still publish as @rari-capital/solmate; imports use `solmate`.
    ("@rari-capital/solmate", "solmate"),
];

/// Extract a usable import prefix from raw `package.json` bytes.
///
/// Malformed JSON, a root that is not an object, a missing, empty or
/// non-string `name`, and placeholder names all yield `None`. When `name`
/// appears more than once the last occurrence is used.
pub(crate) fn prefix_from_manifest(path: &str, contents: &[u8]) -> Option<String> {
    let manifest: Value = match serde_json::from_slice(contents) {
        Ok(manifest) => manifest,
        Err(err) => {
            debug!(%path, %err, "ignoring malformed manifest");
            return None;
        }
    };
    let Some(fields) = manifest.as_object() else {
        debug!(%path, "ignoring manifest that is not a JSON object");
        return None;
    };
    let name = fields.get("name").and_then(Value::as_str).unwrap_or_default();
    if is_placeholder(name) {
        debug!(%path, %name, "ignoring placeholder manifest name");
        return None;
    }
    Some(canonical_name(name).to_string())
}

#[must_use]
pub fn is_placeholder(name: &str) -> bool {
    if name.is_empty() {
        return true;
    }
    let lower = name.to_lowercase();
    PLACEHOLDER_NAMES.iter().any(|placeholder| *placeholder == lower)
}

/// Apply the legacy rename table. Exact matches only; names without an entry
/// are returned unchanged.
#[must_use]
pub fn canonical_name(name: &str) -> &str {
    LEGACY_RENAMES
        .iter()
        .find(|(legacy, _)| *legacy == name)
        .map_or(name, |&(_, canonical)| canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_detection_ignores_case() {
        for name in [
            "",
            "workspace",
            "Workspace",
            "WORKSPACE",
            "root",
            "Root",
            "monorepo",
            "MONOREPO",
        ] {
            assert!(is_placeholder(name), "{name:?} should be a placeholder");
        }
        for name in [
            "solmate",
            "@openzeppelin/contracts",
            "forge-std",
            "rooted",
            "my-workspace",
        ] {
            assert!(!is_placeholder(name), "{name:?} should not be a placeholder");
        }
    }

    #[test]
    fn legacy_names_are_rewritten_once() {
        assert_eq!(canonical_name("@rari-capital/solmate"), "solmate");
        assert_eq!(canonical_name("solmate"), "solmate");
        assert_eq!(
            canonical_name("@openzeppelin/contracts"),
            "@openzeppelin/contracts"
        );
        assert_eq!(canonical_name("unknown-lib"), "unknown-lib");
        assert_eq!(
            canonical_name(canonical_name("@rari-capital/solmate")),
            canonical_name("@rari-capital/solmate")
        );
    }

    #[test]
    fn legacy_match_is_exact() {
        assert_eq!(
            canonical_name("@rari-capital/solmate-extra"),
            "@rari-capital/solmate-extra"
        );
        assert_eq!(
            canonical_name("@Rari-Capital/solmate"),
            "@Rari-Capital/solmate"
        );
    }

    #[test]
    fn manifest_fields_other_than_name_are_ignored() {
        let contents =
            br#"{"name":"forge-std","version":"1.9.4","files":["src/**/*"],"private":true}"#;
        assert_eq!(
            prefix_from_manifest("package.json", contents).as_deref(),
            Some("forge-std")
        );
    }

    #[test]
    fn unusable_manifests_yield_nothing() {
        let cases: [&[u8]; 10] = [
            b"{not valid json",
            br#"{"name": ""}"#,
            br#"{"version": "1.0.0"}"#,
            br#"{"name": 42}"#,
            br#"{"name": null}"#,
            br#"["name"]"#,
            br#"["@evil/pkg"]"#,
            br#""solmate""#,
            b"null",
            br#"{"name": "Monorepo"}"#,
        ];
        for contents in cases {
            assert_eq!(
                prefix_from_manifest("package.json", contents),
                None,
                "{}",
                String::from_utf8_lossy(contents)
            );
        }
    }

    #[test]
    fn duplicate_name_keys_use_last_value() {
        assert_eq!(
            prefix_from_manifest("package.json", br#"{"name":"a","name":"b"}"#).as_deref(),
            Some("b")
        );
        assert_eq!(
            prefix_from_manifest(
                "package.json",
                br#"{"name":"solady","name":"@rari-capital/solmate"}"#
            )
            .as_deref(),
            Some("solmate")
        );
        assert_eq!(
            prefix_from_manifest("package.json", br#"{"name":"solady","name":"workspace"}"#),
            None
        );
    }
}
