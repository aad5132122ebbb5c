use assert_cmd::cargo::cargo_bin_cmd;

mod common;

use common::{parse_json, stderr, stdout, write_file, write_repo_zip};

#[test]
fn prints_remapping_for_nested_manifest() {
    let temp = tempfile::tempdir().expect("tempdir");
    let zip = write_repo_zip(
        temp.path(),
        "openzeppelin-contracts-5.0.0",
        &[
            ("package.json", r#"{"name": "openzeppelin-solidity"}"#),
            ("contracts/package.json", r#"{"name": "@openzeppelin/contracts"}"#),
        ],
    );

    let assert = cargo_bin_cmd!("please_sol")
        .args(["detect-prefix", "--zip"])
        .arg(&zip)
        .args([
            "--package",
            "contracts",
            "--name",
            "openzeppelin-contracts",
            "--out_dir",
            "third_party/solidity",
        ])
        .assert()
        .success();

    assert_eq!(
        stdout(&assert),
        "@openzeppelin/contracts/=third_party/solidity/openzeppelin-contracts/\n"
    );
}

#[test]
fn legacy_names_and_fallbacks_via_short_flags() {
    let temp = tempfile::tempdir().expect("tempdir");
    let solmate = write_repo_zip(
        temp.path(),
        "solmate-6",
        &[("package.json", r#"{"name": "@rari-capital/solmate"}"#)],
    );
    let assert = cargo_bin_cmd!("please_sol")
        .arg("detect-prefix")
        .arg("-z")
        .arg(&solmate)
        .args(["-p", "src", "-n", "solmate", "-o", "third_party/solidity"])
        .assert()
        .success();
    assert_eq!(stdout(&assert), "solmate/=third_party/solidity/solmate/\n");

    let workspace = write_repo_zip(
        temp.path(),
        "my-lib-1.0.0",
        &[("package.json", r#"{"name": "workspace"}"#)],
    );
    let assert = cargo_bin_cmd!("please_sol")
        .arg("detect-prefix")
        .arg("-z")
        .arg(&workspace)
        .args(["-p", "src", "-n", "my-lib", "-o", "third_party/solidity"])
        .assert()
        .success();
    assert_eq!(stdout(&assert), "my-lib/=third_party/solidity/my-lib/\n");
}

#[test]
fn json_output_reports_source() {
    let temp = tempfile::tempdir().expect("tempdir");
    let zip = write_repo_zip(
        temp.path(),
        "some-lib-1.0.0",
        &[("src/Lib.sol", "// solidity code")],
    );

    let assert = cargo_bin_cmd!("please_sol")
        .arg("detect-prefix")
        .arg("--zip")
        .arg(&zip)
        .args(["--package", "src", "--name", "some-lib", "--out_dir", "vendor", "--json"])
        .assert()
        .success();

    let payload = parse_json(&assert);
    assert_eq!(payload["prefix"], "some-lib");
    assert_eq!(payload["source"], "fallback");
    assert_eq!(payload["remapping"], "some-lib/=vendor/some-lib/");
}

#[test]
fn unreadable_archive_fails() {
    let temp = tempfile::tempdir().expect("tempdir");
    let bogus = write_file(temp.path(), "bogus.zip", "not a zip");

    let assert = cargo_bin_cmd!("please_sol")
        .arg("detect-prefix")
        .arg("--zip")
        .arg(&bogus)
        .args(["--package", "src", "--name", "bogus", "--out_dir", "vendor"])
        .assert()
        .failure();

    assert!(stdout(&assert).is_empty());
    let err = stderr(&assert);
    assert!(err.contains("failed to detect import prefix"), "{err}");

    cargo_bin_cmd!("please_sol")
        .arg("detect-prefix")
        .arg("--zip")
        .arg(temp.path().join("missing.zip"))
        .args(["--package", "src", "--name", "missing", "--out_dir", "vendor"])
        .assert()
        .failure();
}

#[test]
fn verbose_logging_stays_off_stdout() {
    let temp = tempfile::tempdir().expect("tempdir");
    let zip = write_repo_zip(
        temp.path(),
        "solady-0.0.227",
        &[("package.json", r#"{"name": "solady"}"#)],
    );

    let assert = cargo_bin_cmd!("please_sol")
        .arg("-vv")
        .arg("detect-prefix")
        .arg("--zip")
        .arg(&zip)
        .args(["--package", "src", "--name", "solady", "--out_dir", "third_party/solidity"])
        .env_remove("PSOL_LOG")
        .assert()
        .success();

    assert_eq!(stdout(&assert), "solady/=third_party/solidity/solady/\n");
    assert!(
        stderr(&assert).contains("import prefix from manifest"),
        "expected info log on stderr"
    );
}
