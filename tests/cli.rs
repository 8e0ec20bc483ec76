use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn orgvault(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("orgvault").unwrap();
    cmd.arg("--data-dir").arg(dir).env_remove("RUST_LOG");
    cmd
}

/// Initialized vault with cheap password hashing
fn vault() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{"password": {"memory_cost": 256, "time_cost": 1, "parallelism": 1}}"#,
    )
    .unwrap();
    orgvault(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));
    dir
}

fn stdout(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

/// Value after the first `label:` on each matching line
fn fields(output: &str, label: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix(label))
        .map(|rest| rest.trim().to_string())
        .collect()
}

struct Created {
    org_signature: String,
    owner_id: String,
    owner_signature: String,
}

fn create_acme(dir: &Path) -> Created {
    let out = stdout(orgvault(dir).args([
        "org",
        "create",
        "acme",
        "--owner-name",
        "Ada",
        "--owner-email",
        "ada@acme.test",
        "--owner-public-key",
        "pk-ada",
        "--password",
        "correct horse",
    ]));
    let signatures = fields(&out, "Signature:");
    let ids = fields(&out, "ID:");
    Created {
        org_signature: signatures[0].clone(),
        owner_id: ids[1].clone(),
        owner_signature: signatures[1].clone(),
    }
}

#[test]
fn init_writes_vault_files() {
    let dir = vault();
    assert!(dir.path().join("keys.json").exists());
    assert!(dir.path().join("vault.db").exists());

    orgvault(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn config_shows_paths() {
    let dir = vault();
    orgvault(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("vault.db"))
        .stdout(predicate::str::contains("m=256 t=1 p=1"));
}

#[test]
fn commands_need_a_key_file() {
    let dir = TempDir::new().unwrap();
    orgvault(dir.path())
        .args(["org", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("orgvault init"));
}

#[test]
fn org_create_and_show() {
    let dir = vault();
    let created = create_acme(dir.path());

    orgvault(dir.path())
        .args(["org", "show", "acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Org: acme"))
        .stdout(predicate::str::contains("Ada"))
        .stdout(predicate::str::contains("(owner)"))
        .stdout(predicate::str::contains(created.org_signature.as_str()));

    orgvault(dir.path())
        .args(["user", "show", created.owner_id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("ada@acme.test"))
        .stdout(predicate::str::contains("Active"))
        .stdout(predicate::str::contains("argon2").not());

    // The owner's promotion to Active is the only audit record so far.
    orgvault(dir.path())
        .args(["audit", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("users"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn stale_signature_rejected() {
    let dir = vault();
    let created = create_acme(dir.path());

    let out = stdout(orgvault(dir.path()).args([
        "org",
        "set-status",
        "acme",
        "active",
        "--expected",
        created.org_signature.as_str(),
    ]));
    assert!(out.contains("Audit:"));
    let next = fields(&out, "Signature:")[0].clone();
    assert_ne!(next, created.org_signature);

    orgvault(dir.path())
        .args([
            "org",
            "set-status",
            "acme",
            "inactive",
            "--expected",
            created.org_signature.as_str(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Stale signature"));

    orgvault(dir.path())
        .args(["org", "set-status", "acme", "inactive", "--expected", next.as_str()])
        .assert()
        .success();
}

#[test]
fn unwatched_email_change_leaves_no_audit() {
    let dir = vault();
    let created = create_acme(dir.path());

    orgvault(dir.path())
        .args([
            "user",
            "set-email",
            created.owner_id.as_str(),
            "ada@new.test",
            "--expected",
            created.owner_signature.as_str(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("no watched columns changed"));

    orgvault(dir.path())
        .args(["audit", "list", "--column", "email"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit records found."));
}

#[test]
fn password_change_and_check() {
    let dir = vault();
    let created = create_acme(dir.path());

    orgvault(dir.path())
        .args(["user", "check-password", created.owner_id.as_str(), "--password", "correct horse"])
        .assert()
        .success();

    orgvault(dir.path())
        .args([
            "user",
            "set-password",
            created.owner_id.as_str(),
            "--password",
            "battery staple",
            "--expected",
            created.owner_signature.as_str(),
        ])
        .assert()
        .success();

    orgvault(dir.path())
        .args(["user", "check-password", created.owner_id.as_str(), "--password", "correct horse"])
        .assert()
        .failure();
}

#[test]
fn rotate_and_rekey() {
    let dir = vault();
    create_acme(dir.path());

    orgvault(dir.path())
        .args(["keys", "rotate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rotated key"));

    orgvault(dir.path())
        .args(["keys", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(current)"))
        .stdout(predicate::str::contains("Users on an older key: 1"));

    orgvault(dir.path())
        .args(["keys", "rotate", "--rekey"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rekeyed 1 user(s)"));

    orgvault(dir.path())
        .args(["keys", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Users on an older key: 0"));

    orgvault(dir.path())
        .args(["audit", "list", "--column", "key_version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("key_version"));
}

#[test]
fn audit_export_formats() {
    let dir = vault();
    create_acme(dir.path());

    let json = stdout(orgvault(dir.path()).args(["audit", "export", "--format", "json"]));
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["metadata"]["record_count"], 1);

    orgvault(dir.path())
        .args(["audit", "export", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("insert_order,ctime,audit_table"));

    let file = dir.path().join("trail.yaml");
    orgvault(dir.path())
        .args(["audit", "export", "--format", "yaml", "--output"])
        .arg(&file)
        .assert()
        .success();
    let yaml = std::fs::read_to_string(file).unwrap();
    assert!(yaml.starts_with("# orgvault audit trail export"));
}
