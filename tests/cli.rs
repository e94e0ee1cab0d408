//! End-to-end tests driving the binary over the sandboxed local transport

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ARCHIVE: &str = "/var/lib/flashback";

struct Fleet {
    temp: TempDir,
}

impl Fleet {
    fn new() -> Self {
        let fleet = Self {
            temp: TempDir::new().unwrap(),
        };
        fleet.write("web01", "/etc/passwd", "root:x:0:0:root:/root:/bin/bash\n");
        fleet.write("web01", "/etc/group", "root:x:0:\n");
        fleet
    }

    fn root(&self) -> PathBuf {
        self.temp.path().join("fleet")
    }

    fn local(&self, host: &str, path: &str) -> PathBuf {
        self.root().join(host).join(path.trim_start_matches('/'))
    }

    fn write(&self, host: &str, path: &str, contents: &str) {
        let local = self.local(host, path);
        fs::create_dir_all(local.parent().unwrap()).unwrap();
        fs::write(local, contents).unwrap();
    }

    fn read(&self, host: &str, path: &str) -> String {
        fs::read_to_string(self.local(host, path)).unwrap()
    }

    fn config_dir(&self) -> PathBuf {
        self.temp.path().join("config")
    }

    /// `flashback <subcommand>` aimed at the sandbox with the given hosts
    fn cmd(&self, subcommand: &str, hosts: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("flashback").unwrap();
        cmd.env("FLASHBACK_CONFIG_DIR", self.config_dir())
            .env("NO_COLOR", "1")
            .env_remove("FLASHBACK_LOG")
            .arg(subcommand)
            .arg("--local-root")
            .arg(self.root())
            .args(["-D", ARCHIVE, "-F", "/etc/passwd", "-F", "/etc/group"]);
        for host in hosts {
            cmd.args(["-H", host]);
        }
        cmd
    }
}

fn today() -> String {
    chrono::Local::now().format("%Y%m%d").to_string()
}

fn snapshot(file: &str) -> String {
    format!("{}/{}/{}", ARCHIVE, today(), file)
}

fn exists(path: &Path) -> bool {
    path.exists()
}

#[test]
fn archive_then_rerun_skips() {
    let fleet = Fleet::new();

    fleet
        .cmd("archive", &["web01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 copied"));
    assert_eq!(
        fleet.read("web01", &snapshot("passwd")),
        "root:x:0:0:root:/root:/bin/bash\n"
    );

    fleet
        .cmd("archive", &["web01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 skipped"));
}

#[test]
fn diff_reports_changes_against_live_file() {
    let fleet = Fleet::new();
    fleet.cmd("archive", &["web01"]).assert().success();

    fleet
        .cmd("diff", &["web01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("identical"));

    fleet.write(
        "web01",
        "/etc/passwd",
        "root:x:0:0:root:/root:/bin/bash\nalice:x:1000:1000::/home/alice:/bin/sh\n",
    );
    fleet
        .cmd("diff", &["web01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+alice:x:1000:1000"))
        .stdout(predicate::str::contains("+++ /etc/passwd (current)"));
}

#[test]
fn diff_without_snapshot_fails_only_that_host() {
    let fleet = Fleet::new();
    fleet.write("web02", "/etc/passwd", "root:x:0:0\n");
    fleet.write("web02", "/etc/group", "root:x:0:\n");
    fleet.cmd("archive", &["web01"]).assert().success();

    fleet
        .cmd("diff", &["web01", "web02"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("web01"))
        .stdout(predicate::str::contains("failed"))
        .stdout(predicate::str::contains("2 identical"));
}

#[test]
fn diff_rejects_bad_date() {
    let fleet = Fleet::new();
    fleet
        .cmd("diff", &["web01"])
        .args(["-a", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("yesterday"));
}

#[test]
fn recover_dry_run_then_for_real() {
    let fleet = Fleet::new();
    fleet.cmd("archive", &["web01"]).assert().success();
    fleet.write("web01", "/etc/passwd", "corrupted\n");

    fleet
        .cmd("recover", &["web01"])
        .args(["-n", "-c", "touch restarted"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"))
        .stdout(predicate::str::contains("simulated"));
    assert_eq!(fleet.read("web01", "/etc/passwd"), "corrupted\n");
    assert!(!exists(&fleet.local("web01", "/restarted")));

    fleet
        .cmd("recover", &["web01"])
        .args(["-c", "touch restarted"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 restored, 1 executed"));
    assert_eq!(
        fleet.read("web01", "/etc/passwd"),
        "root:x:0:0:root:/root:/bin/bash\n"
    );
    assert!(exists(&fleet.local("web01", "/restarted")));
}

#[test]
fn recover_on_success_policy_skips_command() {
    let fleet = Fleet::new();

    fleet
        .cmd("recover", &["web01"])
        .args(["-r", "20200101", "-c", "touch restarted"])
        .args(["--post-recover-policy", "on-success"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("2 failed, 1 skipped"));
    assert!(!exists(&fleet.local("web01", "/restarted")));
}

#[test]
fn report_lists_snapshots_per_host() {
    let fleet = Fleet::new();
    fleet.write("web01", &format!("{}/20200101/passwd", ARCHIVE), "old\n");
    fleet.write("web01", &format!("{}/stray.txt", ARCHIVE), "x\n");

    fleet
        .cmd("report", &["web01", "web02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("web01\n  20200101: passwd\n"))
        .stdout(predicate::str::contains("web02\n  (no archives)\n"));

    let output = fleet
        .cmd("report", &["web01"])
        .args(["--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["web01"]["20200101"][0], "passwd");
}

#[test]
fn purge_requires_confirmation() {
    let fleet = Fleet::new();
    fleet.cmd("archive", &["web01"]).assert().success();
    let archive = fleet.local("web01", ARCHIVE);

    fleet
        .cmd("purge", &["web01"])
        .write_stdin("no\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("was not removed"));
    assert!(exists(&archive));

    fleet
        .cmd("purge", &["web01"])
        .write_stdin("yes\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("purged"));
    assert!(!exists(&archive));

    // Nothing left to remove is still a success
    fleet
        .cmd("purge", &["web01"])
        .arg("--yes")
        .assert()
        .success();
}

#[test]
fn missing_hosts_is_an_error() {
    let fleet = Fleet::new();
    fleet
        .cmd("archive", &[])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no hosts given"));
}

#[test]
fn journal_records_outcomes() {
    let fleet = Fleet::new();
    fleet.cmd("archive", &["web01"]).assert().success();

    let mut journal = Command::cargo_bin("flashback").unwrap();
    journal
        .env("FLASHBACK_CONFIG_DIR", fleet.config_dir())
        .env("NO_COLOR", "1")
        .args(["journal", "-l", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("archive web01 passwd: copied"))
        .stdout(predicate::str::contains("archive web01 group: copied"));
}

#[test]
fn config_shows_paths() {
    let fleet = Fleet::new();
    let mut config = Command::cargo_bin("flashback").unwrap();
    config
        .env("FLASHBACK_CONFIG_DIR", fleet.config_dir())
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/root/.flashback"));
    assert!(fleet.config_dir().join("config.json").exists());
}
