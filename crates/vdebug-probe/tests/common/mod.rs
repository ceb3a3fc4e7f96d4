//! Fake editor harness for CLI tests
//!
//! The binary is pointed at `tests/fixtures/fake-vim`, a shell script that
//! answers remote requests from files in a per-test temp directory.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

pub const SERVERNAME: &str = "TEST";

pub const GUI_LISTING: &str = "      1  a   \"[No Name]\"                    line 1
      2 %a   \"~/.vim/bundle/vdebug/tmpspace/test.php\" line 2
      3  a   \"DebuggerWatch\"                line 0
      4  a   \"DebuggerStack\"                line 0
      5  a   \"DebuggerStatus\"               line 0
";

pub const NO_NAME_LISTING: &str = "      1  a   \"[No Name]\"                    line 1\n";

pub fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// A scripted editor server, isolated per test.
pub struct FakeEditor {
    dir: TempDir,
    script: PathBuf,
}

impl FakeEditor {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let script = fixtures_path().join("fake-vim");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake-vim executable");
        Self { dir, script }
    }

    /// A fake editor with the debugger windows open and a connected session.
    pub fn running() -> Self {
        let editor = Self::new();
        editor.set_buffers(GUI_LISTING);
        editor.set_status("running");
        editor
    }

    fn write(&self, file: &str, contents: &str) {
        fs::write(self.dir.path().join(file), contents).expect("Failed to write fixture");
    }

    pub fn set_buffers(&self, listing: &str) {
        self.write("buffers.txt", listing);
    }

    pub fn set_status(&self, status: &str) {
        self.write("status.txt", status);
    }

    pub fn set_buffer_content(&self, id: u32, content: &str) {
        self.write(&format!("buffer-{}.txt", id), content);
    }

    /// Every request fails as if no server had registered under the name.
    pub fn make_unreachable(&self) {
        self.write("unreachable", "");
    }

    /// Requests as `"<flag> <argument>"`, in the order received.
    pub fn requests(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("requests.log"))
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    pub fn cli_command(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vdebug-probe"));
        cmd.env("FAKE_VIM_DIR", self.dir.path())
            .env("VDEBUG_PROBE_VIM", &self.script)
            .env("VDEBUG_PROBE_SERVERNAME", SERVERNAME)
            .env("VDEBUG_PROBE_SETTLE_MS", "0")
            .env("VDEBUG_PROBE_POLL_MS", "0")
            .env("NO_COLOR", "1")
            .env_remove("VDEBUG_PROBE_STATUS_CMD")
            .env_remove("VDEBUG_PROBE_CONNECTED_TOKEN")
            .env_remove("VDEBUG_PROBE_POLL_ATTEMPTS")
            .env_remove("VDEBUG_PROBE_LOG")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.cli_command().args(args).assert()
    }

    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .cli_command()
            .arg("--json")
            .args(args)
            .output()
            .expect("Failed to run vdebug-probe");
        assert!(
            output.status.success(),
            "vdebug-probe {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
    }
}
