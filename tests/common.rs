use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const SETTINGS_ENV: [&str; 5] = [
    "SETUP_RUST_TOOLCHAIN",
    "SETUP_RUST_COMPONENTS",
    "SETUP_RUST_PROFILE",
    "SETUP_RUST_DEST",
    "SETUP_RUST_MODE",
];

// Each test binary pulls in only some of these helpers.
#[allow(dead_code)]
pub struct TestContext {
    pub temp_dir: TempDir,
    pub config_path: PathBuf,
    pub bin_path: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.json");
        let bin_path = PathBuf::from(env!("CARGO_BIN_EXE_setup-rust"));

        Self {
            temp_dir,
            config_path,
            bin_path,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Command running in the temp dir with no settings leaking in from the host.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(&self.bin_path);
        cmd.current_dir(self.temp_dir.path());
        cmd.env("SETUP_RUST_CONFIG", &self.config_path);
        cmd.env_remove("RUST_LOG");
        for key in SETTINGS_ENV {
            cmd.env_remove(key);
        }
        cmd
    }

    pub fn run(&self, args: &[&str]) -> CommandOutput {
        self.cmd()
            .args(args)
            .output()
            .expect("Failed to run setup-rust")
            .into()
    }
}

#[allow(dead_code)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }
}

#[allow(dead_code)]
impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        if !self.status.success() {
            panic!(
                "Command failed with status {:?}\nstdout: {}\nstderr: {}",
                self.status.code(),
                self.stdout,
                self.stderr
            );
        }
        self
    }

    pub fn assert_failure(&self) -> &Self {
        if self.status.success() {
            panic!(
                "Command unexpectedly succeeded\nstdout: {}\nstderr: {}",
                self.stdout, self.stderr
            );
        }
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Stdout did not contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Stderr did not contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}
