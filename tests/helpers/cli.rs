use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Runs the rfhub binary against a scratch project folder
pub struct CliTestHelper {
    pub temp_dir: TempDir,
    pub project_root: PathBuf,
}

impl CliTestHelper {
    pub fn new() -> Self {
        let temp_dir = tempfile::Builder::new()
            .prefix("rfhub-cli")
            .tempdir()
            .expect("Failed to create temp directory");
        let project_root = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            project_root,
        }
    }

    /// A command running in the project root, isolated from the caller's environment
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("rfhub").unwrap();
        cmd.current_dir(&self.project_root)
            .env_remove("RFHUB_DATABASE_URL")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.project_root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn write_config(&self, content: &str) -> Result<()> {
        self.write_file("rfhub.yaml", content)?;
        Ok(())
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.project_root.join(relative)
    }

    pub fn database_url(&self, name: &str) -> String {
        format!("sqlite://{}", Path::new(&self.project_root).join(name).display())
    }
}

pub fn with_cli_helper<F, R>(test_fn: F) -> R
where
    F: FnOnce(&CliTestHelper) -> R,
{
    let helper = CliTestHelper::new();
    test_fn(&helper)
}
