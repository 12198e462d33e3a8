use anyhow::{Context, Result, anyhow, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use super::{LibraryDoc, parse_libdoc_xml};
use crate::config::Libdoc;

static CLASS_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^class\s+([A-Za-z_][A-Za-z0-9_]*)").expect("valid regex"));

/// Runs the external libdoc tool and reads back the XML it writes
#[derive(Debug, Clone)]
pub struct LibdocRunner {
    enabled: bool,
    command: Vec<String>,
}

impl LibdocRunner {
    pub fn new(config: &Libdoc) -> Self {
        Self {
            enabled: config.enabled,
            command: config.command.clone(),
        }
    }

    /// A runner that refuses every request (for resource-only indexing)
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            command: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Document a library name, module path, or `module.Class` target
    pub async fn document(&self, target: &str, python_path: Option<&Path>) -> Result<LibraryDoc> {
        if !self.enabled {
            bail!("libdoc is disabled, cannot document '{}'", target);
        }
        let (program, base_args) = self
            .command
            .split_first()
            .ok_or_else(|| anyhow!("libdoc command is empty"))?;

        let out_dir = tempfile::tempdir().context("Failed to create libdoc output directory")?;
        let out_file = out_dir.path().join("libdoc.xml");

        let mut command = Command::new(program);
        command.args(base_args);
        if let Some(dir) = python_path {
            command.arg("--pythonpath").arg(dir);
        }
        command.arg(target).arg(&out_file);

        debug!("Running libdoc for {}", target);
        let output = command
            .output()
            .await
            .with_context(|| format!("Failed to run libdoc command '{}'", program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            bail!("libdoc failed for '{}': {}", target, message);
        }

        let xml = tokio::fs::read_to_string(&out_file)
            .await
            .with_context(|| format!("libdoc produced no output for '{}'", target))?;
        parse_libdoc_xml(&xml).with_context(|| format!("Unreadable libdoc output for '{}'", target))
    }
}

/// Names of top-level classes defined in a Python module
pub fn class_names(source: &str) -> Vec<String> {
    CLASS_DEF
        .captures_iter(source)
        .map(|caps| caps[1].to_string())
        .collect()
}
