//! `.rfhubignore` exclusion lists
//!
//! One glob per line, `#` starts a comment. A pattern matches either the
//! entry's file name or its path relative to the folder holding the ignore
//! file, so `*.txt` and `drafts/*` both work.

use glob::Pattern;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<Pattern>,
}

impl IgnoreRules {
    /// Read `dir/file_name`; a missing or unreadable file yields no rules
    pub fn load(dir: &Path, file_name: &str) -> Self {
        let ignore_file = dir.join(file_name);
        match std::fs::read_to_string(&ignore_file) {
            Ok(contents) => {
                debug!("Loaded ignore rules from {}", ignore_file.display());
                Self::parse(&contents)
            }
            Err(_) => Self::default(),
        }
    }

    pub fn parse(contents: &str) -> Self {
        let patterns = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| match Pattern::new(line) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Skipping invalid ignore pattern '{}': {}", line, e);
                    None
                }
            })
            .collect();

        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_ignored(&self, dir: &Path, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let relative = path
            .strip_prefix(dir)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| path.to_string_lossy().into_owned());

        self.patterns
            .iter()
            .any(|pattern| pattern.matches(&file_name) || pattern.matches(&relative))
    }
}
