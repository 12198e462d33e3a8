//! Cheap sniffing of files before a full parse

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::constants::{IGNORED_LIBRARY_NAMES, LIBDOC_SNIFF_BYTES};

static INIT_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__init__\.(txt|robot|html|tsv)$").expect("valid regex"));

static TABLE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^(?:\|\s*)?\*+\s*(Test Cases?|(?:User )?Keywords?)").expect("valid regex")
});

/// What kind of keyword source a file is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Robot resource file with a keyword table
    Resource,
    /// libdoc XML spec
    Libdoc,
    /// Python keyword library
    Library,
}

/// Classify a file, returning None when it holds no keywords we know how to read
pub fn classify(path: &Path) -> Result<Option<SourceKind>> {
    if looks_like_resource_file(path)? {
        Ok(Some(SourceKind::Resource))
    } else if looks_like_libdoc_file(path)? {
        Ok(Some(SourceKind::Libdoc))
    } else if looks_like_library_file(path) {
        Ok(Some(SourceKind::Library))
    } else {
        Ok(None)
    }
}

fn lower_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

pub fn looks_like_library_file(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".py")
}

/// True if an .xml file starts like a libdoc spec
pub fn looks_like_libdoc_file(path: &Path) -> Result<bool> {
    if lower_extension(path).as_deref() != Some("xml") {
        return Ok(false);
    }

    let file =
        fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut head = Vec::with_capacity(LIBDOC_SNIFF_BYTES);
    file.take(LIBDOC_SNIFF_BYTES as u64)
        .read_to_end(&mut head)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let head = String::from_utf8_lossy(&head).to_lowercase();
    Ok(head.find("<keywordspec ").is_some_and(|index| index > 0))
}

/// True if the file has a keyword table but no test case table
pub fn looks_like_resource_file(path: &Path) -> Result<bool> {
    let name = path.to_string_lossy();
    if INIT_FILE.is_match(&name) {
        return Ok(false);
    }

    if !matches!(lower_extension(path).as_deref(), Some("robot" | "txt" | "tsv")) {
        return Ok(false);
    }

    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(is_resource_text(&String::from_utf8_lossy(&bytes)))
}

/// Header scan shared with tests; see [`looks_like_resource_file`]
pub fn is_resource_text(text: &str) -> bool {
    let mut found_keyword_table = false;
    for caps in TABLE_HEADER.captures_iter(text) {
        let table = caps[1].to_ascii_lowercase();
        if table.starts_with("test case") {
            return false;
        }
        found_keyword_table = true;
    }
    found_keyword_table
}

/// True for modules in the robot libraries folder that are not libraries
pub fn should_ignore_library(name: &str) -> bool {
    let name = name.to_lowercase();
    name.starts_with("deprecated")
        || name.starts_with('_')
        || IGNORED_LIBRARY_NAMES.contains(&name.as_str())
}
