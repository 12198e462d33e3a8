//! Keyword documentation for one collection
//!
//! A [`LibraryDoc`] is what every source is reduced to before it reaches the
//! database, whether it came from a resource file, a libdoc XML spec, or the
//! external libdoc tool.

pub mod resource;
pub mod runner;
pub mod xml;

pub use resource::parse_resource;
pub use runner::LibdocRunner;
pub use xml::parse_libdoc_xml;

use serde::Serialize;

use crate::constants::RESOURCE_DOC_PLACEHOLDER;

pub const TYPE_LIBRARY: &str = "LIBRARY";
pub const TYPE_RESOURCE: &str = "RESOURCE";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryDoc {
    pub name: String,
    pub doc_type: String,
    pub doc: String,
    pub version: String,
    pub scope: String,
    pub named_args: String,
    pub doc_format: String,
    pub keywords: Vec<KeywordDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordDoc {
    pub name: String,
    pub doc: String,
    pub args: Vec<String>,
}

impl LibraryDoc {
    pub fn new(name: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc_type: doc_type.into(),
            doc: String::new(),
            version: "unknown".to_string(),
            scope: String::new(),
            named_args: "yes".to_string(),
            doc_format: "ROBOT".to_string(),
            keywords: Vec::new(),
        }
    }

    /// Drop the text libdoc invents for undocumented resource files
    pub fn strip_placeholder_doc(&mut self) {
        if self.doc.starts_with(RESOURCE_DOC_PLACEHOLDER) {
            self.doc.clear();
        }
    }

    pub fn has_keywords(&self) -> bool {
        !self.keywords.is_empty()
    }
}

/// First line of a documentation string
pub fn synopsis(doc: &str) -> String {
    doc.trim().lines().next().unwrap_or("").to_string()
}
