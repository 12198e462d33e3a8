//! Robot Framework resource files (space, pipe and tab separated)

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use super::{KeywordDoc, LibraryDoc, TYPE_RESOURCE};

static SPACE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\t| {2,}|\u{a0}{2,}").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Settings,
    Keywords,
    Other,
}

/// Which multi-row setting a `...` row continues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Continues {
    ResourceDoc,
    KeywordDoc,
    KeywordArgs,
}

fn section_for(header: &str) -> Section {
    let name = header
        .trim_matches(|c: char| c == '*' || c.is_whitespace())
        .to_lowercase();
    match name.as_str() {
        "setting" | "settings" => Section::Settings,
        "keyword" | "keywords" | "user keyword" | "user keywords" => Section::Keywords,
        _ => Section::Other,
    }
}

/// Split one line into cells, keeping an empty first cell for indented rows
fn split_cells(line: &str, tab_separated: bool) -> Vec<String> {
    let line = line.trim_end_matches(['\r', '\n']);

    let cells: Vec<String> = if tab_separated {
        line.split('\t').map(|c| c.trim().to_string()).collect()
    } else if line.starts_with("| ") || line == "|" {
        let inner = line[1..].trim_end();
        let inner = inner.strip_suffix(" |").unwrap_or(inner);
        inner.split(" | ").map(|c| c.trim().to_string()).collect()
    } else {
        let trimmed = line.trim_end();
        let mut cells: Vec<String> = SPACE_SEPARATOR
            .split(trimmed)
            .map(|c| c.trim().to_string())
            .collect();
        // a single leading space still marks an indented row
        if trimmed.starts_with(' ') && cells.first().is_some_and(|c| !c.is_empty()) {
            cells.insert(0, String::new());
        }
        cells
    };

    // everything from a comment cell onwards is dropped
    let mut cells: Vec<String> = cells
        .into_iter()
        .take_while(|c| !c.starts_with('#'))
        .collect();
    while cells.len() > 1 && cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

fn is_setting(cell: &str, name: &str) -> bool {
    cell.trim_end_matches(':').eq_ignore_ascii_case(name)
}

fn push_doc_row(doc: &mut String, cells: &[String], new_line: bool) {
    let row = cells.join(" ");
    if new_line && !doc.is_empty() {
        doc.push('\n');
    } else if !new_line && !doc.is_empty() && !row.is_empty() {
        doc.push(' ');
    }
    doc.push_str(&row);
}

/// Parse the keywords and file documentation out of a resource file
pub fn parse_resource(path: &Path, text: &str) -> LibraryDoc {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tab_separated = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));

    let mut library = LibraryDoc::new(name, TYPE_RESOURCE);
    library.version = String::new();

    let mut section = Section::Other;
    let mut continues: Option<Continues> = None;
    let mut current: Option<KeywordDoc> = None;

    for line in text.lines() {
        let cells = split_cells(line, tab_separated);
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }

        if cells[0].starts_with('*') {
            section = section_for(&cells.join(" "));
            continues = None;
            if let Some(done) = current.take() {
                library.keywords.push(done);
            }
            continue;
        }

        match section {
            Section::Settings => {
                let first = cells[0].as_str();
                if first == "..." {
                    if continues == Some(Continues::ResourceDoc) {
                        push_doc_row(&mut library.doc, &cells[1..], true);
                    }
                } else if is_setting(first, "Documentation") {
                    push_doc_row(&mut library.doc, &cells[1..], false);
                    continues = Some(Continues::ResourceDoc);
                } else {
                    continues = None;
                }
            }
            Section::Keywords => {
                let body: &[String] = if cells[0] == "..." {
                    &cells
                } else if cells[0].is_empty() {
                    &cells[1..]
                } else {
                    if let Some(done) = current.take() {
                        library.keywords.push(done);
                    }
                    current = Some(KeywordDoc {
                        name: cells[0].clone(),
                        doc: String::new(),
                        args: Vec::new(),
                    });
                    continues = None;
                    &cells[1..]
                };

                let Some(keyword) = current.as_mut() else {
                    continue;
                };
                let Some(first) = body.first() else {
                    continue;
                };

                if first == "..." {
                    match continues {
                        Some(Continues::KeywordDoc) => {
                            push_doc_row(&mut keyword.doc, &body[1..], true)
                        }
                        Some(Continues::KeywordArgs) => keyword
                            .args
                            .extend(body[1..].iter().filter(|c| !c.is_empty()).cloned()),
                        _ => {}
                    }
                } else if first.eq_ignore_ascii_case("[Documentation]") {
                    push_doc_row(&mut keyword.doc, &body[1..], false);
                    continues = Some(Continues::KeywordDoc);
                } else if first.eq_ignore_ascii_case("[Arguments]") {
                    keyword
                        .args
                        .extend(body[1..].iter().filter(|c| !c.is_empty()).cloned());
                    continues = Some(Continues::KeywordArgs);
                } else {
                    continues = None;
                }
            }
            Section::Other => {}
        }
    }

    if let Some(done) = current.take() {
        library.keywords.push(done);
    }
    library
}
