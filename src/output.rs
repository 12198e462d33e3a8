//! Text and JSON rendering of query results

use anyhow::Result;
use console::style;
use serde::Serialize;
use std::fmt::Write;

use crate::kwdb::{
    Collection, CollectionKeywords, CollectionSummary, Keyword, KeywordEntry, KeywordRow,
    SearchHit,
};
use crate::libdoc::synopsis;

/// Output format for query commands
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output for piping to jq
    Json,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn args_signature(args: &[String]) -> String {
    if args.is_empty() {
        String::new()
    } else {
        format!("({})", args.join(", "))
    }
}

pub fn render_collections(collections: &[CollectionSummary], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(collections);
    }

    let mut out = String::new();
    if collections.is_empty() {
        writeln!(out, "No collections found")?;
        return Ok(out);
    }
    for collection in collections {
        writeln!(
            out,
            "{:>4}  {} {}",
            collection.collection_id,
            style(&collection.name).bold(),
            style(format!("[{}]", collection.collection_type.to_lowercase())).dim()
        )?;
        if !collection.synopsis.is_empty() {
            writeln!(out, "      {}", collection.synopsis)?;
        }
        if let Some(path) = &collection.path {
            writeln!(out, "      {}", style(path).dim())?;
        }
    }
    Ok(out)
}

pub fn render_keywords(keywords: &[KeywordEntry], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(keywords);
    }

    let mut out = String::new();
    if keywords.is_empty() {
        writeln!(out, "No keywords found")?;
        return Ok(out);
    }
    for keyword in keywords {
        writeln!(
            out,
            "{}.{}{}",
            style(&keyword.collection_name).cyan(),
            style(&keyword.name).bold(),
            args_signature(&keyword.args)
        )?;
        let line = synopsis(&keyword.doc);
        if !line.is_empty() {
            writeln!(out, "    {}", line)?;
        }
    }
    Ok(out)
}

pub fn render_hierarchy(libraries: &[CollectionKeywords], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(libraries);
    }

    let mut out = String::new();
    if libraries.is_empty() {
        writeln!(out, "No collections found")?;
        return Ok(out);
    }
    for library in libraries {
        writeln!(
            out,
            "{} {}",
            style(&library.name).bold(),
            style(format!("({} keywords)", library.keywords.len())).dim()
        )?;
        for keyword in &library.keywords {
            writeln!(out, "  • {}", keyword.name)?;
        }
    }
    Ok(out)
}

pub fn render_search(hits: &[SearchHit], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(hits);
    }

    let mut out = String::new();
    if hits.is_empty() {
        writeln!(out, "No matching keywords")?;
        return Ok(out);
    }
    for hit in hits {
        writeln!(
            out,
            "{}.{}",
            style(&hit.collection_name).cyan(),
            style(&hit.name).bold()
        )?;
        if !hit.synopsis.is_empty() {
            writeln!(out, "    {}", hit.synopsis)?;
        }
    }
    writeln!(
        out,
        "\n{} match{}",
        hits.len(),
        if hits.len() == 1 { "" } else { "es" }
    )?;
    Ok(out)
}

#[derive(Serialize)]
struct CollectionDetail<'a> {
    #[serde(flatten)]
    collection: &'a Collection,
    keywords: &'a [KeywordRow],
}

pub fn render_collection(
    collection: &Collection,
    keywords: &[KeywordRow],
    format: OutputFormat,
) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(&CollectionDetail {
            collection,
            keywords,
        });
    }

    let mut out = String::new();
    writeln!(out, "{}", style(&collection.name).bold().underlined())?;
    writeln!(out, "Type:     {}", collection.collection_type)?;
    if let Some(version) = collection.version.as_deref().filter(|v| !v.is_empty()) {
        writeln!(out, "Version:  {}", version)?;
    }
    if let Some(scope) = collection.scope.as_deref().filter(|s| !s.is_empty()) {
        writeln!(out, "Scope:    {}", scope)?;
    }
    if let Some(path) = &collection.path {
        writeln!(out, "Path:     {}", path)?;
    }
    if !collection.doc.is_empty() {
        writeln!(out, "\n{}", collection.doc.trim())?;
    }
    writeln!(out)?;
    for keyword in keywords {
        writeln!(
            out,
            "  {}{}",
            style(&keyword.name).bold(),
            args_signature(&keyword.args)
        )?;
        let line = synopsis(&keyword.doc);
        if !line.is_empty() {
            writeln!(out, "      {}", line)?;
        }
    }
    Ok(out)
}

pub fn render_keyword(keyword: &Keyword, collection_name: &str, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(keyword);
    }

    let mut out = String::new();
    writeln!(
        out,
        "{}.{}",
        style(collection_name).cyan(),
        style(&keyword.name).bold()
    )?;
    if !keyword.args.is_empty() {
        writeln!(out, "Arguments: {}", keyword.args.join(", "))?;
    }
    if !keyword.doc.is_empty() {
        writeln!(out, "\n{}", keyword.doc.trim())?;
    }
    Ok(out)
}
