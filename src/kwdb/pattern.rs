//! Glob-style patterns and search query parsing
//!
//! Users type shell-like wildcards (`*`, `?`); the database speaks SQL `LIKE`.
//! Every translated pattern is meant to be bound into a
//! `... LIKE ? ESCAPE '\'` clause.

use serde::Serialize;

/// How a search pattern is matched against keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Match keyword names only
    Name,
    /// Match keyword names and documentation
    #[default]
    Both,
}

/// Convert glob-like wildcards to a SQL `LIKE` pattern
///
/// * `*` becomes `%`, `?` becomes `_`
/// * literal `%` and `_` are escaped
/// * `\\`, `\*` and `\?` stay escaped
/// * `\^` and `\$` are a literal `^` and `$`
///
/// The result is wrapped in `%...%` unless the pattern begins with `^`
/// or ends with an unescaped `$`, which anchor the match at that end.
pub fn glob_to_sql(pattern: &str) -> String {
    let (anchored_start, rest) = match pattern.strip_prefix('^') {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };
    let (anchored_end, body) = match rest.strip_suffix('$') {
        Some(body) if trailing_backslashes(body) % 2 == 0 => (true, body),
        _ => (false, rest),
    };

    let mut out = String::with_capacity(body.len() + 2);
    if !anchored_start {
        out.push('%');
    }

    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(&next @ ('\\' | '*' | '?')) = chars.peek() {
                    chars.next();
                    out.push('\\');
                    out.push(next);
                } else if let Some(&next @ ('^' | '$')) = chars.peek() {
                    chars.next();
                    out.push(next);
                } else {
                    // a lone backslash is just a backslash
                    out.push_str("\\\\");
                }
            }
            '%' => out.push_str("\\%"),
            '_' => out.push_str("\\_"),
            '*' => out.push('%'),
            '?' => out.push('_'),
            other => out.push(other),
        }
    }

    if !anchored_end {
        out.push('%');
    }
    out
}

fn trailing_backslashes(text: &str) -> usize {
    text.chars().rev().take_while(|&c| c == '\\').count()
}

/// A parsed search box query
///
/// `name:` at the start limits matching to keyword names, and an
/// `in:<collection>` token limits results to one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub pattern: String,
    pub mode: SearchMode,
    pub collection: Option<String>,
}

impl SearchQuery {
    pub fn parse(text: &str) -> Self {
        Self::parse_with_mode(text, SearchMode::Both)
    }

    pub fn parse_with_mode(text: &str, mode: SearchMode) -> Self {
        let mut text = text.trim();
        let mut mode = mode;

        if let Some(rest) = text.strip_prefix("name:") {
            mode = SearchMode::Name;
            text = rest.trim_start();
        }

        let mut collection = None;
        let mut words = Vec::new();
        for word in text.split_whitespace() {
            match word.strip_prefix("in:") {
                Some(name) if !name.is_empty() => collection = Some(name.to_string()),
                _ => words.push(word),
            }
        }

        let pattern = if words.is_empty() {
            "*".to_string()
        } else {
            words.join(" ")
        };

        Self {
            pattern,
            mode,
            collection,
        }
    }

    pub fn sql_pattern(&self) -> String {
        glob_to_sql(&self.pattern)
    }
}
