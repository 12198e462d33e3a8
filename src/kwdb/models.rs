use serde::Serialize;

/// One row of the collections table
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Collection {
    pub collection_id: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub collection_type: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub namedargs: Option<String>,
    pub path: Option<String>,
    pub doc: String,
    pub doc_format: Option<String>,
}

/// Collection listing entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSummary {
    pub collection_id: i64,
    pub name: String,
    pub synopsis: String,
    #[serde(rename = "type")]
    pub collection_type: String,
    pub path: Option<String>,
}

/// A keyword as listed for one collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordRow {
    pub keyword_id: i64,
    pub name: String,
    pub args: Vec<String>,
    pub doc: String,
}

/// A single keyword looked up by name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub name: String,
    pub args: Vec<String>,
    pub doc: String,
    pub collection_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordBrief {
    pub name: String,
    pub doc: String,
}

/// Keywords grouped under their collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionKeywords {
    pub collection_id: i64,
    pub name: String,
    pub path: Option<String>,
    pub keywords: Vec<KeywordBrief>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SearchHit {
    pub collection_id: i64,
    pub collection_name: String,
    pub name: String,
    pub synopsis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct KeywordEntry {
    pub collection_id: i64,
    pub collection_name: String,
    pub name: String,
    pub doc: String,
    pub args: Vec<String>,
}

/// What happened when a watched file changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// No collection is stored under the path
    NotIndexed,
    /// File content is identical to what was indexed
    Unchanged,
    /// Keywords were reloaded; holds the new keyword count
    Reloaded(usize),
    /// The file no longer yields keywords and its collections were dropped
    Removed,
}
