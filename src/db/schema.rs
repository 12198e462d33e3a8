use anyhow::{Context, Result};
use sqlx::SqlitePool;

/// Keyword database tables; `args` holds a JSON array of argument strings
const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS collections (
        collection_id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        type TEXT NOT NULL,
        version TEXT,
        scope TEXT,
        namedargs TEXT,
        path TEXT,
        doc TEXT NOT NULL DEFAULT '',
        doc_format TEXT,
        checksum TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_collections_name ON collections (name)",
    "CREATE INDEX IF NOT EXISTS ix_collections_path ON collections (path)",
    r#"
    CREATE TABLE IF NOT EXISTS keywords (
        keyword_id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        collection_id INTEGER NOT NULL
            REFERENCES collections (collection_id) ON DELETE CASCADE,
        doc TEXT NOT NULL DEFAULT '',
        args TEXT NOT NULL DEFAULT '[]'
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_keywords_name ON keywords (name)",
    "CREATE INDEX IF NOT EXISTS ix_keywords_collection ON keywords (collection_id)",
];

/// Create the keyword tables if they do not exist yet
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to create keyword database tables")?;
    }
    Ok(())
}
