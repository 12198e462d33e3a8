//! Keyword database
//!
//! [`KeywordTable`] stores keyword *collections* (libraries and resource
//! files) and their keywords in SQLite and answers the lookups the hub needs:
//! collection listings, per-collection keyword lists, single keyword lookup,
//! and glob-style search over names and documentation.
//!
//! Sources are reduced to a [`LibraryDoc`] first. Resource files and libdoc
//! XML are parsed in-process; Python libraries go through the external libdoc
//! tool via [`LibdocRunner`].

pub mod classify;
pub mod folder;
pub mod models;
pub mod pattern;

pub use classify::SourceKind;
pub use models::*;
pub use pattern::{SearchMode, SearchQuery, glob_to_sql};

use anyhow::{Context, Result, anyhow};
use itertools::Itertools;
use sqlx::{Row, SqliteExecutor, SqlitePool};
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use tracing::{debug, info, warn};

use crate::constants::{IGNORE_FILENAME, STANDARD_LIBRARIES};
use crate::db::{connect_to_database, ensure_schema};
use crate::libdoc::runner::class_names;
use crate::libdoc::{LibdocRunner, LibraryDoc, parse_libdoc_xml, parse_resource, synopsis};

/// Abstraction over the database of keywords
pub struct KeywordTable {
    pool: SqlitePool,
    libdoc: LibdocRunner,
    ignore_file: String,
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Failed to resolve {}", path.display()))
}

fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn decode_args(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Stored keyword arguments are not a JSON list ({}): {}", e, raw);
        Vec::new()
    })
}

async fn insert_collection<'e, E: SqliteExecutor<'e>>(
    executor: E,
    path: Option<&str>,
    doc: &LibraryDoc,
    checksum: Option<&str>,
) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO collections (name, type, version, scope, namedargs, path, doc, doc_format, checksum)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&doc.name)
    .bind(&doc.doc_type)
    .bind(&doc.version)
    .bind(&doc.scope)
    .bind(&doc.named_args)
    .bind(path)
    .bind(&doc.doc)
    .bind(&doc.doc_format)
    .bind(checksum)
    .execute(executor)
    .await
    .with_context(|| format!("Failed to store collection {}", doc.name))?;

    Ok(result.last_insert_rowid())
}

/// Insert one keyword; `args` is stored as a JSON list
async fn insert_keyword<'e, E: SqliteExecutor<'e>>(
    executor: E,
    collection_id: i64,
    name: &str,
    doc: &str,
    args: &[String],
) -> Result<()> {
    let args = serde_json::to_string(args)?;
    sqlx::query("INSERT INTO keywords (collection_id, name, doc, args) VALUES (?, ?, ?, ?)")
        .bind(collection_id)
        .bind(name)
        .bind(doc)
        .bind(args)
        .execute(executor)
        .await
        .with_context(|| format!("Failed to store keyword {}", name))?;
    Ok(())
}

async fn insert_keywords(
    tx: &mut sqlx::SqliteConnection,
    collection_id: i64,
    doc: &LibraryDoc,
) -> Result<()> {
    for keyword in &doc.keywords {
        insert_keyword(&mut *tx, collection_id, &keyword.name, &keyword.doc, &keyword.args).await?;
    }
    Ok(())
}

async fn delete_collection(tx: &mut sqlx::SqliteConnection, collection_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM keywords WHERE collection_id = ?")
        .bind(collection_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM collections WHERE collection_id = ?")
        .bind(collection_id)
        .execute(&mut *tx)
        .await?;
    Ok(())
}

impl KeywordTable {
    /// Open (or create) the database at `url`
    pub async fn open(url: &str, libdoc: LibdocRunner) -> Result<Self> {
        let pool = connect_to_database(url).await?;
        Self::new(pool, libdoc).await
    }

    pub async fn new(pool: SqlitePool, libdoc: LibdocRunner) -> Result<Self> {
        ensure_schema(&pool).await?;
        Ok(Self {
            pool,
            libdoc,
            ignore_file: IGNORE_FILENAME.to_string(),
        })
    }

    pub fn with_ignore_file(mut self, name: impl Into<String>) -> Self {
        self.ignore_file = name.into();
        self
    }

    /// Add a folder, library file, resource file, libdoc file, or library name
    ///
    /// Returns the ids of the collections that were stored.
    pub async fn add(&self, name: &str) -> Result<Vec<i64>> {
        let path = Path::new(name);

        if path.is_dir() {
            if folder::is_hidden(path) {
                debug!("Skipping hidden folder {}", path.display());
                return Ok(Vec::new());
            }
            Ok(self.add_folder(path).await)
        } else if path.is_file() {
            match classify::classify(path)? {
                Some(kind) => self.add_file_of_kind(path, kind).await,
                None => {
                    debug!("{} holds no keywords, skipping", path.display());
                    Ok(Vec::new())
                }
            }
        } else {
            // let's hope it's a library name
            Ok(self.add_library(name).await?.into_iter().collect())
        }
    }

    /// Add a resource file, libdoc file, or library file
    pub async fn add_file(&self, path: &Path) -> Result<Vec<i64>> {
        let kind = classify::classify(path)?.ok_or_else(|| {
            anyhow!(
                "{} is not a resource file, libdoc file or library file",
                path.display()
            )
        })?;
        self.add_file_of_kind(path, kind).await
    }

    async fn add_file_of_kind(&self, path: &Path, kind: SourceKind) -> Result<Vec<i64>> {
        let path = absolute(path)?;
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let checksum = format!("{:x}", md5::compute(&bytes));

        let mut ids = Vec::new();
        let doc = self.document_file(&path, kind, &bytes).await?;
        if doc.has_keywords() {
            let id = self
                .store(Some(&path_key(&path)), &doc, Some(&checksum))
                .await?;
            info!(
                "Indexed {} ({} keywords) from {}",
                doc.name,
                doc.keywords.len(),
                path.display()
            );
            ids.push(id);
        } else {
            debug!("No keywords in {}", path.display());
        }

        if kind == SourceKind::Library {
            ids.extend(self.add_library_classes(&path, &bytes).await);
        }

        Ok(ids)
    }

    /// Libraries implemented as classes are documented as `module.Class`
    async fn add_library_classes(&self, path: &Path, bytes: &[u8]) -> Vec<i64> {
        let (Some(stem), Some(parent)) = (path.file_stem(), path.parent()) else {
            return Vec::new();
        };
        let stem = stem.to_string_lossy();
        let source = String::from_utf8_lossy(bytes);

        let mut ids = Vec::new();
        for class_name in class_names(&source) {
            if class_name.starts_with('_') {
                continue;
            }
            let target = format!("{}.{}", stem, class_name);
            match self.add_library_with_path(&target, Some(parent)).await {
                Ok(Some(id)) => ids.push(id),
                Ok(None) => {}
                Err(e) => debug!("Unable to document {}: {:#}", target, e),
            }
        }
        ids
    }

    async fn document_file(&self, path: &Path, kind: SourceKind, bytes: &[u8]) -> Result<LibraryDoc> {
        let mut doc = match kind {
            SourceKind::Resource => parse_resource(path, &String::from_utf8_lossy(bytes)),
            SourceKind::Libdoc => parse_libdoc_xml(&String::from_utf8_lossy(bytes))
                .with_context(|| format!("Failed to parse libdoc file {}", path.display()))?,
            SourceKind::Library => self.libdoc.document(&path_key(path), None).await?,
        };
        doc.strip_placeholder_doc();
        Ok(doc)
    }

    /// Add a library by name (eg: "BuiltIn") rather than by file
    pub async fn add_library(&self, name: &str) -> Result<Option<i64>> {
        self.add_library_with_path(name, None).await
    }

    async fn add_library_with_path(&self, name: &str, python_path: Option<&Path>) -> Result<Option<i64>> {
        let mut doc = self.libdoc.document(name, python_path).await?;
        doc.strip_placeholder_doc();
        if !doc.has_keywords() {
            debug!("Library {} has no keywords", name);
            return Ok(None);
        }
        let id = self.store(None, &doc, None).await?;
        info!("Indexed library {} ({} keywords)", doc.name, doc.keywords.len());
        Ok(Some(id))
    }

    /// Add a file or folder that appeared below the indexed folder `root`
    ///
    /// Ignore files from `root` down to `path` apply, as they would when
    /// indexing `root` itself.
    pub async fn add_below(&self, root: &Path, path: &Path) -> Result<Vec<i64>> {
        let Some(inherited) = folder::inherited_rules(root, path, &self.ignore_file) else {
            debug!("{} is ignored below {}", path.display(), root.display());
            return Ok(Vec::new());
        };

        if path.is_dir() {
            if folder::is_hidden(path) {
                debug!("Skipping hidden folder {}", path.display());
                return Ok(Vec::new());
            }
            let files = folder::discover_files_with(path, &self.ignore_file, inherited);
            Ok(self.add_discovered(files).await)
        } else if path.is_file() {
            self.add(&path.to_string_lossy()).await
        } else {
            debug!("{} is gone", path.display());
            Ok(Vec::new())
        }
    }

    /// Recursively add every keyword file in a folder
    ///
    /// Files that fail to load are logged and skipped.
    pub async fn add_folder(&self, dir: &Path) -> Vec<i64> {
        self.add_discovered(folder::discover_files(dir, &self.ignore_file))
            .await
    }

    async fn add_discovered(&self, files: Vec<PathBuf>) -> Vec<i64> {
        let mut ids = Vec::new();
        for path in files {
            let kind = match classify::classify(&path) {
                Ok(Some(kind)) => kind,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Skipping {}: {:#}", path.display(), e);
                    continue;
                }
            };
            match self.add_file_of_kind(&path, kind).await {
                Ok(added) => ids.extend(added),
                Err(e) => warn!("Failed to index {}: {:#}", path.display(), e),
            }
        }
        ids
    }

    /// Insert a row into the collections table, returning its id
    pub async fn add_collection(&self, path: Option<&Path>, doc: &LibraryDoc) -> Result<i64> {
        let path = path.map(absolute).transpose()?.map(|p| path_key(&p));
        insert_collection(&self.pool, path.as_deref(), doc, None).await
    }

    /// Add the libraries that ship with Robot Framework
    pub async fn add_installed_libraries(&self) -> Vec<i64> {
        if !self.libdoc.is_enabled() {
            debug!("libdoc is disabled, skipping installed libraries");
            return Vec::new();
        }

        let mut loaded: Vec<String> = Vec::new();
        let mut ids = Vec::new();

        for name in STANDARD_LIBRARIES {
            let lower = name.to_lowercase();
            if loaded.contains(&lower) || classify::should_ignore_library(name) {
                continue;
            }
            match self.add_library(name).await {
                Ok(id) => {
                    ids.extend(id);
                    loaded.push(lower);
                }
                Err(e) => debug!("unable to add library {}: {:#}", name, e),
            }
        }
        ids
    }

    /// Store `doc`, updating the collection from the same source in place
    ///
    /// An existing collection keeps its id. When its checksum matches,
    /// nothing is rewritten.
    async fn store(&self, path: Option<&str>, doc: &LibraryDoc, checksum: Option<&str>) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let existing = match path {
            Some(path) => sqlx::query(
                "SELECT collection_id, checksum FROM collections WHERE path = ? ORDER BY collection_id",
            )
            .bind(path)
            .fetch_all(&mut *tx)
            .await?,
            None => sqlx::query(
                "SELECT collection_id, checksum FROM collections
                 WHERE path IS NULL AND name = ?
                 ORDER BY collection_id",
            )
            .bind(&doc.name)
            .fetch_all(&mut *tx)
            .await?,
        };

        let Some((first, duplicates)) = existing.split_first() else {
            let collection_id = insert_collection(&mut *tx, path, doc, checksum).await?;
            insert_keywords(&mut *tx, collection_id, doc).await?;
            tx.commit().await?;
            return Ok(collection_id);
        };

        let collection_id: i64 = first.get("collection_id");
        let stored: Option<String> = first.get("checksum");
        if duplicates.is_empty() && checksum.is_some() && stored.as_deref() == checksum {
            debug!("{} is unchanged, keeping collection {}", doc.name, collection_id);
            return Ok(collection_id);
        }

        for row in duplicates {
            delete_collection(&mut *tx, row.get("collection_id")).await?;
        }
        sqlx::query(
            "UPDATE collections
             SET name = ?, type = ?, version = ?, scope = ?, namedargs = ?, doc = ?, doc_format = ?, checksum = ?
             WHERE collection_id = ?",
        )
        .bind(&doc.name)
        .bind(&doc.doc_type)
        .bind(&doc.version)
        .bind(&doc.scope)
        .bind(&doc.named_args)
        .bind(&doc.doc)
        .bind(&doc.doc_format)
        .bind(checksum)
        .bind(collection_id)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to update collection {}", doc.name))?;
        sqlx::query("DELETE FROM keywords WHERE collection_id = ?")
            .bind(collection_id)
            .execute(&mut *tx)
            .await?;
        insert_keywords(&mut *tx, collection_id, doc).await?;

        tx.commit().await?;
        Ok(collection_id)
    }

    /// Reload the keywords of a file that changed on disk
    pub async fn on_change(&self, path: &Path) -> Result<ChangeOutcome> {
        let path = absolute(path)?;
        let key = path_key(&path);

        let rows = sqlx::query("SELECT collection_id, checksum FROM collections WHERE path = ?")
            .bind(&key)
            .fetch_all(&self.pool)
            .await?;
        if rows.is_empty() {
            return Ok(ChangeOutcome::NotIndexed);
        }

        if !path.is_file() {
            self.remove_path(&path).await?;
            return Ok(ChangeOutcome::Removed);
        }

        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let checksum = format!("{:x}", md5::compute(&bytes));

        let unchanged = rows.iter().all(|row| {
            row.get::<Option<String>, _>("checksum").as_deref() == Some(checksum.as_str())
        });
        if unchanged {
            return Ok(ChangeOutcome::Unchanged);
        }

        let doc = match classify::classify(&path)? {
            Some(kind) => self.document_file(&path, kind, &bytes).await?,
            None => {
                self.remove_path(&path).await?;
                return Ok(ChangeOutcome::Removed);
            }
        };
        if !doc.has_keywords() {
            self.remove_path(&path).await?;
            return Ok(ChangeOutcome::Removed);
        }

        let mut tx = self.pool.begin().await?;
        for row in &rows {
            let collection_id: i64 = row.get("collection_id");
            sqlx::query("DELETE FROM keywords WHERE collection_id = ?")
                .bind(collection_id)
                .execute(&mut *tx)
                .await?;
            insert_keywords(&mut *tx, collection_id, &doc).await?;
            sqlx::query(
                "UPDATE collections SET doc = ?, version = ?, checksum = ? WHERE collection_id = ?",
            )
            .bind(&doc.doc)
            .bind(&doc.version)
            .bind(&checksum)
            .bind(collection_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!("Reloaded {} keywords from {}", doc.keywords.len(), path.display());
        Ok(ChangeOutcome::Reloaded(doc.keywords.len()))
    }

    /// Drop every collection stored under `path`, or anywhere below it
    pub async fn remove_path(&self, path: &Path) -> Result<u64> {
        let path = absolute(path)?;
        let key = path_key(&path);
        let prefix = format!("{}{}", key.trim_end_matches(MAIN_SEPARATOR), MAIN_SEPARATOR);

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "DELETE FROM keywords WHERE collection_id IN (
                SELECT collection_id FROM collections
                WHERE path = ? OR substr(path, 1, length(?)) = ?
             )",
        )
        .bind(&key)
        .bind(&prefix)
        .bind(&prefix)
        .execute(&mut *tx)
        .await?;
        let removed = sqlx::query(
            "DELETE FROM collections WHERE path = ? OR substr(path, 1, length(?)) = ?",
        )
        .bind(&key)
        .bind(&prefix)
        .bind(&prefix)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        tx.commit().await?;

        if removed > 0 {
            info!("Removed {} collection(s) under {}", removed, path.display());
        }
        Ok(removed)
    }

    /// Get a specific collection
    pub async fn get_collection(&self, collection_id: i64) -> Result<Option<Collection>> {
        let collection = sqlx::query_as::<_, Collection>(
            "SELECT collection_id, name, type, version, scope, namedargs, path, doc, doc_format
             FROM collections
             WHERE collection_id = ?",
        )
        .bind(collection_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(collection)
    }

    /// List collections whose name and type match glob patterns
    pub async fn get_collections(&self, pattern: &str, libtype: &str) -> Result<Vec<CollectionSummary>> {
        let rows = sqlx::query(
            r"SELECT collection_id, name, doc, type, path
              FROM collections
              WHERE name LIKE ? ESCAPE '\'
              AND type LIKE ? ESCAPE '\'
              ORDER BY name COLLATE NOCASE, collection_id",
        )
        .bind(glob_to_sql(pattern))
        .bind(glob_to_sql(libtype))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| CollectionSummary {
                collection_id: row.get("collection_id"),
                name: row.get("name"),
                synopsis: synopsis(row.get::<&str, _>("doc")),
                collection_type: row.get("type"),
                path: row.get("path"),
            })
            .collect())
    }

    /// All keywords of one collection, ordered by name
    pub async fn get_keyword_data(&self, collection_id: i64) -> Result<Vec<KeywordRow>> {
        let rows = sqlx::query(
            "SELECT keyword_id, name, args, doc
             FROM keywords
             WHERE collection_id = ?
             ORDER BY name COLLATE NOCASE, keyword_id",
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| KeywordRow {
                keyword_id: row.get("keyword_id"),
                name: row.get("name"),
                args: decode_args(row.get("args")),
                doc: row.get("doc"),
            })
            .collect())
    }

    /// Get a specific keyword from a collection (case-insensitive name match)
    pub async fn get_keyword(&self, collection_id: i64, name: &str) -> Result<Option<Keyword>> {
        let row = sqlx::query(
            "SELECT name, args, doc
             FROM keywords
             WHERE collection_id = ?
             AND name = ? COLLATE NOCASE
             ORDER BY keyword_id
             LIMIT 1",
        )
        .bind(collection_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Keyword {
            name: row.get("name"),
            args: decode_args(row.get("args")),
            doc: row.get("doc"),
            collection_id,
        }))
    }

    /// Keywords grouped per collection, for collections matching `pattern`
    pub async fn get_keyword_hierarchy(&self, pattern: &str) -> Result<Vec<CollectionKeywords>> {
        let rows = sqlx::query(
            r"SELECT c.collection_id, c.name AS collection_name, c.path,
                     k.name AS keyword_name, k.doc AS keyword_doc
              FROM collections c
              JOIN keywords k ON k.collection_id = c.collection_id
              WHERE c.name LIKE ? ESCAPE '\'
              ORDER BY c.name COLLATE NOCASE, c.collection_id, k.name COLLATE NOCASE",
        )
        .bind(glob_to_sql(pattern))
        .fetch_all(&self.pool)
        .await?;

        let mut libraries = Vec::new();
        for (collection_id, group) in &rows
            .iter()
            .chunk_by(|row| row.get::<i64, _>("collection_id"))
        {
            let group: Vec<_> = group.collect();
            let first = group[0];
            libraries.push(CollectionKeywords {
                collection_id,
                name: first.get("collection_name"),
                path: first.get("path"),
                keywords: group
                    .iter()
                    .map(|row| KeywordBrief {
                        name: row.get("keyword_name"),
                        doc: row.get("keyword_doc"),
                    })
                    .collect(),
            });
        }
        Ok(libraries)
    }

    /// Pattern search over keyword names (and documentation, in `Both` mode)
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        let mut sql = String::from(
            r"SELECT c.collection_id, c.name AS collection_name, k.name, k.doc
              FROM collections c
              JOIN keywords k ON k.collection_id = c.collection_id
              WHERE ",
        );
        match query.mode {
            SearchMode::Name => sql.push_str(r"k.name LIKE ? ESCAPE '\'"),
            SearchMode::Both => {
                sql.push_str(r"(k.name LIKE ? ESCAPE '\' OR k.doc LIKE ? ESCAPE '\')")
            }
        }
        if query.collection.is_some() {
            sql.push_str(" AND c.name = ? COLLATE NOCASE");
        }
        sql.push_str(" ORDER BY c.collection_id, c.name, k.name COLLATE NOCASE");

        let pattern = query.sql_pattern();
        let mut statement = sqlx::query(&sql).bind(pattern.clone());
        if query.mode == SearchMode::Both {
            statement = statement.bind(pattern);
        }
        if let Some(collection) = &query.collection {
            statement = statement.bind(collection.clone());
        }

        let rows = statement.fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(|row| SearchHit {
                collection_id: row.get("collection_id"),
                collection_name: row.get("collection_name"),
                name: row.get("name"),
                synopsis: synopsis(row.get::<&str, _>("doc")),
            })
            .unique()
            .collect())
    }

    /// All keywords whose name matches a glob pattern
    pub async fn get_keywords(&self, pattern: &str) -> Result<Vec<KeywordEntry>> {
        let rows = sqlx::query(
            r"SELECT c.collection_id, c.name AS collection_name, k.name, k.doc, k.args
              FROM collections c
              JOIN keywords k ON k.collection_id = c.collection_id
              WHERE k.name LIKE ? ESCAPE '\'
              ORDER BY c.name COLLATE NOCASE, k.name COLLATE NOCASE",
        )
        .bind(glob_to_sql(pattern))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| KeywordEntry {
                collection_id: row.get("collection_id"),
                collection_name: row.get("collection_name"),
                name: row.get("name"),
                doc: row.get("doc"),
                args: decode_args(row.get("args")),
            })
            .unique()
            .collect())
    }

    /// (collections, keywords) currently stored
    pub async fn counts(&self) -> Result<(i64, i64)> {
        let collections: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM collections")
            .fetch_one(&self.pool)
            .await?;
        let keywords: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM keywords")
            .fetch_one(&self.pool)
            .await?;
        Ok((collections, keywords))
    }

    /// Remove all data from the database, but leave the tables intact
    pub async fn reset(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM keywords").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM collections")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
