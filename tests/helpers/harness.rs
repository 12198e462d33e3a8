use anyhow::Result;
use rfhub::kwdb::KeywordTable;
use rfhub::libdoc::LibdocRunner;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An in-memory keyword table next to a scratch folder of sources
///
/// Libdoc is disabled, so only resource files and libdoc XML are indexed.
pub struct TestHub {
    pub temp_dir: TempDir,
    pub table: KeywordTable,
}

impl TestHub {
    pub async fn new() -> Result<Self> {
        // the default `.tmpXXXX` name would make the folder itself hidden
        let temp_dir = tempfile::Builder::new().prefix("rfhub-test").tempdir()?;
        let table = KeywordTable::open("sqlite::memory:", LibdocRunner::disabled()).await?;
        Ok(Self { temp_dir, table })
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The scratch folder as the only watched folder
    pub fn watched(&self) -> Vec<PathBuf> {
        vec![self.root().to_path_buf()]
    }

    pub fn root_str(&self) -> String {
        self.root().to_string_lossy().into_owned()
    }

    /// Write a file below the scratch folder, creating parent folders
    pub fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    pub async fn collection_names(&self) -> Result<Vec<String>> {
        Ok(self
            .table
            .get_collections("*", "*")
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect())
    }
}
