use crate::config::types::*;

/// Trait for merging optional configuration values
pub trait Merge<T> {
    fn merge(self, other: T) -> T;
}

impl Merge<ConfigInput> for ConfigInput {
    fn merge(self, other: ConfigInput) -> ConfigInput {
        ConfigInput {
            database: match (self.database, other.database) {
                (None, None) => None,
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (Some(a), Some(b)) => Some(a.merge_with(b)),
            },
            sources: match (self.sources, other.sources) {
                (None, None) => None,
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (Some(a), Some(b)) => Some(a.merge_with(b)),
            },
            libdoc: match (self.libdoc, other.libdoc) {
                (None, None) => None,
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (Some(a), Some(b)) => Some(a.merge_with(b)),
            },
            watch: match (self.watch, other.watch) {
                (None, None) => None,
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (Some(a), Some(b)) => Some(a.merge_with(b)),
            },
        }
    }
}

// Field-wise merge for each section
impl DatabaseInput {
    pub fn merge_with(self, other: DatabaseInput) -> DatabaseInput {
        DatabaseInput {
            url: other.url.or(self.url),
        }
    }
}

impl SourcesInput {
    pub fn merge_with(self, other: SourcesInput) -> SourcesInput {
        SourcesInput {
            paths: other.paths.or(self.paths),
            installed_libraries: other.installed_libraries.or(self.installed_libraries),
            ignore_file: other.ignore_file.or(self.ignore_file),
        }
    }
}

impl LibdocInput {
    pub fn merge_with(self, other: LibdocInput) -> LibdocInput {
        LibdocInput {
            enabled: other.enabled.or(self.enabled),
            command: other.command.or(self.command),
        }
    }
}

impl WatchInput {
    pub fn merge_with(self, other: WatchInput) -> WatchInput {
        WatchInput {
            poll: other.poll.or(self.poll),
            poll_interval_ms: other.poll_interval_ms.or(self.poll_interval_ms),
            debounce_ms: other.debounce_ms.or(self.debounce_ms),
        }
    }
}
