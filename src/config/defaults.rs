use crate::config::types::*;
use crate::constants::{
    DEFAULT_DATABASE_URL, IGNORE_FILENAME, WATCH_DEBOUNCE_DURATION, WATCH_POLL_INTERVAL,
};

// Config derives Default

impl Default for Database {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            paths: vec![],
            installed_libraries: false,
            ignore_file: IGNORE_FILENAME.to_string(),
        }
    }
}

impl Default for Libdoc {
    fn default() -> Self {
        Self {
            enabled: true,
            command: vec![
                "python".to_string(),
                "-m".to_string(),
                "robot.libdoc".to_string(),
            ],
        }
    }
}

impl Default for Watch {
    fn default() -> Self {
        Self {
            poll: false,
            poll_interval_ms: WATCH_POLL_INTERVAL.as_millis() as u64,
            debounce_ms: WATCH_DEBOUNCE_DURATION.as_millis() as u64,
        }
    }
}
