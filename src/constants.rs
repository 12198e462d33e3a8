use std::time::Duration;

// File watch timing constants
pub const WATCH_DEBOUNCE_DURATION: Duration = Duration::from_millis(500);
pub const WATCH_POLL_TIMEOUT: Duration = Duration::from_millis(100);
pub const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(1000);

// Configuration file name
pub const CONFIG_FILENAME: &str = "rfhub.yaml";

// Per-folder exclusion list
pub const IGNORE_FILENAME: &str = ".rfhubignore";

// Default keyword database (lives only as long as the process)
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

/// Environment fallback for the database URL
pub const DATABASE_URL_ENV: &str = "RFHUB_DATABASE_URL";

/// Extensions picked up while walking a folder
pub const INDEXED_EXTENSIONS: &[&str] = &["xml", "robot", "txt", "py", "tsv"];

/// Extensions that trigger a reload when they change on disk
pub const WATCHED_EXTENSIONS: &[&str] = &["robot", "txt", "py", "tsv", "xml"];

/// How much of an .xml file is sniffed for a `<keywordspec` root
pub const LIBDOC_SNIFF_BYTES: usize = 200;

/// Libraries bundled with Robot Framework itself
pub const STANDARD_LIBRARIES: &[&str] = &[
    "BuiltIn",
    "Collections",
    "DateTime",
    "Dialogs",
    "OperatingSystem",
    "Process",
    "Screenshot",
    "String",
    "Telnet",
    "XML",
];

/// Modules in the robot libraries folder that are not keyword libraries
pub const IGNORED_LIBRARY_NAMES: &[&str] = &[
    "remote",
    "reserved",
    "easter",
    "dialogs_py",
    "dialogs_ipy",
    "dialogs_jy",
];

/// libdoc substitutes this when a resource file has no documentation of its own
pub const RESOURCE_DOC_PLACEHOLDER: &str = "Documentation for resource file";
