pub mod index;
pub mod query;
pub mod reset;
pub mod shutdown;
pub mod watch;

// Re-export all command functions
pub use index::cmd_index;
pub use query::{cmd_collections, cmd_hierarchy, cmd_keywords, cmd_search, cmd_show};
pub use reset::cmd_reset;
pub use watch::cmd_watch;
