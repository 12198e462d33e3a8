pub mod search;
pub mod watch_changes;
