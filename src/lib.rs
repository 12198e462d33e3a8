//! rfhub: an index of Robot Framework keyword libraries and resource files
//!
//! Sources are documented into a SQLite keyword database ([`kwdb`]) that can
//! be listed, searched and kept current by watching folders ([`watch`]).

pub mod commands;
pub mod config;
pub mod constants;
pub mod db;
pub mod ignore;
pub mod kwdb;
pub mod libdoc;
pub mod output;
pub mod watch;
