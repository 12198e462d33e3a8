pub mod config;
pub mod glob_patterns;
