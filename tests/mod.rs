// Integration tests for rfhub

pub mod cli;
pub mod fixtures;
pub mod helpers;
pub mod integration;
pub mod unit;
