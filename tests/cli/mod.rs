/// End-to-end tests that run the rfhub binary with assert_cmd
///
/// Every test indexes a scratch folder with `--no-libdoc`, so no Python
/// installation is needed.
pub mod errors;
pub mod queries;
