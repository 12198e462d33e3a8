use crate::fixtures::LOGIN_RESOURCE;
use crate::helpers::cli::with_cli_helper;
use anyhow::Result;
use predicates::prelude::*;

#[test]
fn test_invalid_config_file_is_reported() -> Result<()> {
    with_cli_helper(|helper| {
        helper.write_config("sources: [this is: not valid\n")?;

        helper
            .command()
            .args(["collections"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid config file"));
        Ok(())
    })
}

#[test]
fn test_show_unknown_collection_fails() -> Result<()> {
    with_cli_helper(|helper| {
        helper.write_file("keywords/login.robot", LOGIN_RESOURCE)?;

        helper
            .command()
            .args(["show", "42", "--no-libdoc", "keywords"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Collection 42 not found"));
        Ok(())
    })
}

#[test]
fn test_index_fails_when_nothing_loads() -> Result<()> {
    with_cli_helper(|helper| {
        helper
            .command()
            .args(["index", "--no-libdoc", "NoSuchLibrary"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No sources could be indexed"));
        Ok(())
    })
}

#[test]
fn test_empty_libdoc_command_is_rejected() -> Result<()> {
    with_cli_helper(|helper| {
        helper.write_config("libdoc:\n  command: []\n")?;

        helper
            .command()
            .args(["collections"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("libdoc.command is empty"));
        Ok(())
    })
}
