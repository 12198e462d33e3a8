use crate::fixtures::{COLLECTIONS_LIBDOC, LOGIN_RESOURCE, UTIL_RESOURCE};
use crate::helpers::cli::{CliTestHelper, with_cli_helper};
use anyhow::Result;
use predicates::prelude::*;

fn write_sources(helper: &CliTestHelper) -> Result<()> {
    helper.write_file("keywords/login.robot", LOGIN_RESOURCE)?;
    helper.write_file("keywords/util.txt", UTIL_RESOURCE)?;
    helper.write_file("keywords/specs/Collections.xml", COLLECTIONS_LIBDOC)?;
    Ok(())
}

#[test]
fn test_index_reports_collections() -> Result<()> {
    with_cli_helper(|helper| {
        write_sources(helper)?;

        helper
            .command()
            .args(["index", "--no-libdoc", "keywords"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Indexed 3 collections"));
        Ok(())
    })
}

#[test]
fn test_collections_lists_names_and_types() -> Result<()> {
    with_cli_helper(|helper| {
        write_sources(helper)?;

        helper
            .command()
            .args(["collections", "--no-libdoc", "keywords"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Collections [library]"))
            .stdout(predicate::str::contains("login [resource]"))
            .stdout(predicate::str::contains("util [resource]"));

        helper
            .command()
            .args(["collections", "--type", "library", "--no-libdoc", "keywords"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Collections"))
            .stdout(predicate::str::contains("login").not());
        Ok(())
    })
}

#[test]
fn test_search_json_output() -> Result<()> {
    with_cli_helper(|helper| {
        write_sources(helper)?;

        let output = helper
            .command()
            .args(["search", "name:list", "--format", "json", "--no-libdoc", "keywords"])
            .output()?;
        assert!(output.status.success());

        let hits: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        let names: Vec<&str> = hits
            .as_array()
            .unwrap()
            .iter()
            .map(|hit| hit["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Append To List", "Copy List"]);
        Ok(())
    })
}

#[test]
fn test_search_without_matches() -> Result<()> {
    with_cli_helper(|helper| {
        write_sources(helper)?;

        helper
            .command()
            .args(["search", "no such thing", "--no-libdoc", "keywords"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No matching keywords"));
        Ok(())
    })
}

#[test]
fn test_show_keyword_from_config_sources() -> Result<()> {
    with_cli_helper(|helper| {
        write_sources(helper)?;
        helper.write_config("sources:\n  paths:\n    - keywords/login.robot\nlibdoc:\n  enabled: false\n")?;

        helper
            .command()
            .args(["show", "1", "--keyword", "submit credentials"])
            .assert()
            .success()
            .stdout(predicate::str::contains("login.Submit Credentials"))
            .stdout(predicate::str::contains("Arguments: ${user}, ${password}"));
        Ok(())
    })
}

#[test]
fn test_hierarchy_and_keywords() -> Result<()> {
    with_cli_helper(|helper| {
        write_sources(helper)?;

        helper
            .command()
            .args(["hierarchy", "--pattern", "util", "--no-libdoc", "keywords"])
            .assert()
            .success()
            .stdout(predicate::str::contains("util (2 keywords)"))
            .stdout(predicate::str::contains("Set_Value"));

        helper
            .command()
            .args(["keywords", "--pattern", "copy*", "--no-libdoc", "keywords"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Collections.Copy List(list_)"));
        Ok(())
    })
}

#[test]
fn test_ids_stay_valid_in_a_file_database() -> Result<()> {
    with_cli_helper(|helper| {
        write_sources(helper)?;
        let url = helper.database_url("keywords.db");

        for _ in 0..2 {
            helper
                .command()
                .args(["index", "--no-libdoc", "--database-url", &url, "keywords"])
                .assert()
                .success();
        }

        // discovery order: login.robot, specs/Collections.xml, util.txt
        helper
            .command()
            .args(["show", "3", "--keyword", "setxvalue", "--no-libdoc"])
            .args(["--database-url", &url, "keywords"])
            .assert()
            .success()
            .stdout(predicate::str::contains("util.SetXValue"));
        Ok(())
    })
}
