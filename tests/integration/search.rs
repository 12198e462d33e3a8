use anyhow::Result;
use rfhub::kwdb::{SearchMode, SearchQuery};

use crate::fixtures::{COLLECTIONS_LIBDOC, LOGIN_RESOURCE, UTIL_RESOURCE};
use crate::helpers::harness::TestHub;

async fn loaded_hub() -> Result<TestHub> {
    let hub = TestHub::new().await?;
    hub.write_file("login.robot", LOGIN_RESOURCE)?;
    hub.write_file("util.txt", UTIL_RESOURCE)?;
    hub.write_file("Collections.xml", COLLECTIONS_LIBDOC)?;
    hub.table.add(&hub.root_str()).await?;
    Ok(hub)
}

fn names(hits: &[rfhub::kwdb::SearchHit]) -> Vec<&str> {
    hits.iter().map(|h| h.name.as_str()).collect()
}

#[tokio::test]
async fn test_search_matches_documentation_by_default() -> Result<()> {
    let hub = loaded_hub().await?;

    let hits = hub.table.search(&SearchQuery::parse("browser")).await?;
    assert_eq!(names(&hits), vec!["Open Login Page"]);
    assert_eq!(hits[0].collection_name, "login");
    assert_eq!(hits[0].synopsis, "Opens the browser on the login page.");
    Ok(())
}

#[tokio::test]
async fn test_name_prefix_skips_documentation() -> Result<()> {
    let hub = loaded_hub().await?;

    let hits = hub.table.search(&SearchQuery::parse("name:browser")).await?;
    assert!(hits.is_empty());

    let hits = hub
        .table
        .search(&SearchQuery::parse_with_mode("list", SearchMode::Name))
        .await?;
    assert_eq!(names(&hits), vec!["Append To List", "Copy List"]);
    Ok(())
}

#[tokio::test]
async fn test_underscore_is_literal() -> Result<()> {
    let hub = loaded_hub().await?;

    let hits = hub.table.search(&SearchQuery::parse("name:set_value")).await?;
    assert_eq!(names(&hits), vec!["Set_Value"]);

    let hits = hub.table.search(&SearchQuery::parse("name:set?value")).await?;
    assert_eq!(names(&hits), vec!["Set_Value", "SetXValue"]);
    Ok(())
}

#[tokio::test]
async fn test_in_filter_limits_collection() -> Result<()> {
    let hub = loaded_hub().await?;

    let hits = hub.table.search(&SearchQuery::parse("page in:LOGIN")).await?;
    assert_eq!(names(&hits), vec!["Open Login Page", "Welcome Page Should Be Open"]);

    let hits = hub.table.search(&SearchQuery::parse("page in:util")).await?;
    assert!(hits.is_empty());

    // nothing but a filter lists the whole collection
    let hits = hub.table.search(&SearchQuery::parse("in:Collections")).await?;
    assert_eq!(hits.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_get_keywords_across_collections() -> Result<()> {
    let hub = loaded_hub().await?;

    let all = hub.table.get_keywords("*").await?;
    assert_eq!(all.len(), 7);
    assert_eq!(all[0].collection_name, "Collections");

    let lists = hub.table.get_keywords("list").await?;
    assert_eq!(lists.len(), 2);
    assert!(lists.iter().all(|k| k.collection_name == "Collections"));
    assert_eq!(lists[0].args, vec!["list_", "*values"]);
    Ok(())
}
