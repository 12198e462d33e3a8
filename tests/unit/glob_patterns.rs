use rfhub::kwdb::{SearchMode, SearchQuery, glob_to_sql};
use rstest::rstest;

#[rstest]
#[case::everything("*", "%%%")]
#[case::plain_word("login", "%login%")]
#[case::star_inside("open*page", "%open%page%")]
#[case::single_char("set?value", "%set_value%")]
#[case::start_anchor("^Open", "Open%")]
#[case::end_anchor("Page$", "%Page")]
#[case::both_anchors("^Log$", "Log")]
#[case::literal_percent("100%", "%100\\%%")]
#[case::literal_underscore("set_value", "%set\\_value%")]
#[case::escaped_star("a\\*b", "%a\\*b%")]
#[case::escaped_dollar("cost\\$", "%cost$%")]
#[case::escaped_backslash_then_anchor(r"C:\\$", r"%C:\\")]
#[case::escaped_backslash_then_escaped_dollar(r"C:\\\$", r"%C:\\$%")]
fn test_glob_to_sql(#[case] glob: &str, #[case] expected: &str) {
    assert_eq!(glob_to_sql(glob), expected);
}

#[rstest]
#[case("open page", "open page", SearchMode::Both, None)]
#[case("name:open*", "open*", SearchMode::Name, None)]
#[case("page in:login", "page", SearchMode::Both, Some("login"))]
#[case("name: in:BuiltIn log", "log", SearchMode::Name, Some("BuiltIn"))]
#[case("   ", "*", SearchMode::Both, None)]
fn test_search_query_parsing(
    #[case] text: &str,
    #[case] pattern: &str,
    #[case] mode: SearchMode,
    #[case] collection: Option<&str>,
) {
    let query = SearchQuery::parse(text);
    assert_eq!(query.pattern, pattern);
    assert_eq!(query.mode, mode);
    assert_eq!(query.collection.as_deref(), collection);
}
