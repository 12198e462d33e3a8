//! Robot Framework sources shared by the integration and CLI tests

pub const LOGIN_RESOURCE: &str = "\
*** Settings ***
Documentation    Keywords for logging in to the demo app.
...              Used by every login suite.

*** Variables ***
${URL}    http://localhost:7272

*** Keywords ***
Open Login Page
    [Documentation]    Opens the browser on the login page.
    [Arguments]    ${url}=${URL}    ${browser}=firefox
    Open Browser    ${url}    ${browser}

Submit Credentials
    [Documentation]    Types the user name and password, then submits.
    [Arguments]    ${user}
    ...    ${password}
    Input Text    user    ${user}
    Input Text    password    ${password}

Welcome Page Should Be Open
    Title Should Be    Welcome Page
";

pub const UTIL_RESOURCE: &str = "\
| *** Keywords *** |
| Set_Value | [Arguments] | ${value} |
| | [Documentation] | Stores a value for later. |
| | Set Test Variable | ${VALUE} | ${value} |
| SetXValue | [Documentation] | Stores the X coordinate. |
| | No Operation |
";

/// A test suite: it has keywords, but also test cases, so it is not a resource
pub const LOGIN_SUITE: &str = "\
*** Test Cases ***
Valid Login
    Open Login Page
    Submit Credentials    demo    mode

*** Keywords ***
Helper
    No Operation
";

pub const PLAIN_TEXT: &str = "Just some notes, nothing to index.\n";

pub const COLLECTIONS_LIBDOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<keywordspec name="Collections" type="library" format="ROBOT" generated="20180101 10:00:00">
<version>3.0.4</version>
<scope>global</scope>
<namedargs>yes</namedargs>
<doc>A library providing keywords for handling lists and dictionaries.</doc>
<kw name="Append To List">
<arguments>
<arg>list_</arg>
<arg>*values</arg>
</arguments>
<doc>Adds ``values`` to the end of ``list``.</doc>
</kw>
<kw name="Copy List">
<arguments>
<arg>list_</arg>
</arguments>
<doc>Returns a copy of the given list.</doc>
</kw>
</keywordspec>
"#;
