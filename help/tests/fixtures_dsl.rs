use std::fs;
use std::path::PathBuf;

use optscan_core::{ParseContext, UsageErrorKind};
use optscan_help::{HelpDocument, parse_help_text, render_all, render_section};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()))
}

fn git_lite() -> HelpDocument {
    parse_help_text(&fixture("git-lite.txt"), "git-lite").expect("fixture should parse")
}

#[test]
fn test_fixture_sections_and_summaries() {
    let doc = git_lite();
    assert_eq!(
        doc.command_paths(),
        vec!["", "clone", "remote", "remote add", "remote remove", "config"]
    );
    assert_eq!(doc.section("").unwrap().summary, "a tiny content tracker");
    assert_eq!(doc.section("remote add").unwrap().summary, "add a remote");
    assert!(doc.section("hidden").is_none());
}

#[test]
fn test_fixture_includes_expand_in_place() {
    let doc = git_lite();
    let longs: Vec<Option<&str>> = doc
        .options("clone")
        .iter()
        .map(|spec| spec.long.as_deref())
        .collect();
    assert_eq!(
        longs,
        vec![
            Some("branch"),
            Some("depth"),
            Some("timeout"),
            Some("quiet"),
            Some("verbose")
        ]
    );
    let verbose = &doc.options("clone")[4];
    assert_eq!(
        verbose.description.as_deref(),
        Some("be more talkative\n(may be given several times)")
    );
    assert!(doc.options("clone").iter().all(|spec| spec.group.as_deref() == Some("clone")));
}

#[test]
fn test_fixture_tables_drive_the_parser() {
    let doc = git_lite();
    let table = doc.option_table("clone").unwrap();
    let context = ParseContext::default().with_offset(1).allow_group("clone");

    let args = ["clone", "-qb", "main", "--depth=1", "--timeout", "30", "url", "dir"];
    let result = table.parse(&args, &context);
    assert!(result.is_valid(), "unexpected: {:?}", result.illegal);
    assert!(result.is_present("quiet"));
    assert_eq!(result.first_param('b'), Some("main"));
    assert_eq!(result.first_param("depth"), Some("1"));
    assert_eq!(result.first_param("timeout"), Some("30"));
    assert_eq!(result.positional_texts(), vec!["url", "dir"]);
}

#[test]
fn test_fixture_short_only_option_keeps_its_param() {
    let doc = git_lite();
    let master = doc
        .options("remote add")
        .iter()
        .find(|spec| spec.short == Some('m'))
        .expect("-m should be declared");
    assert_eq!(master.arity(), 1);
    assert_eq!(master.params[0].name, "master");
    assert_eq!(master.description.as_deref(), Some("set HEAD of the remote"));

    let table = doc.option_table("remote add").unwrap();
    let context = ParseContext::default().with_offset(2).allow_group("remote add");
    let result = table.parse(&["remote", "add", "-m", "main", "origin", "url"], &context);
    assert!(result.is_valid(), "unexpected: {:?}", result.illegal);
    assert_eq!(result.first_param('m'), Some("main"));
    assert_eq!(result.positional_texts(), vec!["origin", "url"]);
}

#[test]
fn test_fixture_options_need_their_group() {
    let doc = git_lite();
    let table = doc.option_table("config").unwrap();

    let result = table.parse(&["--set", "user.name", "me"], &ParseContext::default());
    assert_eq!(result.illegal.len(), 1);
    assert_eq!(result.illegal[0].kind, UsageErrorKind::OptionNotRecognized);

    let result = table.parse(
        &["--set", "user.name", "me"],
        &ParseContext::default().allow_group("config"),
    );
    assert_eq!(result.params_of("set", 0), ["user.name", "me"]);
}

#[test]
fn test_fixture_root_help_page() {
    let doc = git_lite();
    let page = render_section(&doc, "").unwrap();
    assert!(page.starts_with("git-lite keeps track of files."));
    assert!(page.contains("  clone        clone a repository\n"));
    assert!(page.contains("  remote       manage remotes\n"));
    assert!(!page.contains("remote add"));
    assert!(page.contains("# but this line starts with a hash"));
    assert!(!page.contains("never shows up"));
}

#[test]
fn test_fixture_dump_lists_every_section() {
    let doc = git_lite();
    let dump = render_all(&doc);
    for path in ["== git-lite\n", "== clone\n", "== remote add\n", "== config\n"] {
        assert!(dump.contains(path), "missing {path:?}");
    }
    assert!(dump.contains("  --set <key> <value>  set <key> to <value>\n"));
}

#[test]
fn test_document_serializes() {
    let doc = git_lite();
    let json = serde_json::to_value(&doc).expect("document should serialize");
    assert_eq!(json["tool"], "git-lite");
    assert_eq!(json["sections"][3]["command_path"], "remote add");
    let back: HelpDocument = serde_json::from_value(json).expect("document should deserialize");
    assert_eq!(back, doc);
}
