use std::path::PathBuf;

use faceit::tournament::aggregate;
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn parsed_match() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../testfiles/match.json"))
}

#[test]
#[traced_test]
fn skips_unparsed_demos() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(parsed_match(), dir.path().join("1-abc.json")).unwrap();

    let demos = vec![
        ("1-abc".to_owned(), dir.path().join("1-abc.dem")),
        ("1-def".to_owned(), dir.path().join("1-def.dem")),
    ];
    let report = aggregate("champ", &demos, true).unwrap();

    assert_eq!(vec!["1-def".to_owned()], report.skipped);
    assert_eq!(1, report.matches.len());
    assert_eq!(Some("de_mirage"), report.matches[0].map.as_deref());
    assert_eq!(report.matches[0].players, report.players);
    assert!(logs_contain("Demo has not been parsed"));
}

#[test]
fn sums_matches() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(parsed_match(), dir.path().join("1-abc.json")).unwrap();
    std::fs::copy(parsed_match(), dir.path().join("1-def.json")).unwrap();

    let demos = vec![
        ("1-abc".to_owned(), dir.path().join("1-abc.dem")),
        ("1-def".to_owned(), dir.path().join("1-def.dem")),
    ];
    let report = aggregate("champ", &demos, false).unwrap();

    assert!(report.matches.is_empty());
    let names: Vec<&str> = report.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(vec!["a2", "a1", "b1", "b2"], names);
    assert_eq!((6, 4), (report.players[0].kills, report.players[0].deaths));
}

#[test]
fn nothing_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let demos = vec![("1-abc".to_owned(), dir.path().join("1-abc.dem"))];

    let report = aggregate("champ", &demos, false).unwrap();
    assert!(report.players.is_empty());
    assert_eq!(1, report.skipped.len());
}
