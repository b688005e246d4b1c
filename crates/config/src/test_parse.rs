use std::{fs, time::Duration};

use quickswitch_protocol::SuggestionKind;

use crate::{Config, Error, load, load_from_path, parse};

#[test]
fn empty_config_is_defaults() {
    let cfg = parse("()").unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.picker.command, "dmenu");
    assert_eq!(cfg.template, "{index} {type} {title} {url}");
    assert_eq!(cfg.template, quickswitch_protocol::DEFAULT_TEMPLATE);
    assert_eq!(cfg.providers, SuggestionKind::ALL.to_vec());
    assert_eq!(cfg.provider_timeout(), Duration::from_millis(1500));
}

#[test]
fn user_values_merge_over_defaults() {
    let cfg = parse(
        r#"(
            picker: (command: "fzf"),
            providers: [openTab, history],
        )"#,
    )
    .unwrap();
    assert_eq!(cfg.picker.command, "fzf");
    assert!(cfg.picker.args.is_empty());
    assert_eq!(cfg.template, Config::default().template);
    assert!(cfg.provider_enabled(SuggestionKind::History));
    assert!(!cfg.provider_enabled(SuggestionKind::Bookmark));
}

#[test]
fn explicit_state_path_wins() {
    let cfg = parse(r#"(state_path: Some("/tmp/qs.json"))"#).unwrap();
    assert_eq!(cfg.state_path().to_str(), Some("/tmp/qs.json"));
    assert!(Config::default().state_path().ends_with(".quickswitch/state.json"));
}

#[test]
fn syntax_errors_carry_an_excerpt() {
    let err = parse("(\n    picker: (command: 5),\n)").unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert!(err.pretty().contains("command: 5"));
}

#[test]
fn parse_errors_locate_the_offending_line() {
    let err = parse("(\n    template: \"{title}\",\n    picker: (command: 5),\n)").unwrap_err();
    let Error::Parse {
        line, col, message, ..
    } = &err
    else {
        panic!("expected parse error, got {err:?}");
    };
    assert_eq!(*line, 3);
    assert!(*col > 1);
    assert!(!message.starts_with(|c: char| c.is_ascii_digit()));
    assert!(err.pretty().contains(":3:"));
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(matches!(parse("(pickr: ())"), Err(Error::Parse { .. })));
}

#[test]
fn unknown_provider_is_rejected() {
    assert!(matches!(
        parse("(providers: [everything])"),
        Err(Error::Parse { .. })
    ));
}

#[test]
fn unusable_values_fail_validation() {
    for src in [
        r#"(picker: (command: "  "))"#,
        "(providers: [])",
        "(provider_timeout_ms: 0)",
    ] {
        assert!(
            matches!(parse(src), Err(Error::Validation { .. })),
            "expected validation error for {src}"
        );
    }
}

#[test]
fn file_errors_name_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.ron");
    fs::write(&path, "(providers: [])").unwrap();
    let err = load_from_path(&path).unwrap_err();
    assert_eq!(err.path(), Some(path.as_path()));

    fs::write(&path, r#"(template: "{title}")"#).unwrap();
    assert_eq!(load(Some(&path)).unwrap().template, "{title}");
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(Some(&dir.path().join("absent.ron"))).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
}
