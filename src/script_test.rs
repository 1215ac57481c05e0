use super::*;

fn parse(line: &str) -> ScriptEvent {
    parse_line(1, line).unwrap().unwrap()
}

#[test]
fn blank_and_comment_lines_are_skipped() {
    assert!(parse_line(1, "").unwrap().is_none());
    assert!(parse_line(2, "   ").unwrap().is_none());
    assert!(parse_line(3, "# warm up").unwrap().is_none());
}

#[test]
fn pointer_defaults_to_primary_id_zero() {
    assert_eq!(
        parse(r#"{"type":"pointer_down","x":610,"y":420}"#),
        ScriptEvent::PointerDown { id: 0, button: Button::Primary, x: 610.0, y: 420.0 }
    );
    assert_eq!(parse(r#"{"type":"pointer_up"}"#), ScriptEvent::PointerUp { id: 0, button: Button::Primary });
}

#[test]
fn pointer_with_explicit_button_and_id() {
    assert_eq!(
        parse(r#"{"type":"pointer_down","id":2,"button":"middle","x":1,"y":2}"#),
        ScriptEvent::PointerDown { id: 2, button: Button::Middle, x: 1.0, y: 2.0 }
    );
}

#[test]
fn key_reads_flattened_modifiers() {
    assert_eq!(
        parse(r#"{"type":"key","key":"Z","ctrl":true,"shift":true}"#),
        ScriptEvent::Key { key: "Z".into(), modifiers: Modifiers { ctrl: true, shift: true, ..Modifiers::default() } }
    );
    assert_eq!(
        parse(r#"{"type":"key","key":"a"}"#),
        ScriptEvent::Key { key: "a".into(), modifiers: Modifiers::default() }
    );
}

#[test]
fn typed_values_parse() {
    assert_eq!(parse(r#"{"type":"mode","mode":"normal"}"#), ScriptEvent::Mode { mode: Mode::Select });
    assert_eq!(parse(r#"{"type":"direction","direction":"up"}"#), ScriptEvent::Direction { direction: Direction::Up });
    assert_eq!(
        parse(r##"{"type":"colors","foreground":"#ff0000","background":"#000000"}"##),
        ScriptEvent::Colors { foreground: Color::rgb(255, 0, 0), background: Color::BLACK }
    );
}

#[test]
fn paste_path_is_optional() {
    assert_eq!(parse(r#"{"type":"paste"}"#), ScriptEvent::Paste { path: None });
    assert_eq!(
        parse(r#"{"type":"paste","path":"a.png"}"#),
        ScriptEvent::Paste { path: Some(PathBuf::from("a.png")) }
    );
}

#[test]
fn unit_commands() {
    assert_eq!(parse(r#"{"type":"save"}"#), ScriptEvent::Save);
    assert_eq!(parse(r#"{"type":"quit"}"#), ScriptEvent::Quit);
}

#[test]
fn malformed_line_reports_line_number() {
    let err = parse_line(7, r#"{"type":"warp"}"#).unwrap_err();
    assert!(err.to_string().starts_with("line 7:"), "{err}");
    assert!(parse_line(8, r##"{"type":"colors","foreground":"red","background":"#000000"}"##).is_err());
}
