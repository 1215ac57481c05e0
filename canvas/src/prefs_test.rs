use super::*;

// --- Color ---

#[test]
fn color_formats_as_lowercase_hex() {
    assert_eq!(Color::rgb(255, 16, 0).to_string(), "#ff1000");
    assert_eq!(Color::BLACK.to_string(), "#000000");
}

#[test]
fn color_parses_hex_any_case() {
    assert_eq!("#FF1000".parse::<Color>(), Ok(Color::rgb(255, 16, 0)));
    assert_eq!("#ffffff".parse::<Color>(), Ok(Color::WHITE));
}

#[test]
fn color_rejects_malformed() {
    for bad in ["ffffff", "#fff", "#gggggg", "#1234567", "#ééé", ""] {
        assert_eq!(bad.parse::<Color>(), Err(ParseError::Color(bad.to_owned())), "{bad}");
    }
}

#[test]
fn color_serializes_as_string() {
    let json = serde_json::to_string(&Color::rgb(1, 2, 3)).unwrap();
    assert_eq!(json, "\"#010203\"");
    let back: Color = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Color::rgb(1, 2, 3));
    assert!(serde_json::from_str::<Color>("\"red\"").is_err());
}

// --- FitMode ---

#[test]
fn fit_mode_default_is_cover() {
    assert_eq!(FitMode::default(), FitMode::Cover);
}

#[test]
fn fit_mode_cycle() {
    assert_eq!(FitMode::Fill.next(), FitMode::Contain);
    assert_eq!(FitMode::Contain.next(), FitMode::Cover);
    assert_eq!(FitMode::Cover.next(), FitMode::Fill);
}

#[test]
fn fit_mode_parse() {
    assert_eq!("contain".parse::<FitMode>(), Ok(FitMode::Contain));
    assert_eq!("tile".parse::<FitMode>(), Err(ParseError::FitMode("tile".into())));
}

// --- Preferences ---

#[test]
fn preferences_defaults() {
    let prefs = Preferences::default();
    assert!(prefs.show_grid);
    assert!(prefs.auto_advance);
    assert!(!prefs.show_info);
    assert_eq!(prefs.direction, Direction::Right);
    assert_eq!(prefs.fit, FitMode::Cover);
    assert_eq!(prefs.colors.foreground, Color::BLACK);
    assert_eq!(prefs.colors.background, Color::WHITE);
}

#[test]
fn preferences_missing_fields_take_defaults() {
    let prefs: Preferences = serde_json::from_str(r#"{"direction":"up","fit":"fill"}"#).unwrap();
    assert_eq!(prefs.direction, Direction::Up);
    assert_eq!(prefs.fit, FitMode::Fill);
    assert!(prefs.show_grid);
    assert!(prefs.auto_advance);
}
