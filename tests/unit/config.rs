use super::*;

#[test]
fn empty_json_yields_defaults() {
    let cfg = AppConfig::from_json("{}").unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert_eq!(cfg.output.fps, 30);
    assert_eq!(cfg.sample_rate, 24_000);
    assert_eq!(cfg.retry_delay(), Duration::from_millis(2000));
    assert_eq!(cfg.pexels.per_page, 15);
    assert!(!cfg.quote_fallback);
}

#[test]
fn partial_json_keeps_other_defaults() {
    let cfg = AppConfig::from_json(r#"{"output": {"fps": 24}, "retry_delay_ms": 50}"#).unwrap();
    assert_eq!(cfg.output.fps, 24);
    assert_eq!(cfg.output.dir, PathBuf::from("out"));
    assert_eq!(cfg.retry_delay_ms, 50);
    assert_eq!(cfg.gemini.quote_model, "gemini-3-flash-preview");
}

#[test]
fn zero_fps_is_rejected() {
    let err = AppConfig::from_json(r#"{"output": {"fps": 0}}"#).unwrap_err();
    assert!(matches!(err, WisdomError::Config(_)));
}

#[test]
fn malformed_json_is_a_config_error() {
    assert!(matches!(
        AppConfig::from_json("{not json").unwrap_err(),
        WisdomError::Config(_)
    ));
}

#[test]
fn env_overrides_keys_and_fonts() {
    let mut cfg = AppConfig::default();
    cfg.apply_env(|k| match k {
        "API_KEY" => Some("fallback-key".to_string()),
        "PEXELS_API_KEY" => Some("px".to_string()),
        "ALIWISDOM_FONTS_DIR" => Some("/opt/fonts".to_string()),
        _ => None,
    });
    assert_eq!(cfg.gemini.api_key, "fallback-key");
    assert_eq!(cfg.pexels.api_key, "px");
    assert_eq!(cfg.fonts.primary, PathBuf::from("/opt/fonts/Amiri-Regular.ttf"));
    assert_eq!(cfg.fonts.ui, PathBuf::from("/opt/fonts/Inter-Regular.ttf"));
}

#[test]
fn gemini_key_wins_over_generic_key_and_blank_is_ignored() {
    let mut cfg = AppConfig::default();
    cfg.gemini.api_key = "from-file".to_string();
    cfg.apply_env(|k| match k {
        "GEMINI_API_KEY" => Some("g".to_string()),
        "API_KEY" => Some("a".to_string()),
        "PEXELS_API_KEY" => Some("  ".to_string()),
        _ => None,
    });
    assert_eq!(cfg.gemini.api_key, "g");
    assert!(cfg.pexels.api_key.is_empty());
}

#[test]
fn load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    std::fs::write(&path, r#"{"quote_fallback": true}"#).unwrap();
    assert!(AppConfig::load(&path).unwrap().quote_fallback);
    assert!(AppConfig::load(&dir.path().join("missing.json")).is_err());
}
