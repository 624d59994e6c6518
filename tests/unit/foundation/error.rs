use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        WisdomError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        WisdomError::decode("x")
            .to_string()
            .contains("narration decode failed:")
    );
    assert!(
        WisdomError::unsupported_format("x")
            .to_string()
            .contains("recording not supported:")
    );
    assert!(
        WisdomError::surface_missing("x")
            .to_string()
            .contains("rendering surface not ready:")
    );
    assert!(
        WisdomError::synthesis("x")
            .to_string()
            .contains("narration synthesis failed:")
    );
}

#[test]
fn capture_failures_have_distinct_messages() {
    let messages = [
        WisdomError::decode("x").to_string(),
        WisdomError::unsupported_format("x").to_string(),
        WisdomError::surface_missing("x").to_string(),
    ];
    assert_ne!(messages[0], messages[1]);
    assert_ne!(messages[1], messages[2]);
    assert_ne!(messages[0], messages[2]);
}

#[test]
fn only_fetch_errors_are_transient() {
    assert!(WisdomError::fetch("timeout").is_transient());
    assert!(!WisdomError::synthesis("no audio").is_transient());
    assert!(!WisdomError::decode("odd length").is_transient());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = WisdomError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
