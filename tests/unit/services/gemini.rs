use super::*;

#[test]
fn quote_is_read_from_candidate_text() {
    let inner = r#"{"arabic":"اَلصَّبْرُ","urdu":"صبر","narrationScript":"صبر کرو","source":"Nahj al-Balagha","category":"Patience"}"#;
    let body = json!({
        "candidates": [{ "content": { "parts": [{ "text": inner }] } }]
    })
    .to_string();
    let quote = parse_quote_response(&body).unwrap();
    assert_eq!(quote.urdu, "صبر");
    assert_eq!(quote.category, "Patience");
}

#[test]
fn quote_text_split_across_parts_is_joined() {
    let body = json!({
        "candidates": [{ "content": { "parts": [
            { "text": "{\"urdu\":\"x\",\"narrationScript\":" },
            { "text": "\"y\",\"source\":\"s\"}" }
        ] } }]
    })
    .to_string();
    let quote = parse_quote_response(&body).unwrap();
    assert!(quote.arabic.is_empty());
    assert_eq!(quote.narration_script, "y");
}

#[test]
fn quote_failures_are_fetch_errors() {
    for body in [
        "not json".to_string(),
        json!({ "candidates": [] }).to_string(),
        json!({ "candidates": [{ "content": { "parts": [{ "text": "{}" }] } }] }).to_string(),
        json!({ "candidates": [{ "content": { "parts": [{ "text": "  " }] } }] }).to_string(),
    ] {
        let err = parse_quote_response(&body).unwrap_err();
        assert!(err.is_transient(), "{body}: {err}");
    }
}

#[test]
fn audio_payload_is_taken_from_inline_data() {
    let body = json!({
        "candidates": [{ "content": { "parts": [
            { "inlineData": { "mimeType": "audio/L16;rate=24000", "data": "AAAA" } }
        ] } }]
    })
    .to_string();
    assert_eq!(parse_audio_response(&body).unwrap(), "AAAA");
}

#[test]
fn missing_audio_is_a_synthesis_error() {
    let body = json!({ "candidates": [{ "content": { "parts": [{ "text": "sorry" }] } }] })
        .to_string();
    let err = parse_audio_response(&body).unwrap_err();
    assert!(matches!(err, WisdomError::Synthesis(_)));
    assert!(!err.is_transient());
}

#[test]
fn error_body_is_summarized() {
    let body = r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#;
    assert_eq!(
        extract_gemini_error(body).unwrap(),
        "API key not valid | type: PERMISSION_DENIED | code: 403"
    );
    assert!(extract_gemini_error("<html>").is_none());
}

#[test]
fn request_bodies_carry_schema_and_voice() {
    let q = quote_request_body("courage bravery fearlessness");
    assert_eq!(q["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(
        q["generationConfig"]["responseSchema"]["required"]
            .as_array()
            .unwrap()
            .len(),
        5
    );
    assert!(
        q["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("\"courage bravery fearlessness\"")
    );

    let n = narration_request_body("script", Voice::Zephyr);
    assert_eq!(n["generationConfig"]["responseModalities"][0], "AUDIO");
    assert_eq!(
        n["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
        "Zephyr"
    );
    assert!(narration_prompt("abc").ends_with("Script:\nabc"));
}

#[test]
fn fallback_quote_is_valid() {
    let q = fallback_quote();
    q.validate().unwrap();
    assert_eq!(q.category, "Wisdom");
}

#[tokio::test]
async fn missing_key_fails_fast_or_falls_back() {
    let cfg = GeminiConfig::default();
    let client = GeminiClient::new(&cfg);
    let err = client.fetch_quote("wisdom").await.unwrap_err();
    assert!(err.is_transient());

    let err = client.synthesize("x", Voice::Charon).await.unwrap_err();
    assert!(matches!(err, WisdomError::Synthesis(_)));

    let quote = client.with_fallback(true).fetch_quote("wisdom").await.unwrap();
    assert_eq!(quote, fallback_quote());
}
