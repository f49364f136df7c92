//! Configuration from environment-style lookups.

use std::collections::HashMap;
use std::path::PathBuf;
use wayfarer_core::{Config, ConfigError, ExposeSecret};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).filter(|v| !v.is_empty()).cloned()
}

#[test]
fn test_defaults_with_only_api_key() {
    let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "k")])).unwrap();

    assert_eq!(config.model.api_key.expose_secret(), "k");
    assert_eq!(config.model.chat_model, "gemini-2.5-flash");
    assert_eq!(config.model.embedding_model, "text-embedding-004");
    assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    assert!(config.search.api_key.is_none());
    assert_eq!(config.search.timeout_secs, 10);
    assert_eq!(
        config.data.kb_index_file(),
        PathBuf::from("data/knowledge_base.index.json")
    );
    assert_eq!(
        config.data.kb_texts_file(),
        PathBuf::from("data/knowledge_base_texts.json")
    );
    assert_eq!(config.data.preferences_file(), PathBuf::from("data/user_prefs.json"));
}

#[test]
fn test_overrides() {
    let config = Config::from_lookup(lookup(&[
        ("GEMINI_API_KEY", "k"),
        ("CUSTOM_SEARCH_API_KEY", "s"),
        ("CUSTOM_SEARCH_CX", "cx-1"),
        ("PORT", "9000"),
        ("WAYFARER_HOST", "0.0.0.0"),
        ("WAYFARER_DATA_DIR", "/var/lib/wayfarer"),
        ("WAYFARER_INDEX_HTML", "web/chat.html"),
    ]))
    .unwrap();

    assert_eq!(config.bind_addr(), "0.0.0.0:9000");
    assert_eq!(config.search.cx.as_deref(), Some("cx-1"));
    assert_eq!(config.server.index_html, PathBuf::from("web/chat.html"));
    assert_eq!(
        config.data.preferences_file(),
        PathBuf::from("/var/lib/wayfarer/user_prefs.json")
    );
}

#[test]
fn test_missing_api_key_refuses_to_start() {
    let err = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "")])).unwrap_err();
    assert!(matches!(err, ConfigError::Missing("GEMINI_API_KEY")));
}

#[test]
fn test_invalid_port() {
    let err = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "k"), ("PORT", "http")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
}
