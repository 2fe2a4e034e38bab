use std::collections::BTreeMap;

use super::*;

#[test]
fn resolved_url_appends_query_pairs() {
    let spec = RequestSpec::get("https://inventory.example.com/v1/inventory")
        .with_query("productIds", "12345");
    assert_eq!(
        spec.resolved_url().unwrap().as_str(),
        "https://inventory.example.com/v1/inventory?productIds=12345"
    );
}

#[test]
fn resolved_url_keeps_existing_query() {
    let spec =
        RequestSpec::get("https://inventory.example.com/inv?channel=0").with_query("productIds", "7");
    assert_eq!(
        spec.resolved_url().unwrap().as_str(),
        "https://inventory.example.com/inv?channel=0&productIds=7"
    );
}

#[test]
fn resolved_url_encodes_values() {
    let spec = RequestSpec::get("https://search.example.com/s").with_query("q", "Jace, the Mind Sculptor");
    assert_eq!(
        spec.resolved_url().unwrap().as_str(),
        "https://search.example.com/s?q=Jace%2C+the+Mind+Sculptor"
    );
}

#[test]
fn resolved_url_rejects_invalid_base() {
    let err = RequestSpec::get("not-a-url").resolved_url().unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidUrl { .. }),
        "expected InvalidUrl, got: {err:?}"
    );
}

#[test]
fn with_headers_copies_profile_headers() {
    let mut headers = BTreeMap::new();
    headers.insert("Authorization".to_string(), "Bearer abc".to_string());
    headers.insert("X-Store".to_string(), "octopus".to_string());
    let spec = RequestSpec::post_json("https://search.example.com", serde_json::json!({}))
        .with_headers(&headers);
    assert_eq!(spec.method, Method::POST);
    assert_eq!(
        spec.headers,
        vec![
            ("Authorization".to_string(), "Bearer abc".to_string()),
            ("X-Store".to_string(), "octopus".to_string()),
        ]
    );
}
