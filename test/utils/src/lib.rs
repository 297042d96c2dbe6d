#![allow(clippy::needless_return)]

/// A 1x1 transparent PNG, base64 encoded the same way the generation API
/// returns artifacts.
pub fn png_base64_fixture() -> &'static str {
    return "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
}

/// Successful text-to-image response body carrying a single artifact.
pub fn artifacts_response_fixture(base64: &str) -> String {
    return serde_json::json!({
        "artifacts": [
            {
                "base64": base64,
                "seed": 1050625087,
                "finishReason": "SUCCESS"
            }
        ]
    })
    .to_string();
}

/// Error body in the shape returned by the generation API.
pub fn error_response_fixture(message: &str) -> String {
    return serde_json::json!({
        "id": "9160aa70222f5d16a2f1c1b0a8ba5a8d",
        "name": "unauthorized",
        "message": message
    })
    .to_string();
}
