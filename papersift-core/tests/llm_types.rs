use papersift_core::{LlmRequest, LlmResponse, Role, TokenUsage, DEFAULT_SEED};

#[test]
fn deterministic_request_is_single_user_message() {
    let req = LlmRequest::deterministic("gpt-4o-mini", "rank these papers");
    assert_eq!(req.messages.len(), 1);
    assert_eq!(req.messages[0].role, Role::User);
    assert_eq!(req.temperature, 0.0);
    assert_eq!(req.seed, DEFAULT_SEED);

    let value = serde_json::to_value(req).expect("serialize request");
    assert_eq!(value["model"], "gpt-4o-mini");
    assert_eq!(value["messages"][0]["role"], "user");
    assert_eq!(value["messages"][0]["content"], "rank these papers");
}

#[test]
fn token_usage_defaults_cached_tokens() {
    let usage: TokenUsage =
        serde_json::from_str(r#"{"prompt_tokens": 10, "completion_tokens": 4}"#).unwrap();
    assert_eq!(usage.cached_tokens, 0);
    assert_eq!(usage.total_tokens(), 14);

    let response = LlmResponse {
        content: "[]".to_string(),
        usage,
    };
    let value = serde_json::to_value(response).expect("serialize response");
    assert_eq!(value["usage"]["prompt_tokens"], 10);
}
