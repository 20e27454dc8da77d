//! Contract tests for the published schemas.

use chainhook_core::models::{SubscriptionFilters, SubscriptionKind};
use chainhook_core::validation::{filter_option, FieldPath, HexFormat, HexToken, Rule};
use chainhook_core::{default_schemas, ErrorKind, SchemaName, SchemaSet, TokenSets};
use proptest::prelude::*;
use serde_json::{json, Value};

const ADDRESS: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
const TOPIC: &str = "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";
const METHOD: &str = "0xA9059CBB";
const UUID_A: &str = "6f1e2d3c-4b5a-4978-8a6b-5c4d3e2f1a0b";
const UUID_B: &str = "0b9c8d7e-6f5a-4b3c-9d2e-1f0a9b8c7d6e";

fn create_log_request() -> Value {
    json!({
        "name": "WETH transfers",
        "type": "log",
        "description": "Transfer events on WETH",
        "webhookUrl": "https://hooks.example.com/weth",
        "filters": {"address": ADDRESS, "topic0": TOPIC, "topic1": null}
    })
}

fn subscription_record() -> Value {
    let mut record = create_log_request();
    let fields = json!({
        "id": UUID_A,
        "timestamp": 1_536_000_000_000u64,
        "user": "auth0|5b8f",
        "secret": "0f".repeat(32),
        "status": "active",
        "subscriptionArn": "arn:aws:sns:us-east-1:123456789012:sub-1"
    });
    for (k, v) in fields.as_object().unwrap() {
        record[k] = v.clone();
    }
    record
}

fn scope_schemas() -> SchemaSet {
    SchemaSet::new(TokenSets {
        subscription_types: vec!["log".into(), "transaction".into()],
        subscription_statuses: vec!["active".into(), "deactivated".into()],
        scopes: vec!["read".into(), "write".into()],
    })
    .unwrap()
}

#[test]
fn test_log_request_rejects_transaction_filters() {
    let mut request = create_log_request();
    request["filters"] = json!({"from": ADDRESS});

    let errors = default_schemas()
        .validate(SchemaName::CreateSubscriptionRequest, &request)
        .unwrap_err();
    assert!(errors.has("filters.from", ErrorKind::UnknownField));
}

#[test]
fn test_log_request_accepts_log_filters() {
    let accepted = default_schemas()
        .validate(SchemaName::CreateSubscriptionRequest, &create_log_request())
        .unwrap();
    assert_eq!(accepted["filters"]["address"], json!(ADDRESS.to_lowercase()));
    assert_eq!(accepted["filters"]["topic1"], Value::Null);
}

#[test]
fn test_non_log_request_uses_transaction_filters() {
    let request = json!({
        "name": "token sends",
        "type": "transaction",
        "webhookUrl": "http://localhost:8080/hook",
        "filters": {"to": [ADDRESS], "methodSignature": METHOD}
    });
    let typed = default_schemas().create_subscription_request(&request).unwrap();
    assert_eq!(typed.filters.kind(), SubscriptionKind::Transaction);
    match typed.filters {
        SubscriptionFilters::Transaction(filter) => {
            assert_eq!(filter.method_signature.values()[0].as_str(), "0xa9059cbb");
            assert_eq!(filter.to.values()[0].as_str(), ADDRESS.to_lowercase());
        }
        other => panic!("expected transaction filters, got {:?}", other),
    }

    let mut wrong = request.clone();
    wrong["filters"] = json!({"topic0": TOPIC});
    assert!(default_schemas()
        .validate(SchemaName::CreateSubscriptionRequest, &wrong)
        .unwrap_err()
        .has("filters.topic0", ErrorKind::UnknownField));
}

#[test]
fn test_create_request_rejects_unknown_top_level_fields() {
    let mut request = create_log_request();
    request["id"] = json!(UUID_A);

    let errors = default_schemas()
        .validate(SchemaName::CreateSubscriptionRequest, &request)
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.has("id", ErrorKind::UnknownField));
}

#[test]
fn test_create_request_field_rules() {
    let request = json!({
        "name": "",
        "type": "log",
        "description": "d".repeat(1025),
        "webhookUrl": "ftp://example.com/hook",
        "filters": {}
    });
    let errors = default_schemas()
        .validate(SchemaName::CreateSubscriptionRequest, &request)
        .unwrap_err();
    assert!(errors.has("name", ErrorKind::Range));
    assert!(errors.has("description", ErrorKind::Range));
    assert!(errors.has("webhookUrl", ErrorKind::Format));

    let errors = default_schemas()
        .validate(SchemaName::CreateSubscriptionRequest, &json!({}))
        .unwrap_err();
    for field in ["name", "type", "webhookUrl", "filters"] {
        assert!(errors.has(field, ErrorKind::RequiredField), "{}", field);
    }
}

#[test]
fn test_webhook_url_needs_web_host() {
    let mut request = create_log_request();
    request["webhookUrl"] = json!("http://intranet/hook");
    assert!(default_schemas()
        .validate(SchemaName::CreateSubscriptionRequest, &request)
        .unwrap_err()
        .has("webhookUrl", ErrorKind::Format));
}

#[test]
fn test_unknown_type_is_enum_error() {
    let mut request = create_log_request();
    request["type"] = json!("block");
    let errors = default_schemas()
        .validate(SchemaName::CreateSubscriptionRequest, &request)
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.has("type", ErrorKind::Enum));
}

#[test]
fn test_example_request_defaults_to_log_filters() {
    let schemas = default_schemas();

    let typed = schemas
        .example_request(&json!({"filters": {"topic0": [TOPIC, TOPIC]}}))
        .unwrap();
    assert_eq!(typed.filters.kind(), SubscriptionKind::Log);

    let errors = schemas
        .validate(SchemaName::GetExampleRequest, &json!({"filters": {"from": ADDRESS}}))
        .unwrap_err();
    assert!(errors.has("filters.from", ErrorKind::UnknownField));

    let typed = schemas
        .example_request(&json!({"type": "transaction", "filters": {"from": ADDRESS}}))
        .unwrap();
    assert_eq!(typed.filters.kind(), SubscriptionKind::Transaction);

    assert!(schemas
        .validate(SchemaName::GetExampleRequest, &json!({"type": "log"}))
        .unwrap_err()
        .has("filters", ErrorKind::RequiredField));
}

#[test]
fn test_subscription_record() {
    let schemas = default_schemas();
    let typed = schemas.subscription(&subscription_record()).unwrap();
    assert_eq!(typed.status, "active");
    assert_eq!(typed.request.filters.kind(), SubscriptionKind::Log);

    let mut bad = subscription_record();
    bad["secret"] = json!("0f".repeat(31));
    bad["status"] = json!("paused");
    bad["id"] = json!("6f1e2d3c-4b5a-1978-8a6b-5c4d3e2f1a0b");
    bad.as_object_mut().unwrap().remove("subscriptionArn");

    let errors = schemas.validate(SchemaName::Subscription, &bad).unwrap_err();
    assert!(errors.has("secret", ErrorKind::Range));
    assert!(errors.has("status", ErrorKind::Enum));
    assert!(errors.has("id", ErrorKind::Format));
    assert!(errors.has("subscriptionArn", ErrorKind::RequiredField));
}

#[test]
fn test_api_key_scopes() {
    let schemas = scope_schemas();

    assert!(schemas
        .validate(SchemaName::CreateApiKeyRequest, &json!({"name": "ci", "scopes": ["read"]}))
        .is_ok());

    let errors = schemas
        .validate(SchemaName::CreateApiKeyRequest, &json!({"name": "ci", "scopes": ["read", "read"]}))
        .unwrap_err();
    assert!(errors.has("scopes[1]", ErrorKind::Duplicate));

    let errors = schemas
        .validate(SchemaName::CreateApiKeyRequest, &json!({"name": "ci", "scopes": []}))
        .unwrap_err();
    assert!(errors.has("scopes", ErrorKind::Range));

    let errors = schemas
        .validate(SchemaName::CreateApiKeyRequest, &json!({"name": "ci", "scopes": ["admin"]}))
        .unwrap_err();
    assert!(errors.has("scopes[0]", ErrorKind::Enum));
}

#[test]
fn test_api_key_record() {
    let schemas = scope_schemas();
    let key = schemas
        .api_key(&json!({
            "name": "ci",
            "scopes": ["read", "write"],
            "id": "key-1",
            "user": "user-1",
            "secret": "opaque"
        }))
        .unwrap();
    assert!(key.has_scope("write"));

    let errors = schemas
        .validate(SchemaName::ApiKey, &json!({"name": "ci", "scopes": ["read"]}))
        .unwrap_err();
    for field in ["id", "user", "secret"] {
        assert!(errors.has(field, ErrorKind::RequiredField), "{}", field);
    }
}

#[test]
fn test_webhook_receipt() {
    let receipt = json!({
        "id": UUID_A,
        "subscriptionId": UUID_B,
        "url": "https://hooks.example.com/weth",
        "timestamp": 1_536_000_000_000u64,
        "result": {"success": true, "statusCode": 200}
    });
    let typed = default_schemas().webhook_receipt(&receipt).unwrap();
    assert!(typed.result.success);
    assert!(typed.received_at().is_some());

    let mut bad = receipt.clone();
    bad["timestamp"] = json!("not-a-number");
    let errors = default_schemas()
        .validate(SchemaName::WebhookReceipt, &bad)
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.has("timestamp", ErrorKind::Format));

    let mut bad = receipt;
    bad["result"] = json!({"success": "maybe"});
    let errors = default_schemas()
        .validate(SchemaName::WebhookReceipt, &bad)
        .unwrap_err();
    assert!(errors.has("result.success", ErrorKind::Format));
    assert!(errors.has("result.statusCode", ErrorKind::RequiredField));
}

const MALFORMED_URIS: [&str; 3] = [
    r"http:\\example.com\hook",
    "http:///example.com",
    "http://example.com/a|b<c>{d}",
];

#[test]
fn test_malformed_uris_rejected_on_every_uri_field() {
    for uri in MALFORMED_URIS {
        let receipt = json!({
            "id": UUID_A,
            "subscriptionId": UUID_B,
            "url": uri,
            "timestamp": 1_536_000_000_000u64,
            "result": {"success": true, "statusCode": 200}
        });
        let errors = default_schemas()
            .validate(SchemaName::WebhookReceipt, &receipt)
            .unwrap_err();
        assert_eq!(errors.len(), 1, "{}", uri);
        assert!(errors.has("url", ErrorKind::Format), "{}", uri);

        let mut request = create_log_request();
        request["webhookUrl"] = json!(uri);
        let errors = default_schemas()
            .validate(SchemaName::CreateSubscriptionRequest, &request)
            .unwrap_err();
        assert_eq!(errors.len(), 1, "{}", uri);
        assert!(errors.has("webhookUrl", ErrorKind::Format), "{}", uri);
    }
}

#[test]
fn test_scalar_coercion_is_idempotent() {
    let result = json!({"success": "true", "statusCode": "500"});
    let once = default_schemas()
        .validate(SchemaName::WebhookReceiptResult, &result)
        .unwrap();
    assert_eq!(once, json!({"success": true, "statusCode": 500}));
    let twice = default_schemas()
        .validate(SchemaName::WebhookReceiptResult, &once)
        .unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_errors_render_as_response_body() {
    let errors = default_schemas()
        .validate(SchemaName::SubscriptionTransactionFilter, &json!({"from": []}))
        .unwrap_err();
    let body = errors.to_response_body();
    assert_eq!(body["errors"][0]["path"], json!("from"));
    assert_eq!(body["errors"][0]["kind"], json!("filter_shape"));
}

fn hex_string(len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![Just('a'), Just('F'), Just('0'), Just('9'), Just('c'), Just('E')],
        len,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_hex_formats_accept_and_lowercase(
        address in hex_string(40),
        topic in hex_string(64),
        method in hex_string(8),
    ) {
        for (format, body) in [
            (HexFormat::Address, &address),
            (HexFormat::Topic, &topic),
            (HexFormat::MethodSignature, &method),
        ] {
            let candidate = format!("0x{}", body);
            prop_assert_eq!(format.normalize(&candidate), Some(candidate.to_lowercase()));
        }
    }

    #[test]
    fn prop_hex_formats_reject_wrong_length(len in 0usize..80) {
        prop_assume!(len != 40);
        let candidate = format!("0x{}", "a".repeat(len));
        prop_assert!(HexFormat::Address.normalize(&candidate).is_none());
    }

    #[test]
    fn prop_hex_formats_reject_non_hex(position in 0usize..40, bad in "[g-zG-Z_ ]") {
        let mut chars: Vec<char> = "a".repeat(40).chars().collect();
        chars[position] = bad.chars().next().unwrap();
        let candidate = format!("0x{}", chars.into_iter().collect::<String>());
        prop_assert!(HexFormat::Address.normalize(&candidate).is_none());
    }

    #[test]
    fn prop_filter_arrays_within_bounds(count in 1usize..=100) {
        let rule = filter_option(HexToken::topic());
        let values: Vec<String> = (0..count).map(|i| format!("0x{:064x}", i)).collect();
        let accepted = rule.check(&json!(values), &FieldPath::root().key("topic0"));
        prop_assert_eq!(accepted.unwrap(), json!(values));
    }

    #[test]
    fn prop_filter_arrays_reject_any_bad_element(count in 1usize..=100, bad_index in 0usize..100) {
        let bad_index = bad_index % count;
        let rule = filter_option(HexToken::topic());
        let mut values: Vec<String> = (0..count).map(|i| format!("0x{:064x}", i)).collect();
        values[bad_index] = "0x1234".to_string();
        let errors = rule
            .check(&json!(values), &FieldPath::root().key("topic0"))
            .unwrap_err();
        prop_assert_eq!(errors.len(), 1);
        prop_assert_eq!(errors[0].kind, ErrorKind::FilterShape);
        prop_assert_eq!(errors[0].path.as_str(), format!("topic0[{}]", bad_index));
    }

    #[test]
    fn prop_accepted_values_are_fixed_points(address in hex_string(40), topics in proptest::collection::vec(hex_string(64), 1..5)) {
        let topics: Vec<String> = topics.into_iter().map(|t| format!("0x{}", t)).collect();
        let request = json!({
            "name": "prop",
            "type": "log",
            "webhookUrl": "https://example.com/hook",
            "filters": {"address": format!("0x{}", address), "topic2": topics}
        });
        let once = default_schemas().validate(SchemaName::CreateSubscriptionRequest, &request).unwrap();
        let twice = default_schemas().validate(SchemaName::CreateSubscriptionRequest, &once).unwrap();
        prop_assert_eq!(once, twice);
    }
}
