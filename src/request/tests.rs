use super::*;
use crate::response::ResponseBlock;
use serde_json::json;

#[test]
fn test_required_fields_encoded() {
    let request = LoginRequest::new("Test", "User", "$1$abc", "home");
    let map = request.to_canonical();

    assert_eq!(map["first"], "Test");
    assert_eq!(map["last"], "User");
    assert_eq!(map["passwd"], "$1$abc");
    assert_eq!(map["start"], "home");
    assert_eq!(map["options"], json!([]));
    // Unset optional fields are left out entirely
    assert!(!map.contains_key("channel"));
    assert!(!map.contains_key("agree_to_tos"));
    assert_eq!(map.len(), 5);
}

#[test]
fn test_platform_field_carries_platform() {
    let request = LoginRequest {
        version: Some("1.0".to_string()),
        platform: Some("lin".to_string()),
        ..LoginRequest::new("a", "b", "c", "last")
    };
    let map = request.to_canonical();
    assert_eq!(map["platform"], "lin");
    assert_eq!(map["version"], "1.0");
}

#[test]
fn test_with_defaults_fills_identity() {
    let request = LoginRequest::with_defaults("first", "last", "passwd", "home", true, false);

    assert_eq!(request.first, "first");
    assert_eq!(request.channel.as_deref(), Some("gridlogin"));
    assert_eq!(request.version.as_deref(), Some(env!("CARGO_PKG_VERSION")));
    assert!(matches!(request.platform.as_deref(), Some("lin" | "mac" | "win")));
    assert_eq!(request.agree_to_tos, Some(true));
    assert_eq!(request.read_critical, Some(false));
    for block in ResponseBlock::ALL {
        assert!(request.options.includes(block));
    }
}

#[test]
fn test_options_wire_form_keeps_legacy_names() {
    let options = LoginOptions::none()
        .with(ResponseBlock::InventoryRoot)
        .with(ResponseBlock::BuddyList)
        .with(ResponseBlock::ClassifiedCategories);
    assert_eq!(
        options.to_canonical(),
        json!(["inventory-root", "buddy-list", "classified_categories"])
    );
}

#[test]
fn test_options_keep_unknown_names() {
    let options = LoginOptions::from_wire_keys([
        "inventory-skeleton",
        "adult_compliant",
        "voice-config",
        "adult_compliant",
    ]);

    assert!(options.includes(ResponseBlock::InventorySkeleton));
    assert!(!options.includes(ResponseBlock::InventoryRoot));
    assert_eq!(options.extra(), ["adult_compliant", "voice-config"]);
    assert_eq!(
        options.to_canonical(),
        json!(["inventory-skeleton", "adult_compliant", "voice-config"])
    );
}

#[test]
fn test_options_without() {
    let options = LoginOptions::all().without(ResponseBlock::Gestures);
    assert!(!options.includes(ResponseBlock::Gestures));
    assert_eq!(options.blocks().count(), ResponseBlock::ALL.len() - 1);
}

#[test]
fn test_request_decodes_encoded_request() {
    let request = LoginRequest {
        mac: Some("00:11:22:33:44:55".to_string()),
        last_exec_event: Some(0),
        skipoptional: Some(false),
        options: LoginOptions::none().with(ResponseBlock::UiConfig),
        ..LoginRequest::with_defaults("Test", "User", "$1$abc", "last", true, true)
    };

    let decoded = LoginRequest::from_canonical(&request.to_canonical()).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn test_missing_required_field() {
    let value = json!({ "first": "Test", "last": "User", "start": "home" });
    assert_eq!(
        LoginRequest::try_from(&value).unwrap_err(),
        RequestError::MissingField("passwd")
    );

    let empty_first = json!({ "first": "", "last": "User", "passwd": "x", "start": "home" });
    assert_eq!(
        LoginRequest::try_from(&empty_first).unwrap_err(),
        RequestError::MissingField("first")
    );

    let blank_start = json!({ "first": "Test", "last": "User", "passwd": "x", "start": "   " });
    assert_eq!(
        LoginRequest::try_from(&blank_start).unwrap_err(),
        RequestError::MissingField("start")
    );
}

#[test]
fn test_wrong_shapes_rejected() {
    assert_eq!(
        LoginRequest::try_from(&json!("login")).unwrap_err(),
        RequestError::NotAMap
    );

    let numeric_name = json!({ "first": 1, "last": "User", "passwd": "x", "start": "home" });
    assert_eq!(
        LoginRequest::try_from(&numeric_name).unwrap_err(),
        RequestError::InvalidType {
            key: "first",
            expected: "a string"
        }
    );

    let bad_options = json!({ "first": "a", "last": "b", "passwd": "x", "start": "home", "options": "all" });
    assert!(matches!(
        LoginRequest::try_from(&bad_options),
        Err(RequestError::InvalidType { key: "options", .. })
    ));

    let mixed_options = json!({
        "first": "a",
        "last": "b",
        "passwd": "x",
        "start": "home",
        "options": ["inventory-root", 3],
    });
    assert!(matches!(
        LoginRequest::try_from(&mixed_options),
        Err(RequestError::InvalidType { key: "options", .. })
    ));
}

#[test]
fn test_lenient_optional_fields() {
    let value = json!({
        "first": "a",
        "last": "b",
        "passwd": "x",
        "start": "home",
        "address_size": 64,
        "agree_to_tos": "true",
    });
    let request = LoginRequest::try_from(&value).unwrap();
    assert_eq!(request.address_size.as_deref(), Some("64"));
    assert_eq!(request.agree_to_tos, Some(true));
    assert_eq!(request.options, LoginOptions::none());
}
