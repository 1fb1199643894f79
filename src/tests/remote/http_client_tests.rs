use super::*;

#[test]
fn error_message_prefers_message_then_description() {
    assert_eq!(
        error_message(r#"{"message": "duplicate key", "code": "23505"}"#).as_deref(),
        Some("duplicate key")
    );
    assert_eq!(
        error_message(r#"{"error": "invalid_grant", "error_description": "Invalid login credentials"}"#)
            .as_deref(),
        Some("Invalid login credentials")
    );
    assert_eq!(
        error_message(r#"{"msg": "Token has expired"}"#).as_deref(),
        Some("Token has expired")
    );
}

#[test]
fn error_message_is_none_for_blank_or_non_json_bodies() {
    assert_eq!(error_message(""), None);
    assert_eq!(error_message("<html>502</html>"), None);
    assert_eq!(error_message(r#"{"message": "  "}"#), None);
}
