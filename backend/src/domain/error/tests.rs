//! Unit coverage for domain error construction and serialisation.

use super::*;
use rstest::rstest;
use serde_json::{Value, json};

#[rstest]
#[case(Error::no_session(), ErrorCode::NoSession, "permissionDenied", &["body"])]
#[case(Error::not_found("missing"), ErrorCode::NotFound, "notFound", &["path"])]
#[case(Error::forbidden("Not your code sample"), ErrorCode::Forbidden, "forbidden", &["body"])]
#[case(
    Error::invalid_identifier(["params", "id"]),
    ErrorCode::InvalidIdentifier,
    "invalidId",
    &["params", "id"]
)]
#[case(Error::duplicate_identity(), ErrorCode::DuplicateIdentity, "duplicateUser", &["body"])]
#[case(
    Error::invalid_credentials(),
    ErrorCode::InvalidCredentials,
    "invalidCredentials",
    &["body"]
)]
fn constructors_attach_field_triples(
    #[case] error: Error,
    #[case] code: ErrorCode,
    #[case] detail_code: &str,
    #[case] location: &[&str],
) {
    assert_eq!(error.code(), code);
    let [detail] = error.details() else {
        panic!("expected exactly one detail, got {:?}", error.details());
    };
    assert_eq!(detail.code(), detail_code);
    assert_eq!(detail.location(), location);
}

#[rstest]
fn validation_aggregates_all_field_errors() {
    let error = Error::validation(vec![
        FieldError::new("invalidValue", "Invalid page", ["query", "page"]),
        FieldError::new("invalidValue", "Invalid pageSize", ["query", "pageSize"]),
    ]);
    assert_eq!(error.code(), ErrorCode::ValidationFailed);
    assert_eq!(error.details().len(), 2);
}

#[rstest]
fn internal_errors_carry_no_details() {
    let error = Error::internal("connection reset by peer");
    assert!(error.details().is_empty());
    assert_eq!(error.to_string(), "connection reset by peer");
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields() {
    let value = serde_json::to_value(Error::internal("boom")).expect("serialise error");
    assert_eq!(value, json!({ "code": "internal_error", "message": "boom" }));
}

#[rstest]
fn serialises_trace_id_and_details() {
    let error = Error::invalid_identifier(["params", "id"]).with_trace_id("abc");
    let value = serde_json::to_value(error).expect("serialise error");
    assert_eq!(value.get("traceId").and_then(Value::as_str), Some("abc"));
    assert_eq!(
        value.pointer("/details/0/location"),
        Some(&json!(["params", "id"]))
    );
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
        .parse()
        .expect("valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::forbidden("nope") }).await;
    assert_eq!(error.trace_id(), Some("00000000-0000-0000-0000-000000000000"));
}

#[rstest]
fn new_without_scope_has_no_trace_id() {
    assert!(Error::internal("boom").trace_id().is_none());
}
