//! Failure-envelope rendering: every error carries a machine-readable code.

use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::ResponseError;
use serde_json::Value;

use stridelands_server::error::Error;

async fn envelope(err: Error) -> Value {
    let resp = err.error_response();
    let body = to_bytes(resp.into_body()).await.expect("body");
    serde_json::from_slice(&body).expect("json envelope")
}

#[actix_rt::test]
async fn precondition_failures_name_the_unmet_condition() {
    let err = Error::Precondition("not enough bases assigned to start: need 2, have 0".into());
    assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let v = envelope(err).await;
    assert_eq!(v["success"], false);
    assert_eq!(v["code"], "precondition_error");
    assert!(v["error"].as_str().unwrap().contains("bases"));
}

#[actix_rt::test]
async fn every_kind_has_a_distinct_code_and_status() {
    let cases = [
        (Error::Validation("v".into()), "validation_error", StatusCode::BAD_REQUEST),
        (Error::NotFound("n".into()), "not_found_error", StatusCode::NOT_FOUND),
        (Error::Authorization("a".into()), "authorization_error", StatusCode::FORBIDDEN),
        (Error::State("s".into()), "state_error", StatusCode::UNPROCESSABLE_ENTITY),
        (Error::Conflict("c".into()), "conflict_error", StatusCode::CONFLICT),
        (Error::Capacity("f".into()), "capacity_error", StatusCode::CONFLICT),
        (Error::Retryable("r".into()), "retryable_error", StatusCode::SERVICE_UNAVAILABLE),
    ];

    for (err, code, status) in cases {
        assert_eq!(err.status_code(), status, "{code}");
        let v = envelope(err).await;
        assert_eq!(v["code"], code);
        assert_eq!(v["success"], false);
    }
}

#[actix_rt::test]
async fn retryable_errors_are_the_only_transient_kind() {
    assert!(Error::Retryable("contention".into()).is_transient());
    assert!(!Error::Conflict("dup".into()).is_transient());
    assert!(!Error::Validation("bad".into()).is_transient());
}
