//! Test helpers for inbound HTTP components.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use serde_json::Value;

use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;

pub use crate::test_support::{TEST_PASSWORD, TestMarketplace, bearer};

/// App exposing every API route under `/api/v1`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(web::scope("/api/v1").configure(configure_api))
}

/// Error `code` field of a JSON error body.
pub fn error_code(body: &Value) -> &str {
    body["code"].as_str().unwrap_or_default()
}

/// Send `request` through a fresh app over `state`; the body is parsed as
/// JSON, or `Value::Null` when empty.
pub async fn send(state: &HttpState, request: actix_http::Request) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(state.clone())).await;
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    let body = serde_json::from_slice(&bytes).expect("response body is JSON");
    (status, body)
}
