//! Shared helpers for the integration tests.
//!
//! Each integration test compiles as its own crate, so the blocking HTTP
//! driver and the embedded PostgreSQL plumbing live here instead of being
//! repeated per suite.

#![allow(dead_code)]

pub mod atexit_cleanup;
pub mod cluster_skip;
pub mod database;
pub mod embedded_postgres;

use actix_http::Request;
use actix_web::test as actix_test;
use actix_web::{App, web};
use marketplace::inbound::http::configure_api;
use marketplace::inbound::http::state::HttpState;
use serde_json::Value;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::provision_template_database;

/// Status code and JSON body of one response; `Value::Null` when the body
/// is empty.
pub type Exchange = (u16, Value);

/// Send `request` through a fresh `/api/v1` app over `state`, blocking
/// until the response is read.
///
/// Step functions are synchronous, so each call spins up its own actix
/// system.
pub fn perform(state: &HttpState, request: Request) -> Exchange {
    let state = state.clone();
    actix_rt::System::new().block_on(async move {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api/v1").configure(configure_api)),
        )
        .await;
        let response = actix_test::call_service(&app, request).await;
        let status = response.status().as_u16();
        let bytes = actix_test::read_body(response).await;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    })
}

/// Error `code` of a JSON error envelope.
pub fn error_code(body: &Value) -> Option<&str> {
    body.get("code").and_then(Value::as_str)
}

/// Render a `postgres` error with its SQLSTATE and detail.
///
/// `postgres::Error`'s `Display` often collapses database errors to a bare
/// `db error`, which says nothing useful in CI logs.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    if let Some(hint) = db_error.hint() {
        summary.push_str("; hint: ");
        summary.push_str(hint);
    }
    summary
}
