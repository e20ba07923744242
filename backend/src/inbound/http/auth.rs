//! Bearer token extractors.
//!
//! Handlers that need an identity take [`Authenticated`]; handlers open to
//! anonymous callers take [`MaybeAuthenticated`]. Both verify the token with
//! the [`TokenService`](crate::domain::ports::TokenService) held in
//! [`HttpState`]. A present but invalid header is rejected even on
//! anonymous-friendly routes.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use serde_json::json;
use tracing::debug;

use crate::domain::ports::TokenError;
use crate::domain::{Caller, Error, bearer_token};
use crate::inbound::http::state::HttpState;

/// Caller identity proven by a valid bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Caller);

impl Authenticated {
    pub fn caller(&self) -> &Caller {
        &self.0
    }
}

/// Caller identity when an `Authorization` header was sent.
#[derive(Debug, Clone)]
pub struct MaybeAuthenticated(pub Option<Caller>);

impl MaybeAuthenticated {
    pub fn caller(&self) -> Option<&Caller> {
        self.0.as_ref()
    }
}

fn token_error(error: &TokenError) -> Error {
    debug!(reason = error.reason_code(), "bearer token rejected");
    Error::unauthorized("invalid or expired token").with_details(json!({
        "code": error.reason_code(),
    }))
}

fn caller_from_request(req: &HttpRequest) -> Result<Option<Caller>, Error> {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let value = header
        .to_str()
        .map_err(|_| token_error(&TokenError::malformed("authorization header is not ASCII")))?;
    let token = bearer_token(value).map_err(|err| token_error(&err))?;
    let claims = state.tokens.verify(token).map_err(|err| token_error(&err))?;
    Ok(Some(Caller::from(claims)))
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(caller_from_request(req).and_then(|caller| {
            caller
                .map(Authenticated)
                .ok_or_else(|| Error::unauthorized("missing bearer token"))
        }))
    }
}

impl FromRequest for MaybeAuthenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(caller_from_request(req).map(MaybeAuthenticated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::inbound::http::test_utils::{TestMarketplace, bearer};
    use actix_web::{App, HttpResponse, http::StatusCode, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    async fn whoami(auth: Authenticated) -> HttpResponse {
        HttpResponse::Ok().body(auth.caller().user_id().to_string())
    }

    async fn maybe(auth: MaybeAuthenticated) -> HttpResponse {
        HttpResponse::Ok().body(if auth.caller().is_some() { "user" } else { "anon" })
    }

    async fn call(
        market: &TestMarketplace,
        path: &str,
        header: Option<String>,
    ) -> actix_web::dev::ServiceResponse {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(market.state.clone()))
                .route("/whoami", web::get().to(whoami))
                .route("/maybe", web::get().to(maybe)),
        )
        .await;
        let mut request = actix_test::TestRequest::get().uri(path);
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value));
        }
        actix_test::call_service(&app, request.to_request()).await
    }

    #[rstest]
    #[actix_web::test]
    async fn valid_tokens_resolve_the_caller() {
        let market = TestMarketplace::new();
        let account = market.listener("ada");

        let response = call(&market, "/whoami", Some(bearer(&market.token_for(&account)))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        assert_eq!(body, account.id.to_string().as_bytes());
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_tokens_are_unauthorized() {
        let market = TestMarketplace::new();
        let response = call(&market, "/whoami", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case::wrong_scheme("Basic abc", "malformed_token")]
    #[case::garbage("Bearer a.b.c", "malformed_token")]
    #[actix_web::test]
    async fn bad_tokens_report_a_reason(#[case] header: &str, #[case] reason: &str) {
        let market = TestMarketplace::new();
        let response = call(&market, "/whoami", Some(header.to_owned())).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "unauthorized");
        assert_eq!(body["details"]["code"], reason);
    }

    #[rstest]
    #[actix_web::test]
    async fn anonymous_requests_pass_the_optional_extractor() {
        let market = TestMarketplace::new();
        let response = call(&market, "/maybe", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(response).await, "anon".as_bytes());
    }

    #[rstest]
    fn token_errors_map_to_unauthorized() {
        let err = token_error(&TokenError::Expired);
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.details(), Some(&json!({"code": "token_expired"})));
    }
}
