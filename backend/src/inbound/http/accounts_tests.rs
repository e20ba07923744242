//! Handler tests for sign-up, admin provisioning, and artist onboarding.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::ports::TokenService;
use crate::inbound::http::test_utils::{TestMarketplace, bearer, error_code, send};

async fn post(market: &TestMarketplace, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut request = TestRequest::post().uri(uri).set_json(body);
    if let Some(token) = token {
        request = request.insert_header((AUTHORIZATION, bearer(token)));
    }
    send(&market.state, request.to_request()).await
}

fn sign_up(username: &str) -> Value {
    json!({
        "email": format!("{username}@example.com"),
        "username": username,
        "password": "afrobeats-forever",
    })
}

#[rstest]
#[actix_web::test]
async fn registered_accounts_can_log_in() {
    let market = TestMarketplace::new();

    let (status, body) = post(&market, "/api/v1/users", None, sign_up("asake")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "asake");
    assert_eq!(body["roles"], json!(["listener"]));
    assert!(body.get("passwordHash").is_none());

    let (login_status, login) = post(
        &market,
        "/api/v1/login",
        None,
        json!({"identifier": "asake@example.com", "password": "afrobeats-forever"}),
    )
    .await;
    assert_eq!(login_status, StatusCode::OK);
    assert_eq!(login["user"]["id"], body["id"]);
}

#[rstest]
#[case::same_email(json!({"email": "ASAKE@example.com", "username": "other", "password": "long-enough"}))]
#[case::same_username(json!({"email": "other@example.com", "username": "asake", "password": "long-enough"}))]
#[actix_web::test]
async fn taken_identifiers_are_conflicts(#[case] second: Value) {
    let market = TestMarketplace::new();
    let (first, _) = post(&market, "/api/v1/users", None, sign_up("asake")).await;
    assert_eq!(first, StatusCode::CREATED);

    let (status, body) = post(&market, "/api/v1/users", None, second).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "conflict");
}

#[rstest]
#[case(json!({"email": "nope", "username": "ada", "password": "long-enough"}), "email", "invalid_email")]
#[case(json!({"email": "ada@example.com", "username": "ada", "password": "short"}), "password", "weak_password")]
#[case(json!({"email": "ada@example.com", "password": "long-enough"}), "username", "missing_field")]
#[actix_web::test]
async fn malformed_sign_ups_name_the_field(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let market = TestMarketplace::new();

    let (status, response) = post(&market, "/api/v1/users", None, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["details"]["field"], field);
    assert_eq!(response["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn listeners_cannot_create_admins() {
    let market = TestMarketplace::new();
    let listener = market.listener("ada");
    let token = market.token_for(&listener);

    let (status, body) = post(&market, "/api/v1/admin/users", Some(&token), sign_up("ops")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "forbidden");
}

#[rstest]
#[actix_web::test]
async fn admins_create_admins() {
    let market = TestMarketplace::new();
    let admin = market.admin("grace");
    let token = market.token_for(&admin);

    let (status, body) = post(&market, "/api/v1/admin/users", Some(&token), sign_up("ops")).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["roles"], json!(["admin"]));
}

#[rstest]
#[actix_web::test]
async fn admin_sign_up_requires_a_token() {
    let market = TestMarketplace::new();

    let (status, _) = post(&market, "/api/v1/admin/users", None, sign_up("ops")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn a_new_artist_can_publish_and_withdraw_a_song() {
    let market = TestMarketplace::new();
    let user = market.listener("ayra");
    let token = market.token_for(&user);

    let (status, artist) = post(
        &market,
        "/api/v1/artists",
        Some(&token),
        json!({"artistName": "Ayra Starr"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(artist["userId"], json!(user.id.to_string()));
    assert_eq!(artist["verified"], false);

    let (song_status, song) = post(
        &market,
        "/api/v1/songs",
        Some(&token),
        json!({"title": "Rush", "artistId": artist["id"], "durationSeconds": 185, "price": 150}),
    )
    .await;
    assert_eq!(song_status, StatusCode::CREATED);
    assert_eq!(song["artistId"], artist["id"]);

    let song_id = song["id"].as_str().expect("song id");
    let (deleted, _) = send(
        &market.state,
        TestRequest::delete()
            .uri(&format!("/api/v1/songs/{song_id}"))
            .insert_header((AUTHORIZATION, bearer(&token)))
            .to_request(),
    )
    .await;
    assert_eq!(deleted, StatusCode::NO_CONTENT);
}

#[rstest]
#[actix_web::test]
async fn second_artist_profile_is_a_conflict() {
    let market = TestMarketplace::new();
    let (user, _) = market.artist("tems");
    let token = market.token_for(&user);

    let (status, body) = post(
        &market,
        "/api/v1/artists",
        Some(&token),
        json!({"artistName": "Tems Again"}),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "conflict");
}

#[rstest]
#[actix_web::test]
async fn artist_onboarding_grants_the_role_for_the_next_login() {
    let market = TestMarketplace::new();
    let user = market.listener("rema");
    let token = market.token_for(&user);

    let (status, _) = post(
        &market,
        "/api/v1/artists",
        Some(&token),
        json!({"artistName": "Rema"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let stored = market
        .store
        .account(&user.id)
        .expect("account still stored");
    let fresh = market.token_for(&stored);
    let claims = market.state.tokens.verify(&fresh).expect("token verifies");
    assert!(claims.roles.contains(&crate::domain::Role::Artist));
}
