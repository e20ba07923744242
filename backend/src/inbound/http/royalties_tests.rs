//! Handler tests for tips and royalty settlement.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::inbound::http::test_utils::{TestMarketplace, bearer, error_code, send};

async fn accrue(market: &TestMarketplace, token: &str, artist_id: Uuid, amount: i64) -> (StatusCode, Value) {
    send(
        &market.state,
        TestRequest::post()
            .uri("/api/v1/admin/royalties")
            .insert_header((AUTHORIZATION, bearer(token)))
            .set_json(json!({"artistId": artist_id, "year": 2025, "month": 3, "amount": amount}))
            .to_request(),
    )
    .await
}

async fn mark_paid(market: &TestMarketplace, token: &str, artist_id: Uuid) -> (StatusCode, Value) {
    send(
        &market.state,
        TestRequest::post()
            .uri(&format!("/api/v1/admin/royalties/{artist_id}/2025/3/paid"))
            .insert_header((AUTHORIZATION, bearer(token)))
            .to_request(),
    )
    .await
}

#[rstest]
#[actix_web::test]
async fn tips_are_recorded_and_listed_for_the_artist() {
    let market = TestMarketplace::new();
    let fan = market.listener("ada");
    let (artist_account, artist) = market.artist("tems");

    let (status, tip) = send(
        &market.state,
        TestRequest::post()
            .uri("/api/v1/tips")
            .insert_header((AUTHORIZATION, bearer(&market.token_for(&fan))))
            .set_json(json!({
                "senderId": fan.id.to_string(),
                "artistId": artist.id,
                "amount": 500,
                "message": "loved the show",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tip["amount"], 500);
    assert_eq!(tip["currency"], "NGN");

    let (status, tips) = send(
        &market.state,
        TestRequest::get()
            .uri(&format!("/api/v1/artists/{}/tips?limit=5", artist.id))
            .insert_header((AUTHORIZATION, bearer(&market.token_for(&artist_account))))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tips.as_array().map(Vec::len), Some(1));
}

#[rstest]
#[case::zero(0)]
#[case::negative(-10)]
#[actix_web::test]
async fn non_positive_tips_are_invalid_amounts(#[case] amount: i64) {
    let market = TestMarketplace::new();
    let fan = market.listener("ada");
    let (_, artist) = market.artist("tems");

    let (status, body) = send(
        &market.state,
        TestRequest::post()
            .uri("/api/v1/tips")
            .insert_header((AUTHORIZATION, bearer(&market.token_for(&fan))))
            .set_json(json!({"senderId": fan.id.to_string(), "artistId": artist.id, "amount": amount}))
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "invalid_amount");
}

#[rstest]
#[actix_web::test]
async fn sent_tips_reject_out_of_range_limits() {
    let market = TestMarketplace::new();
    let fan = market.listener("ada");

    let (status, _) = send(
        &market.state,
        TestRequest::get()
            .uri(&format!("/api/v1/users/{}/tips?limit=0", fan.id))
            .insert_header((AUTHORIZATION, bearer(&market.token_for(&fan))))
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn accruals_sum_into_one_row_and_settle_once() {
    let market = TestMarketplace::new();
    let admin = market.admin("root");
    let (_, artist) = market.artist("tems");
    let token = market.token_for(&admin);

    let (_, first) = accrue(&market, &token, artist.id, 100).await;
    let (status, second) = accrue(&market, &token, artist.id, 50).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["amount"], 150);
    assert_eq!(second["id"], first["id"]);

    let (_, pending) = send(
        &market.state,
        TestRequest::get()
            .uri("/api/v1/admin/royalties/pending")
            .insert_header((AUTHORIZATION, bearer(&token)))
            .to_request(),
    )
    .await;
    assert_eq!(pending, json!({"amount": 150, "currency": "NGN"}));

    let (paid, row) = mark_paid(&market, &token, artist.id).await;
    assert_eq!(paid, StatusCode::OK);
    assert_eq!(row["paid"], true);

    let (again, body) = mark_paid(&market, &token, artist.id).await;
    assert_eq!(again, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "already_paid");
}

#[rstest]
#[actix_web::test]
async fn settling_an_unknown_period_is_not_found() {
    let market = TestMarketplace::new();
    let admin = market.admin("root");
    let (_, artist) = market.artist("tems");

    let (status, _) = mark_paid(&market, &market.token_for(&admin), artist.id).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn royalty_administration_requires_the_admin_role() {
    let market = TestMarketplace::new();
    let (artist_account, artist) = market.artist("tems");

    let (status, body) = accrue(&market, &market.token_for(&artist_account), artist.id, 100).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "forbidden");
}

#[rstest]
#[case::month_thirteen("/2025/13/paid")]
#[case::not_a_number("/2025/march/paid")]
#[actix_web::test]
async fn malformed_periods_are_invalid_requests(#[case] suffix: &str) {
    let market = TestMarketplace::new();
    let admin = market.admin("root");

    let (status, body) = send(
        &market.state,
        TestRequest::post()
            .uri(&format!("/api/v1/admin/royalties/{}{suffix}", Uuid::new_v4()))
            .insert_header((AUTHORIZATION, bearer(&market.token_for(&admin))))
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn artists_see_their_own_royalties_only() {
    let market = TestMarketplace::new();
    let admin = market.admin("root");
    let (owner, artist) = market.artist("tems");
    let (stranger, _) = market.artist("rema");
    accrue(&market, &market.token_for(&admin), artist.id, 100).await;

    let uri = format!("/api/v1/artists/{}/royalties", artist.id);
    let (own_status, rows) = send(
        &market.state,
        TestRequest::get()
            .uri(&uri)
            .insert_header((AUTHORIZATION, bearer(&market.token_for(&owner))))
            .to_request(),
    )
    .await;
    let (other_status, _) = send(
        &market.state,
        TestRequest::get()
            .uri(&uri)
            .insert_header((AUTHORIZATION, bearer(&market.token_for(&stranger))))
            .to_request(),
    )
    .await;

    assert_eq!(own_status, StatusCode::OK);
    assert_eq!(rows[0]["month"], 3);
    assert_eq!(other_status, StatusCode::FORBIDDEN);
}
