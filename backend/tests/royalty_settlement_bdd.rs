//! Behaviour tests for monthly royalty accrual and settlement.

use std::cell::RefCell;

use actix_web::http::header::AUTHORIZATION;
use actix_web::test::TestRequest;
use marketplace::domain::{Artist, UserAccount};
use marketplace::test_support::{TestMarketplace, bearer};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

mod support;

use support::{Exchange, error_code, perform};

struct RoyaltyWorld {
    market: TestMarketplace,
    admin: RefCell<Option<UserAccount>>,
    artist: RefCell<Option<Artist>>,
    last: RefCell<Option<Exchange>>,
}

impl RoyaltyWorld {
    fn new() -> Self {
        Self {
            market: TestMarketplace::new(),
            admin: RefCell::new(None),
            artist: RefCell::new(None),
            last: RefCell::new(None),
        }
    }

    fn admin_token(&self) -> String {
        let admin = self.admin.borrow().clone().expect("admin should be set");
        self.market.token_for(&admin)
    }

    fn artist(&self) -> Artist {
        self.artist.borrow().clone().expect("artist should be set")
    }

    fn accrue_as(&self, token: &str, amount: i64, month: i32, year: i32) {
        let artist = self.artist();
        let exchange = perform(
            &self.market.state,
            TestRequest::post()
                .uri("/api/v1/admin/royalties")
                .insert_header((AUTHORIZATION, bearer(token)))
                .set_json(json!({
                    "artistId": artist.id,
                    "year": year,
                    "month": month,
                    "amount": amount,
                }))
                .to_request(),
        );
        self.last.replace(Some(exchange));
    }

    fn last_status(&self) -> Option<u16> {
        self.last.borrow().as_ref().map(|(status, _)| *status)
    }

    fn last_body(&self) -> Value {
        self.last
            .borrow()
            .as_ref()
            .map(|(_, body)| body.clone())
            .unwrap_or(Value::Null)
    }
}

#[fixture]
fn world() -> RoyaltyWorld {
    RoyaltyWorld::new()
}

#[given("an admin and an artist")]
fn an_admin_and_an_artist(world: &RoyaltyWorld) {
    let admin = world.market.admin("grace");
    let (_, artist) = world.market.artist("asake");
    world.admin.replace(Some(admin));
    world.artist.replace(Some(artist));
}

#[when("the admin accrues {amount} for the artist in month {month} of {year}")]
fn the_admin_accrues(world: &RoyaltyWorld, amount: i64, month: i32, year: i32) {
    let token = world.admin_token();
    world.accrue_as(&token, amount, month, year);
}

#[when("a listener accrues {amount} for the artist in month {month} of {year}")]
fn a_listener_accrues(world: &RoyaltyWorld, amount: i64, month: i32, year: i32) {
    let listener = world.market.listener("kunle");
    let token = world.market.token_for(&listener);
    world.accrue_as(&token, amount, month, year);
}

#[when("the admin marks month {month} of {year} paid for the artist")]
fn the_admin_marks_paid(world: &RoyaltyWorld, month: i32, year: i32) {
    let token = world.admin_token();
    let artist = world.artist();
    let exchange = perform(
        &world.market.state,
        TestRequest::post()
            .uri(&format!(
                "/api/v1/admin/royalties/{}/{year}/{month}/paid",
                artist.id
            ))
            .insert_header((AUTHORIZATION, bearer(&token)))
            .to_request(),
    );
    world.last.replace(Some(exchange));
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &RoyaltyWorld, status: u16) {
    assert_eq!(world.last_status(), Some(status));
}

#[then("the royalty amount is {amount}")]
fn the_royalty_amount_is(world: &RoyaltyWorld, amount: i64) {
    let body = world.last_body();
    assert_eq!(body.get("amount").and_then(Value::as_i64), Some(amount));
    assert_eq!(body.get("paid").and_then(Value::as_bool), Some(false));
}

#[then("the pending royalty total is {amount}")]
fn the_pending_royalty_total_is(world: &RoyaltyWorld, amount: i64) {
    let token = world.admin_token();
    let (status, body) = perform(
        &world.market.state,
        TestRequest::get()
            .uri("/api/v1/admin/royalties/pending")
            .insert_header((AUTHORIZATION, bearer(&token)))
            .to_request(),
    );
    assert_eq!(status, 200);
    assert_eq!(body.get("amount").and_then(Value::as_i64), Some(amount));
    assert_eq!(body.get("currency").and_then(Value::as_str), Some("NGN"));
}

#[then("the error code is \"{code}\"")]
fn the_error_code_is(world: &RoyaltyWorld, code: String) {
    assert_eq!(error_code(&world.last_body()), Some(code.as_str()));
}

#[scenario(
    path = "tests/features/royalty_settlement.feature",
    name = "A month is accrued in parts and paid once"
)]
fn a_month_is_accrued_in_parts_and_paid_once(world: RoyaltyWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/royalty_settlement.feature",
    name = "Listeners cannot accrue royalties"
)]
fn listeners_cannot_accrue_royalties(world: RoyaltyWorld) {
    drop(world);
}
