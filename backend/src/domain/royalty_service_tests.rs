//! Tests for tip recording and royalty settlement.

use std::sync::Arc;

use rstest::{fixture, rstest};
use uuid::Uuid;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    MockCatalogueRepository, MockCredentialStore, MockRoyaltyRepository, MockTipRepository,
};
use crate::test_support::{FixedClock, sample_account, sample_artist};

type TestService = RoyaltyService<
    MockCatalogueRepository,
    MockCredentialStore,
    MockTipRepository,
    MockRoyaltyRepository,
>;

struct Mocks {
    catalogue: MockCatalogueRepository,
    users: MockCredentialStore,
    tips: MockTipRepository,
    royalties: MockRoyaltyRepository,
}

impl Mocks {
    fn build(self) -> TestService {
        RoyaltyService::new(RoyaltyServiceDeps {
            catalogue: Arc::new(self.catalogue),
            users: Arc::new(self.users),
            tips: Arc::new(self.tips),
            royalties: Arc::new(self.royalties),
            clock: Arc::new(FixedClock::default()),
        })
    }
}

#[fixture]
fn mocks() -> Mocks {
    Mocks {
        catalogue: MockCatalogueRepository::new(),
        users: MockCredentialStore::new(),
        tips: MockTipRepository::new(),
        royalties: MockRoyaltyRepository::new(),
    }
}

fn admin() -> Caller {
    Caller::new(UserId::random(), vec![Role::Admin])
}

fn listener(user_id: &UserId) -> Caller {
    Caller::new(user_id.clone(), vec![Role::Listener])
}

fn period() -> RoyaltyPeriod {
    RoyaltyPeriod::new(2025, 3).expect("valid period")
}

fn tip_request(sender: &UserId, artist_id: Uuid, amount: i64) -> TipRequest {
    TipRequest {
        sender_id: sender.clone(),
        artist_id,
        amount,
        message: Some("Great set".to_owned()),
        payment_reference: None,
    }
}

fn royalty_row(artist_id: Uuid, amount: i64, paid: bool) -> MonthlyRoyalty {
    MonthlyRoyalty {
        id: Uuid::new_v4(),
        artist_id,
        period: period(),
        amount,
        currency: "NGN".to_owned(),
        paid,
    }
}

#[rstest]
#[tokio::test]
async fn tip_is_recorded_for_existing_artist(mut mocks: Mocks) {
    let sender = sample_account("ada");
    let sender_id = sender.id.clone();
    let artist = sample_artist(UserId::random());
    let artist_id = artist.id;
    mocks
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(sender)));
    mocks
        .catalogue
        .expect_find_artist()
        .return_once(move |_| Ok(Some(artist)));
    mocks
        .tips
        .expect_insert()
        .withf(move |tip| tip.amount == 250 && tip.artist_id == artist_id)
        .times(1)
        .return_once(|_| Ok(()));

    let tip = mocks
        .build()
        .send_tip(&listener(&sender_id), tip_request(&sender_id, artist_id, 250))
        .await
        .expect("tip succeeds");

    assert_eq!(tip.created_at, FixedClock::default().utc());
    assert_eq!(tip.message.as_deref(), Some("Great set"));
}

#[rstest]
#[case(0)]
#[case(-10)]
#[tokio::test]
async fn non_positive_tips_never_reach_storage(mut mocks: Mocks, #[case] amount: i64) {
    mocks.users.expect_find_by_id().times(0);
    mocks.tips.expect_insert().times(0);
    let sender = UserId::random();

    let err = mocks
        .build()
        .send_tip(&listener(&sender), tip_request(&sender, Uuid::new_v4(), amount))
        .await
        .expect_err("invalid amount");

    assert_eq!(err.code(), ErrorCode::InvalidAmount);
}

#[rstest]
#[tokio::test]
async fn tipping_a_missing_artist_is_not_found(mut mocks: Mocks) {
    let sender = sample_account("ada");
    let sender_id = sender.id.clone();
    mocks
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(sender)));
    mocks.catalogue.expect_find_artist().return_once(|_| Ok(None));
    mocks.tips.expect_insert().times(0);

    let err = mocks
        .build()
        .send_tip(&listener(&sender_id), tip_request(&sender_id, Uuid::new_v4(), 50))
        .await
        .expect_err("missing artist");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn deleted_sender_is_not_found(mut mocks: Mocks) {
    mocks.users.expect_find_by_id().return_once(|_| Ok(None));
    mocks.catalogue.expect_find_artist().times(0);
    let sender = UserId::random();

    let err = mocks
        .build()
        .send_tip(&listener(&sender), tip_request(&sender, Uuid::new_v4(), 50))
        .await
        .expect_err("missing sender");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(0)]
#[case(101)]
#[tokio::test]
async fn tip_listing_limits_are_bounded(mocks: Mocks, #[case] limit: u32) {
    let user = UserId::random();
    let err = mocks
        .build()
        .sent_tips(&listener(&user), &user, limit)
        .await
        .expect_err("limit out of range");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn accrual_requires_admin(mut mocks: Mocks) {
    mocks.royalties.expect_accrue().times(0);

    let err = mocks
        .build()
        .accrue_royalty(&listener(&UserId::random()), &Uuid::new_v4(), period(), 10)
        .await
        .expect_err("not admin");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn negative_accrual_is_invalid_amount(mut mocks: Mocks) {
    mocks.royalties.expect_accrue().times(0);

    let err = mocks
        .build()
        .accrue_royalty(&admin(), &Uuid::new_v4(), period(), -1)
        .await
        .expect_err("negative amount");

    assert_eq!(err.code(), ErrorCode::InvalidAmount);
}

#[rstest]
#[tokio::test]
async fn accrual_returns_running_total(mut mocks: Mocks) {
    let artist = sample_artist(UserId::random());
    let artist_id = artist.id;
    mocks
        .catalogue
        .expect_find_artist()
        .return_once(move |_| Ok(Some(artist)));
    mocks
        .royalties
        .expect_accrue()
        .withf(move |id, p, amount| *id == artist_id && *p == period() && *amount == 400)
        .return_once(move |_, _, _| Ok(royalty_row(artist_id, 1_000, false)));

    let row = mocks
        .build()
        .accrue_royalty(&admin(), &artist_id, period(), 400)
        .await
        .expect("accrual succeeds");

    assert_eq!(row.amount, 1_000);
    assert!(!row.paid);
}

#[rstest]
#[case(RoyaltyRepositoryError::period_paid("2025-03"), ErrorCode::AlreadyPaid)]
#[case(RoyaltyRepositoryError::amount_overflow(), ErrorCode::InvalidAmount)]
#[tokio::test]
async fn refused_accruals_keep_their_reason(
    mut mocks: Mocks,
    #[case] failure: RoyaltyRepositoryError,
    #[case] expected: ErrorCode,
) {
    let artist = sample_artist(UserId::random());
    let artist_id = artist.id;
    mocks
        .catalogue
        .expect_find_artist()
        .return_once(move |_| Ok(Some(artist)));
    mocks
        .royalties
        .expect_accrue()
        .return_once(move |_, _, _| Err(failure));

    let err = mocks
        .build()
        .accrue_royalty(&admin(), &artist_id, period(), 50)
        .await
        .expect_err("accrual refused");

    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn pending_total_overflow_is_invalid_amount(mut mocks: Mocks) {
    mocks
        .royalties
        .expect_pending_total()
        .return_once(|| Err(RoyaltyRepositoryError::amount_overflow()));

    let err = mocks
        .build()
        .pending_total(&admin())
        .await
        .expect_err("overflow");

    assert_eq!(err.code(), ErrorCode::InvalidAmount);
}

#[rstest]
#[tokio::test]
async fn marking_unpaid_row_returns_it(mut mocks: Mocks) {
    let artist_id = Uuid::new_v4();
    mocks
        .royalties
        .expect_mark_paid()
        .return_once(move |_, _| Ok(Some(royalty_row(artist_id, 300, true))));
    mocks.royalties.expect_find().times(0);

    let row = mocks
        .build()
        .mark_paid(&admin(), &artist_id, period())
        .await
        .expect("settled");

    assert!(row.paid);
}

#[rstest]
#[tokio::test]
async fn second_settlement_is_already_paid(mut mocks: Mocks) {
    let artist_id = Uuid::new_v4();
    mocks
        .royalties
        .expect_mark_paid()
        .return_once(|_, _| Ok(None));
    mocks
        .royalties
        .expect_find()
        .return_once(move |_, _| Ok(Some(royalty_row(artist_id, 300, true))));

    let err = mocks
        .build()
        .mark_paid(&admin(), &artist_id, period())
        .await
        .expect_err("already settled");

    assert_eq!(err.code(), ErrorCode::AlreadyPaid);
}

#[rstest]
#[tokio::test]
async fn settling_absent_row_is_not_found(mut mocks: Mocks) {
    mocks
        .royalties
        .expect_mark_paid()
        .return_once(|_, _| Ok(None));
    mocks.royalties.expect_find().return_once(|_, _| Ok(None));

    let err = mocks
        .build()
        .mark_paid(&admin(), &Uuid::new_v4(), period())
        .await
        .expect_err("absent row");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn pending_total_maps_outage(mut mocks: Mocks) {
    mocks
        .royalties
        .expect_pending_total()
        .return_once(|| Err(RoyaltyRepositoryError::connection("refused")));

    let err = mocks
        .build()
        .pending_total(&admin())
        .await
        .expect_err("outage");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn artist_royalties_are_private(mut mocks: Mocks) {
    let artist = sample_artist(UserId::random());
    let artist_id = artist.id;
    mocks
        .catalogue
        .expect_find_artist()
        .return_once(move |_| Ok(Some(artist)));
    mocks.royalties.expect_list_for_artist().times(0);

    let err = mocks
        .build()
        .artist_royalties(&listener(&UserId::random()), &artist_id)
        .await
        .expect_err("other user");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}
