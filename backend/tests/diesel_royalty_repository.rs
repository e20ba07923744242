//! `DieselRoyaltyRepository` against embedded PostgreSQL: the accrual
//! upsert, conditional settlement, and the unpaid total.

use futures_util::future::join_all;
use marketplace::domain::RoyaltyPeriod;
use marketplace::domain::ports::{RoyaltyRepository, RoyaltyRepositoryError};
use marketplace::outbound::persistence::DieselRoyaltyRepository;
use rstest::{fixture, rstest};

mod support;

use support::database::TestDatabase;

#[fixture]
fn database() -> Option<TestDatabase> {
    TestDatabase::start()
}

fn period(month: i32) -> RoyaltyPeriod {
    RoyaltyPeriod::new(2025, month).expect("valid period")
}

#[rstest]
fn accruals_for_one_period_add_up(database: Option<TestDatabase>) {
    let Some(db) = database else {
        eprintln!("SKIP-TEST-CLUSTER: accruals_for_one_period_add_up skipped");
        return;
    };
    let (_, artist) = db.artist("tems");
    let repo = DieselRoyaltyRepository::new(db.pool.clone());

    db.block_on(repo.accrue(&artist.id, period(3), 100))
        .expect("first accrual");
    let row = db
        .block_on(repo.accrue(&artist.id, period(3), 250))
        .expect("second accrual");

    assert_eq!(row.amount, 350);
    assert!(!row.paid);
    let rows = db
        .block_on(repo.list_for_artist(&artist.id))
        .expect("rows load");
    assert_eq!(rows.len(), 1);
}

#[rstest]
fn concurrent_accruals_are_not_lost(database: Option<TestDatabase>) {
    let Some(db) = database else {
        eprintln!("SKIP-TEST-CLUSTER: concurrent_accruals_are_not_lost skipped");
        return;
    };
    let (_, artist) = db.artist("tems");
    let repo = DieselRoyaltyRepository::new(db.pool.clone());

    let results = db.block_on(join_all(
        (0..8).map(|_| repo.accrue(&artist.id, period(4), 25)),
    ));

    assert!(results.iter().all(Result::is_ok), "{results:?}");
    let row = db
        .block_on(repo.find(&artist.id, period(4)))
        .expect("find succeeds")
        .expect("row exists");
    assert_eq!(row.amount, 200);
}

#[rstest]
fn settlement_happens_once_and_freezes_the_period(database: Option<TestDatabase>) {
    let Some(db) = database else {
        eprintln!("SKIP-TEST-CLUSTER: settlement_happens_once_and_freezes_the_period skipped");
        return;
    };
    let (_, artist) = db.artist("tems");
    let repo = DieselRoyaltyRepository::new(db.pool.clone());
    db.block_on(repo.accrue(&artist.id, period(5), 400))
        .expect("accrual");

    let paid = db
        .block_on(repo.mark_paid(&artist.id, period(5)))
        .expect("mark paid");
    let again = db
        .block_on(repo.mark_paid(&artist.id, period(5)))
        .expect("second mark paid");
    let late = db.block_on(repo.accrue(&artist.id, period(5), 50));

    assert_eq!(paid.map(|row| (row.amount, row.paid)), Some((400, true)));
    assert!(again.is_none());
    assert!(
        matches!(late, Err(RoyaltyRepositoryError::PeriodPaid { .. })),
        "expected PeriodPaid, got {late:?}"
    );
    let stored = db
        .block_on(repo.find(&artist.id, period(5)))
        .expect("find succeeds")
        .expect("row exists");
    assert_eq!(stored.amount, 400);
}

#[rstest]
fn settling_an_absent_period_matches_nothing(database: Option<TestDatabase>) {
    let Some(db) = database else {
        eprintln!("SKIP-TEST-CLUSTER: settling_an_absent_period_matches_nothing skipped");
        return;
    };
    let (_, artist) = db.artist("tems");
    let repo = DieselRoyaltyRepository::new(db.pool.clone());

    let result = db
        .block_on(repo.mark_paid(&artist.id, period(6)))
        .expect("mark paid");

    assert!(result.is_none());
}

#[rstest]
fn accruals_past_the_bigint_range_leave_the_row_alone(database: Option<TestDatabase>) {
    let Some(db) = database else {
        eprintln!("SKIP-TEST-CLUSTER: accruals_past_the_bigint_range_leave_the_row_alone skipped");
        return;
    };
    let (_, artist) = db.artist("tems");
    let repo = DieselRoyaltyRepository::new(db.pool.clone());
    db.block_on(repo.accrue(&artist.id, period(7), i64::MAX - 10))
        .expect("near-limit accrual");

    let result = db.block_on(repo.accrue(&artist.id, period(7), 100));

    assert!(
        matches!(result, Err(RoyaltyRepositoryError::AmountOverflow)),
        "expected AmountOverflow, got {result:?}"
    );
    let stored = db
        .block_on(repo.find(&artist.id, period(7)))
        .expect("find succeeds")
        .expect("row exists");
    assert_eq!(stored.amount, i64::MAX - 10);
}

#[rstest]
fn pending_total_sums_unpaid_rows_across_artists(database: Option<TestDatabase>) {
    let Some(db) = database else {
        eprintln!("SKIP-TEST-CLUSTER: pending_total_sums_unpaid_rows_across_artists skipped");
        return;
    };
    let (_, tems) = db.artist("tems");
    let (_, rema) = db.artist("rema");
    let repo = DieselRoyaltyRepository::new(db.pool.clone());
    assert_eq!(db.block_on(repo.pending_total()).expect("empty total"), 0);

    db.block_on(async {
        repo.accrue(&tems.id, period(1), 100).await?;
        repo.accrue(&tems.id, period(2), 200).await?;
        repo.accrue(&rema.id, period(1), 50).await?;
        repo.mark_paid(&tems.id, period(2)).await
    })
    .expect("ledger seeded");

    assert_eq!(db.block_on(repo.pending_total()).expect("total"), 150);
}

#[rstest]
fn pending_total_past_the_bigint_range_is_an_overflow(database: Option<TestDatabase>) {
    let Some(db) = database else {
        eprintln!("SKIP-TEST-CLUSTER: pending_total_past_the_bigint_range_is_an_overflow skipped");
        return;
    };
    let (_, tems) = db.artist("tems");
    let (_, rema) = db.artist("rema");
    let repo = DieselRoyaltyRepository::new(db.pool.clone());
    db.block_on(async {
        repo.accrue(&tems.id, period(1), i64::MAX - 1).await?;
        repo.accrue(&rema.id, period(1), i64::MAX - 1).await
    })
    .expect("large rows accrue");

    let total = db.block_on(repo.pending_total());

    assert!(
        matches!(total, Err(RoyaltyRepositoryError::AmountOverflow)),
        "expected AmountOverflow, got {total:?}"
    );
}
