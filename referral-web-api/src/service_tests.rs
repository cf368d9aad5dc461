// Service-level tests against in-memory SQLite with the real migrations
// applied. A single pooled connection keeps every test on one database.

use crate::dto::{
    Decision, FeeMethod, ProofKind, ResponseData, RESPONSE_BAD_REQUEST, RESPONSE_INTERNAL_ERROR,
    RESPONSE_OK, RESPONSE_UNAUTHORIZED, STATUS_PENDING, STATUS_REJECTED, STATUS_VERIFIED,
    WITHDRAWAL_COMPLETED, WITHDRAWAL_PENDING,
};
use crate::error::ServiceError;
use crate::ledger::{self, WithdrawalPolicy};
use crate::pool::{Db, ReferralConfig};
use crate::registration;
use crate::routes;
use crate::verification::{self, ProofSubmission};
use chrono::Utc;
use referral_db_entity::db::referral_edges::{
    Column as ReferralEdgeColumn, Entity as ReferralEdges,
};
use referral_db_entity::db::users::{Column as UserColumn, Entity as Users, Model as UserModel};
use referral_db_entity::db::verifications::Entity as Verifications;
use referral_db_entity::db::withdrawals::Entity as Withdrawals;
use referral_db_migration::{Migrator, MigratorTrait};
use rocket::http::{ContentType, Header};
use rocket::local::asynchronous::Client;
use sea_orm::prelude::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    QueryFilter, Statement,
};
use sea_orm_rocket::Database as PoolDatabase;
use std::sync::Once;

const ROOT: &str = "0xROOT";
const WALLET: &str = "0xB0B";

async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1);
    let db = Database::connect(options).await.expect("sqlite connect");
    Migrator::up(&db, None).await.expect("migrations");
    db
}

fn policy() -> WithdrawalPolicy {
    WithdrawalPolicy {
        min_amount: Decimal::from(100u32),
        max_amount: Decimal::from(5000u32),
        lock_period_days: 90,
        fee: "0.10".parse::<Decimal>().unwrap(),
    }
}

fn submission(wallet: &str, task_id: i32) -> ProofSubmission {
    ProofSubmission {
        user_address: wallet.to_owned(),
        task_id,
        proof_kind: ProofKind::Link,
        proof_url: Some("https://example.com/proof".to_owned()),
        screenshot_path: None,
        user_name: Some("bob".to_owned()),
        additional_notes: None,
    }
}

async fn user(db: &DatabaseConnection, wallet: &str) -> UserModel {
    Users::find_by_id(wallet.to_owned())
        .one(db)
        .await
        .unwrap()
        .expect("user row")
}

async fn backdate_activation(db: &DatabaseConnection, wallet: &str, days: i64) {
    let past = Utc::now().timestamp() - days * 24 * 60 * 60;
    Users::update_many()
        .col_expr(UserColumn::ActivationTime, Expr::value(past))
        .filter(UserColumn::WalletAddress.eq(wallet))
        .exec(db)
        .await
        .unwrap();
}

#[tokio::test]
async fn register_requires_existing_upline() {
    let db = test_db().await;
    let result = registration::register(&db, WALLET, "0xNOBODY").await;
    assert!(matches!(result, Err(ServiceError::InvalidUpline)));
    assert!(Users::find_by_id(WALLET.to_owned())
        .one(&db)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn register_increments_upline_and_writes_edge() {
    let db = test_db().await;
    registration::seed_root(&db, ROOT).await.unwrap();
    registration::register(&db, WALLET, ROOT).await.unwrap();

    let root = user(&db, ROOT).await;
    assert_eq!(root.direct_referrals, 1);

    let downline = user(&db, WALLET).await;
    assert_eq!(downline.upline_address.as_deref(), Some(ROOT));
    assert!(!downline.is_active);
    assert_eq!(downline.total_earned, Decimal::ZERO);
    assert_eq!(downline.locked_tokens, Decimal::ZERO);

    let edges = ReferralEdges::find()
        .filter(ReferralEdgeColumn::Referrer.eq(ROOT))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].referee, WALLET);
    assert_eq!(edges[0].level, 1);
}

#[tokio::test]
async fn register_twice_fails() {
    let db = test_db().await;
    registration::seed_root(&db, ROOT).await.unwrap();
    registration::register(&db, WALLET, ROOT).await.unwrap();

    let result = registration::register(&db, WALLET, ROOT).await;
    assert!(matches!(result, Err(ServiceError::AlreadyRegistered)));
    // The failed attempt must not bump the upline again.
    assert_eq!(user(&db, ROOT).await.direct_referrals, 1);
}

#[tokio::test]
async fn activation_grants_bonus_once() {
    let db = test_db().await;
    registration::seed_root(&db, WALLET).await.unwrap();

    ledger::activate(&db, WALLET, Decimal::from(100u32))
        .await
        .unwrap();
    let activated = user(&db, WALLET).await;
    assert!(activated.is_active);
    assert!(activated.activation_time.is_some());
    assert_eq!(activated.total_earned, Decimal::from(100u32));
    assert_eq!(activated.locked_tokens, Decimal::from(100u32));

    let result = ledger::activate(&db, WALLET, Decimal::from(100u32)).await;
    assert!(matches!(result, Err(ServiceError::AlreadyActive)));
    assert_eq!(user(&db, WALLET).await.total_earned, Decimal::from(100u32));
}

#[tokio::test]
async fn activation_of_unknown_wallet_fails() {
    let db = test_db().await;
    let result = ledger::activate(&db, "0xGHOST", Decimal::from(100u32)).await;
    assert!(matches!(result, Err(ServiceError::UnknownUser)));
}

#[tokio::test]
async fn post_reward_validates_amount_and_user() {
    let db = test_db().await;
    registration::seed_root(&db, WALLET).await.unwrap();

    let negative = ledger::post_reward(&db, WALLET, Decimal::from(-1)).await;
    assert!(matches!(negative, Err(ServiceError::InvalidAmount)));

    let unknown = ledger::post_reward(&db, "0xGHOST", Decimal::from(10u32)).await;
    assert!(matches!(unknown, Err(ServiceError::UnknownUser)));

    ledger::post_reward(&db, WALLET, Decimal::from(50u32))
        .await
        .unwrap();
    let credited = user(&db, WALLET).await;
    assert_eq!(credited.total_earned, Decimal::from(50u32));
    assert_eq!(credited.locked_tokens, Decimal::from(50u32));
}

#[tokio::test]
async fn duplicate_submission_rejected_regardless_of_status() {
    let db = test_db().await;
    registration::seed_root(&db, WALLET).await.unwrap();

    let id = verification::submit_proof(&db, submission(WALLET, 1))
        .await
        .unwrap();
    let duplicate = verification::submit_proof(&db, submission(WALLET, 1)).await;
    assert!(matches!(duplicate, Err(ServiceError::DuplicateSubmission)));

    // Still a duplicate after the first one got rejected.
    verification::adjudicate(&db, id, Decision::Rejected, "admin")
        .await
        .unwrap();
    let after_rejection = verification::submit_proof(&db, submission(WALLET, 1)).await;
    assert!(matches!(
        after_rejection,
        Err(ServiceError::DuplicateSubmission)
    ));
}

#[tokio::test]
async fn submission_for_unknown_task_rejected() {
    let db = test_db().await;
    registration::seed_root(&db, WALLET).await.unwrap();
    let result = verification::submit_proof(&db, submission(WALLET, 99)).await;
    assert!(matches!(result, Err(ServiceError::UnknownTask)));
}

#[tokio::test]
async fn adjudication_of_unknown_id_fails() {
    let db = test_db().await;
    let result = verification::adjudicate(&db, 42, Decision::Verified, "admin").await;
    assert!(matches!(result, Err(ServiceError::NotFound)));
}

#[tokio::test]
async fn verified_adjudication_posts_reward_exactly_once() {
    let db = test_db().await;
    registration::seed_root(&db, WALLET).await.unwrap();
    ledger::activate(&db, WALLET, Decimal::from(100u32))
        .await
        .unwrap();

    // Task 0 carries a 100-token reward in the seeded catalog.
    let id = verification::submit_proof(&db, submission(WALLET, 0))
        .await
        .unwrap();
    let pending = Verifications::find_by_id(id).one(&db).await.unwrap().unwrap();
    assert_eq!(pending.status, STATUS_PENDING);
    assert!(!pending.reward_distributed);

    verification::adjudicate(&db, id, Decision::Verified, "admin")
        .await
        .unwrap();

    let verified = Verifications::find_by_id(id).one(&db).await.unwrap().unwrap();
    assert_eq!(verified.status, STATUS_VERIFIED);
    assert!(verified.reward_distributed);
    assert_eq!(verified.verified_by.as_deref(), Some("admin"));
    assert!(verified.verified_at.is_some());

    let credited = user(&db, WALLET).await;
    assert_eq!(credited.total_earned, Decimal::from(200u32));
    assert_eq!(credited.locked_tokens, Decimal::from(200u32));
    assert_eq!(credited.completed_tasks, 1);

    // Terminal means terminal; no re-adjudication, no second credit.
    let again = verification::adjudicate(&db, id, Decision::Verified, "admin").await;
    assert!(matches!(again, Err(ServiceError::AlreadyTerminal)));
    assert_eq!(user(&db, WALLET).await.total_earned, Decimal::from(200u32));
}

#[tokio::test]
async fn rejected_adjudication_has_no_ledger_effect() {
    let db = test_db().await;
    registration::seed_root(&db, WALLET).await.unwrap();
    ledger::activate(&db, WALLET, Decimal::from(100u32))
        .await
        .unwrap();

    let id = verification::submit_proof(&db, submission(WALLET, 4))
        .await
        .unwrap();
    verification::adjudicate(&db, id, Decision::Rejected, "admin")
        .await
        .unwrap();

    let rejected = Verifications::find_by_id(id).one(&db).await.unwrap().unwrap();
    assert_eq!(rejected.status, STATUS_REJECTED);
    assert!(!rejected.reward_distributed);
    let untouched = user(&db, WALLET).await;
    assert_eq!(untouched.total_earned, Decimal::from(100u32));
    assert_eq!(untouched.completed_tasks, 0);

    // A rejection cannot later be flipped to verified.
    let flip = verification::adjudicate(&db, id, Decision::Verified, "admin").await;
    assert!(matches!(flip, Err(ServiceError::AlreadyTerminal)));
}

#[tokio::test]
async fn concurrent_adjudication_credits_once() {
    let db = test_db().await;
    registration::seed_root(&db, WALLET).await.unwrap();
    ledger::activate(&db, WALLET, Decimal::from(100u32))
        .await
        .unwrap();
    let id = verification::submit_proof(&db, submission(WALLET, 0))
        .await
        .unwrap();

    let (a, b, c, d) = tokio::join!(
        verification::adjudicate(&db, id, Decision::Verified, "admin"),
        verification::adjudicate(&db, id, Decision::Verified, "admin"),
        verification::adjudicate(&db, id, Decision::Verified, "admin"),
        verification::adjudicate(&db, id, Decision::Verified, "admin"),
    );
    let successes = [a, b, c, d].into_iter().filter(Result::is_ok).count();
    assert_eq!(successes, 1);

    let credited = user(&db, WALLET).await;
    assert_eq!(credited.total_earned, Decimal::from(200u32));
    assert_eq!(credited.locked_tokens, Decimal::from(200u32));
    assert_eq!(credited.completed_tasks, 1);
}

#[tokio::test]
async fn withdrawal_requires_active_account() {
    let db = test_db().await;
    registration::seed_root(&db, WALLET).await.unwrap();
    let result = ledger::request_withdrawal(
        &db,
        WALLET,
        Decimal::from(100u32),
        FeeMethod::Native,
        &policy(),
    )
    .await;
    assert!(matches!(result, Err(ServiceError::NotActive)));
}

#[tokio::test]
async fn withdrawal_amount_bounds_enforced() {
    let db = test_db().await;
    registration::seed_root(&db, WALLET).await.unwrap();
    ledger::activate(&db, WALLET, Decimal::from(100u32))
        .await
        .unwrap();

    let below = ledger::request_withdrawal(
        &db,
        WALLET,
        Decimal::from(50u32),
        FeeMethod::Native,
        &policy(),
    )
    .await;
    assert!(matches!(below, Err(ServiceError::InvalidAmount)));

    let above = ledger::request_withdrawal(
        &db,
        WALLET,
        Decimal::from(6000u32),
        FeeMethod::Native,
        &policy(),
    )
    .await;
    assert!(matches!(above, Err(ServiceError::InvalidAmount)));
}

#[tokio::test]
async fn withdrawal_cannot_exceed_locked_balance() {
    let db = test_db().await;
    registration::seed_root(&db, WALLET).await.unwrap();
    ledger::activate(&db, WALLET, Decimal::from(100u32))
        .await
        .unwrap();
    backdate_activation(&db, WALLET, 91).await;

    let result = ledger::request_withdrawal(
        &db,
        WALLET,
        Decimal::from(150u32),
        FeeMethod::Native,
        &policy(),
    )
    .await;
    assert!(matches!(result, Err(ServiceError::InsufficientBalance)));
    assert_eq!(user(&db, WALLET).await.total_withdrawn, Decimal::ZERO);
}

#[tokio::test]
async fn withdrawal_blocked_inside_lock_period() {
    let db = test_db().await;
    registration::seed_root(&db, WALLET).await.unwrap();
    ledger::activate(&db, WALLET, Decimal::from(100u32))
        .await
        .unwrap();
    ledger::post_reward(&db, WALLET, Decimal::from(400u32))
        .await
        .unwrap();
    backdate_activation(&db, WALLET, 45).await;

    let result = ledger::request_withdrawal(
        &db,
        WALLET,
        Decimal::from(200u32),
        FeeMethod::Stable,
        &policy(),
    )
    .await;
    assert!(matches!(result, Err(ServiceError::LockPeriodActive)));
    assert_eq!(user(&db, WALLET).await.locked_tokens, Decimal::from(500u32));
}

#[tokio::test]
async fn withdrawal_debits_on_request_and_settles_once() {
    let db = test_db().await;
    registration::seed_root(&db, WALLET).await.unwrap();
    ledger::activate(&db, WALLET, Decimal::from(100u32))
        .await
        .unwrap();
    ledger::post_reward(&db, WALLET, Decimal::from(400u32))
        .await
        .unwrap();
    backdate_activation(&db, WALLET, 91).await;

    let id = ledger::request_withdrawal(
        &db,
        WALLET,
        Decimal::from(200u32),
        FeeMethod::Native,
        &policy(),
    )
    .await
    .unwrap();

    let debited = user(&db, WALLET).await;
    assert_eq!(debited.locked_tokens, Decimal::from(300u32));
    assert_eq!(debited.total_withdrawn, Decimal::from(200u32));
    assert_eq!(debited.total_earned, Decimal::from(500u32));

    let row = Withdrawals::find_by_id(id).one(&db).await.unwrap().unwrap();
    assert_eq!(row.status, WITHDRAWAL_PENDING);
    assert_eq!(row.fee, "0.10".parse::<Decimal>().unwrap());
    assert_eq!(row.fee_method, "native");
    assert!(row.processed_at.is_none());

    ledger::settle_withdrawal(&db, id, true).await.unwrap();
    let settled = Withdrawals::find_by_id(id).one(&db).await.unwrap().unwrap();
    assert_eq!(settled.status, WITHDRAWAL_COMPLETED);
    assert!(settled.processed_at.is_some());
    assert!(settled.settlement_ref.is_some());

    // Settlement does not move balances again.
    assert_eq!(user(&db, WALLET).await.locked_tokens, Decimal::from(300u32));

    let again = ledger::settle_withdrawal(&db, id, true).await;
    assert!(matches!(again, Err(ServiceError::AlreadyTerminal)));
    let missing = ledger::settle_withdrawal(&db, 999, false).await;
    assert!(matches!(missing, Err(ServiceError::NotFound)));
}

#[tokio::test]
async fn locked_balance_tracks_postings_minus_withdrawals() {
    let db = test_db().await;
    registration::seed_root(&db, WALLET).await.unwrap();
    ledger::activate(&db, WALLET, Decimal::from(100u32))
        .await
        .unwrap();
    ledger::post_reward(&db, WALLET, Decimal::from(50u32))
        .await
        .unwrap();
    ledger::post_reward(&db, WALLET, Decimal::from(100u32))
        .await
        .unwrap();
    backdate_activation(&db, WALLET, 120).await;
    ledger::request_withdrawal(
        &db,
        WALLET,
        Decimal::from(150u32),
        FeeMethod::Stable,
        &policy(),
    )
    .await
    .unwrap();

    let state = user(&db, WALLET).await;
    assert_eq!(
        state.locked_tokens,
        state.total_earned - state.total_withdrawn
    );
    assert_eq!(state.total_earned, Decimal::from(250u32));
    assert_eq!(state.locked_tokens, Decimal::from(100u32));
}

#[tokio::test]
async fn end_to_end_referral_task_flow() {
    let db = test_db().await;
    registration::seed_root(&db, ROOT).await.unwrap();

    registration::register(&db, WALLET, ROOT).await.unwrap();
    assert_eq!(user(&db, ROOT).await.direct_referrals, 1);

    ledger::activate(&db, WALLET, Decimal::from(100u32))
        .await
        .unwrap();
    let activated = user(&db, WALLET).await;
    assert_eq!(activated.total_earned, Decimal::from(100u32));
    assert_eq!(activated.locked_tokens, Decimal::from(100u32));

    let id = verification::submit_proof(&db, submission(WALLET, 0))
        .await
        .unwrap();
    let pending = Verifications::find_by_id(id).one(&db).await.unwrap().unwrap();
    assert_eq!(pending.status, STATUS_PENDING);

    verification::adjudicate(&db, id, Decision::Verified, "admin")
        .await
        .unwrap();
    let rewarded = user(&db, WALLET).await;
    assert_eq!(rewarded.total_earned, Decimal::from(200u32));
    assert_eq!(rewarded.locked_tokens, Decimal::from(200u32));
    assert_eq!(rewarded.completed_tasks, 1);
    let verified = Verifications::find_by_id(id).one(&db).await.unwrap().unwrap();
    assert!(verified.reward_distributed);

    let duplicate = verification::submit_proof(&db, submission(WALLET, 0)).await;
    assert!(matches!(duplicate, Err(ServiceError::DuplicateSubmission)));
}

// Route-level tests through a local Rocket instance. The pool reads its
// settings from `Config::figment()`, so the database is redirected to
// in-memory SQLite through the environment before ignition.

static POOL_ENV: Once = Once::new();

const ADMIN_TOKEN: &str = "diamond-admin-2024";

async fn test_client() -> Client {
    POOL_ENV.call_once(|| {
        std::env::set_var("ROCKET_DATABASE_URL", "sqlite::memory:");
        std::env::set_var("ROCKET_SQLX_MAX_CONNECTIONS", "1");
        std::env::set_var("ROCKET_SQLX_MIN_CONNECTIONS", "1");
    });
    let referral_config = rocket::Config::figment()
        .extract::<ReferralConfig>()
        .expect("config");
    let rocket = rocket::build()
        .attach(Db::init())
        .manage(referral_config)
        .attach(routes::mount());
    let client = Client::tracked(rocket).await.expect("rocket ignite");
    let db = &Db::fetch(client.rocket()).expect("db pool").conn;
    Migrator::up(db, None).await.expect("migrations");
    client
}

#[tokio::test]
async fn wrong_admin_token_rejects_without_mutating() {
    let client = test_client().await;
    let db = &Db::fetch(client.rocket()).unwrap().conn;
    registration::seed_root(db, ROOT).await.unwrap();
    let id = verification::submit_proof(db, submission(ROOT, 0))
        .await
        .unwrap();

    let verification_before = Verifications::find_by_id(id).one(db).await.unwrap().unwrap();
    let user_before = user(db, ROOT).await;

    let response = client
        .post("/admin/adjudicate")
        .header(ContentType::JSON)
        .header(Header::new("X-Admin-Token", "not-the-token"))
        .body(format!(
            r#"{{"verification_id":{},"decision":"verified"}}"#,
            id
        ))
        .dispatch()
        .await;
    let body: ResponseData<String> = response.into_json().await.unwrap();
    assert_eq!(body.code, Some(RESPONSE_UNAUTHORIZED));
    assert_eq!(body.message, "Unauthorized");

    // Full before/after snapshot: nothing moved.
    let verification_after = Verifications::find_by_id(id).one(db).await.unwrap().unwrap();
    assert_eq!(verification_before, verification_after);
    assert_eq!(verification_after.status, STATUS_PENDING);
    assert_eq!(user_before, user(db, ROOT).await);

    // The genuine token drives the same request through.
    let response = client
        .post("/admin/adjudicate")
        .header(ContentType::JSON)
        .header(Header::new("X-Admin-Token", ADMIN_TOKEN))
        .body(format!(
            r#"{{"verification_id":{},"decision":"verified"}}"#,
            id
        ))
        .dispatch()
        .await;
    let body: ResponseData<String> = response.into_json().await.unwrap();
    assert_eq!(body.code, Some(RESPONSE_OK));
    let settled = Verifications::find_by_id(id).one(db).await.unwrap().unwrap();
    assert_eq!(settled.status, STATUS_VERIFIED);
    assert_eq!(user(db, ROOT).await.total_earned, Decimal::from(100u32));
}

#[tokio::test]
async fn submit_proof_rejects_missing_fields() {
    let client = test_client().await;
    let db = &Db::fetch(client.rocket()).unwrap().conn;

    let empty_wallet = client
        .post("/submit_proof")
        .header(ContentType::JSON)
        .body(r#"{"user_address":"","task_id":0,"proof_kind":"link","proof_url":"https://example.com/p"}"#)
        .dispatch()
        .await;
    let body: ResponseData<i32> = empty_wallet.into_json().await.unwrap();
    assert_eq!(body.code, Some(RESPONSE_BAD_REQUEST));
    assert_eq!(body.message, "Missing required fields");

    let link_without_url = client
        .post("/submit_proof")
        .header(ContentType::JSON)
        .body(r#"{"user_address":"0xA11CE","task_id":0,"proof_kind":"link"}"#)
        .dispatch()
        .await;
    let body: ResponseData<i32> = link_without_url.into_json().await.unwrap();
    assert_eq!(body.code, Some(RESPONSE_BAD_REQUEST));

    let screenshot_without_path = client
        .post("/submit_proof")
        .header(ContentType::JSON)
        .body(r#"{"user_address":"0xA11CE","task_id":0,"proof_kind":"screenshot","screenshot_path":""}"#)
        .dispatch()
        .await;
    let body: ResponseData<i32> = screenshot_without_path.into_json().await.unwrap();
    assert_eq!(body.code, Some(RESPONSE_BAD_REQUEST));

    assert!(Verifications::find().all(db).await.unwrap().is_empty());
}

#[tokio::test]
async fn get_user_reports_count_query_failure() {
    let client = test_client().await;
    let db = &Db::fetch(client.rocket()).unwrap().conn;
    registration::seed_root(db, ROOT).await.unwrap();

    let response = client
        .post("/get_user")
        .header(ContentType::JSON)
        .body(format!(r#"{{"wallet_address":"{}"}}"#, ROOT))
        .dispatch()
        .await;
    let body: ResponseData<crate::dto::UserDetails> = response.into_json().await.unwrap();
    assert_eq!(body.code, Some(RESPONSE_OK));
    assert_eq!(body.data.unwrap().referral_count, 0);

    // With the edge table gone the derived counts cannot be computed; the
    // answer is a server error, not a fabricated zero.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "DROP TABLE referral_edges".to_owned(),
    ))
    .await
    .unwrap();

    let response = client
        .post("/get_user")
        .header(ContentType::JSON)
        .body(format!(r#"{{"wallet_address":"{}"}}"#, ROOT))
        .dispatch()
        .await;
    let body: ResponseData<crate::dto::UserDetails> = response.into_json().await.unwrap();
    assert_eq!(body.code, Some(RESPONSE_INTERNAL_ERROR));
    assert_eq!(body.message, "Server error");
    assert!(body.data.is_none());
}
