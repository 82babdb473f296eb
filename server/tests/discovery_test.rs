//! Discovery integration tests.
//!
//! Run ignored (integration) tests: `cargo test --test discovery_test -- --ignored`

mod helpers;

use helpers::{create_active_user, create_test_user, set_status, TestApp};
use sqlx::PgPool;
use vivah_common::UserStatus;
use vivah_server::config::Config;

const URI: &str = "/user/get-gender-based-profiles";

#[sqlx::test]
#[ignore] // Requires PostgreSQL
async fn test_lists_active_complementary_profiles(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let viewer = create_active_user(&pool, "Male").await;
    let match_one = create_active_user(&pool, "female").await;
    let match_two = create_active_user(&pool, "FEMALE").await;
    let _same_gender = create_active_user(&pool, "male").await;
    let muted = create_active_user(&pool, "female").await;
    set_status(&pool, muted.id, UserStatus::Muted).await;
    let blocked = create_active_user(&pool, "female").await;
    set_status(&pool, blocked.id, UserStatus::Blocked).await;
    let married = create_active_user(&pool, "female").await;
    set_status(&pool, married.id, UserStatus::Married).await;

    let (status, body) = app.get(URI, &app.token_for(&viewer)).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Profiles fetched successfully.");
    assert_eq!(body["data"]["lookingFor"], "female");
    assert_eq!(body["data"]["count"], 2);

    // Newest first
    let ids: Vec<_> = body["data"]["profiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec![match_two.id.to_string(), match_one.id.to_string()]);
    for hidden in [&muted, &blocked, &married] {
        assert!(!ids.contains(&hidden.id.to_string()));
    }
}

#[sqlx::test]
#[ignore] // Requires PostgreSQL
async fn test_status_gating(pool: PgPool) {
    let app = TestApp::new(pool.clone());

    for (status, expected) in [
        (UserStatus::Blocked, "You are blocked by admin. Please contact support."),
        (
            UserStatus::Married,
            "You are already married. Your profile is no longer available for matchmaking.",
        ),
        (
            UserStatus::Pending,
            "Your account is not active. Please contact support admin.",
        ),
    ] {
        let user = create_active_user(&pool, "female").await;
        set_status(&pool, user.id, status).await;

        let (code, body) = app.get(URI, &app.token_for(&user)).await;
        assert_eq!(code, 403, "status {status}");
        assert_eq!(body["message"], expected);
    }

    let muted = create_active_user(&pool, "female").await;
    set_status(&pool, muted.id, UserStatus::Muted).await;
    let blocked = create_active_user(&pool, "female").await;
    set_status(&pool, blocked.id, UserStatus::Blocked).await;
    let married = create_active_user(&pool, "female").await;
    set_status(&pool, married.id, UserStatus::Married).await;
    let (code, _) = app.get(URI, &app.token_for(&muted)).await;
    assert_eq!(code, 403);
}

#[sqlx::test]
#[ignore] // Requires PostgreSQL
async fn test_gender_required(pool: PgPool) {
    let app = TestApp::new(pool.clone());

    let no_gender = create_test_user(&pool).await;
    set_status(&pool, no_gender.id, UserStatus::Active).await;
    let (code, body) = app.get(URI, &app.token_for(&no_gender)).await;
    assert_eq!(code, 400);
    assert_eq!(
        body["message"],
        "Your gender information is missing. Please complete your basic profile first."
    );

    let odd = create_active_user(&pool, "unknown").await;
    let (code, body) = app.get(URI, &app.token_for(&odd)).await;
    assert_eq!(code, 400);
    assert_eq!(
        body["message"],
        "Invalid gender 'unknown'. Allowed values are: male, female."
    );
}

#[sqlx::test]
#[ignore] // Requires PostgreSQL
async fn test_limit_from_config(pool: PgPool) {
    let config = Config {
        discovery_limit: 1,
        ..Config::default_for_test()
    };
    let app = TestApp::with_config(pool.clone(), config);
    let viewer = create_active_user(&pool, "female").await;
    create_active_user(&pool, "male").await;
    create_active_user(&pool, "male").await;

    let (_, body) = app.get(URI, &app.token_for(&viewer)).await;
    assert_eq!(body["data"]["count"], 1);
}
