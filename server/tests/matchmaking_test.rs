//! Matchmaking integration tests.
//!
//! Likes and the shortlist request workflow, driven over HTTP.
//!
//! Run ignored (integration) tests: `cargo test --test matchmaking_test -- --ignored`

mod helpers;

use helpers::{create_active_user, TestApp};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["id"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

#[sqlx::test]
#[ignore] // Requires PostgreSQL
async fn test_like_toggles(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let a = create_active_user(&pool, "male").await;
    let b = create_active_user(&pool, "female").await;
    let token = app.token_for(&a);
    let uri = format!("/user/toggle-like/{}", b.id);

    let (status, body) = app.post(&uri, &token, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "User liked successfully.");
    assert_eq!(body["data"]["liked"], true);

    let (_, profile) = app.get("/user/my-profile", &token).await;
    assert_eq!(ids(&profile["data"]["likedUsers"]), vec![b.id.to_string()]);

    let (status, body) = app.post(&uri, &token, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "User unliked successfully.");
    assert_eq!(body["data"]["liked"], false);

    let (_, profile) = app.get("/user/my-profile", &token).await;
    assert!(ids(&profile["data"]["likedUsers"]).is_empty());
}

#[sqlx::test]
#[ignore] // Requires PostgreSQL
async fn test_like_rejects_self_and_unknown(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let a = create_active_user(&pool, "male").await;
    let token = app.token_for(&a);

    let (status, body) = app
        .post(&format!("/user/toggle-like/{}", a.id), &token, None)
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "You cannot like your own profile.");

    let (status, _) = app
        .post(&format!("/user/toggle-like/{}", Uuid::now_v7()), &token, None)
        .await;
    assert_eq!(status, 404);

    let (status, body) = app.post("/user/toggle-like/not-a-uuid", &token, None).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Invalid user id.");
}

#[sqlx::test]
#[ignore] // Requires PostgreSQL
async fn test_request_accept_flow(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let a = create_active_user(&pool, "male").await;
    let b = create_active_user(&pool, "female").await;
    let token_a = app.token_for(&a);
    let token_b = app.token_for(&b);

    let (status, body) = app
        .post(&format!("/user/send-shortlist-request/{}", b.id), &token_a, None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Shortlist request sent successfully.");

    let (_, pending) = app.get("/user/get-pending-shortlist-requests", &token_b).await;
    assert_eq!(ids(&pending["data"]), vec![a.id.to_string()]);
    let (_, sent) = app.get("/user/get-sent-shortlist-requests", &token_a).await;
    assert_eq!(ids(&sent["data"]), vec![b.id.to_string()]);

    let (_, status_a) = app
        .get(&format!("/user/get-shortlist-status/{}", b.id), &token_a)
        .await;
    assert_eq!(status_a["data"]["status"], "requested");
    let (_, status_b) = app
        .get(&format!("/user/get-shortlist-status/{}", a.id), &token_b)
        .await;
    assert_eq!(status_b["data"]["status"], "incoming");

    // Either direction is a duplicate while pending
    let (status, body) = app
        .post(&format!("/user/send-shortlist-request/{}", b.id), &token_a, None)
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "CONFLICT");
    let (status, _) = app
        .post(&format!("/user/send-shortlist-request/{}", a.id), &token_b, None)
        .await;
    assert_eq!(status, 400);

    let (status, body) = app
        .post(&format!("/user/accept-shortlist-request/{}", a.id), &token_b, None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Shortlist request accepted successfully.");

    for (token, other) in [(&token_a, &b), (&token_b, &a)] {
        let (_, listed) = app.get("/user/get-shortlisted-users", token).await;
        let entries = listed["data"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["id"], other.id.to_string());
        assert_eq!(entries[0]["shortlistStatus"], "accepted");
        assert_eq!(entries[0]["isMutual"], true);
    }

    let (_, pending) = app.get("/user/get-pending-shortlist-requests", &token_b).await;
    assert!(ids(&pending["data"]).is_empty());
    let (_, sent) = app.get("/user/get-sent-shortlist-requests", &token_a).await;
    assert!(ids(&sent["data"]).is_empty());

    // Accepting again is a conflict
    let (status, body) = app
        .post(&format!("/user/accept-shortlist-request/{}", a.id), &token_b, None)
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "You are already connected.");
}

#[sqlx::test]
#[ignore] // Requires PostgreSQL
async fn test_reject_clears_and_allows_resend(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let a = create_active_user(&pool, "male").await;
    let b = create_active_user(&pool, "female").await;
    let token_a = app.token_for(&a);
    let token_b = app.token_for(&b);

    app.post(&format!("/user/send-shortlist-request/{}", b.id), &token_a, None)
        .await;

    let (status, body) = app
        .post(&format!("/user/reject-shortlist-request/{}", a.id), &token_b, None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Shortlist request rejected successfully.");

    let (_, relation) = app
        .get(&format!("/user/get-shortlist-status/{}", b.id), &token_a)
        .await;
    assert_eq!(relation["data"]["status"], "none");

    let (status, _) = app
        .post(&format!("/user/send-shortlist-request/{}", b.id), &token_a, None)
        .await;
    assert_eq!(status, 200);

    let (_, pending) = app.get("/user/get-pending-shortlist-requests", &token_b).await;
    assert_eq!(ids(&pending["data"]), vec![a.id.to_string()]);
}

#[sqlx::test]
#[ignore] // Requires PostgreSQL
async fn test_invalid_transitions(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let a = create_active_user(&pool, "male").await;
    let b = create_active_user(&pool, "female").await;
    let token_a = app.token_for(&a);

    let (status, body) = app
        .post(&format!("/user/send-shortlist-request/{}", a.id), &token_a, None)
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "You cannot shortlist your own profile.");

    let (status, body) = app
        .post(&format!("/user/accept-shortlist-request/{}", b.id), &token_a, None)
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "No pending shortlist request from this user.");

    // The sender cannot accept their own request
    app.post(&format!("/user/send-shortlist-request/{}", b.id), &token_a, None)
        .await;
    let (status, _) = app
        .post(&format!("/user/accept-shortlist-request/{}", b.id), &token_a, None)
        .await;
    assert_eq!(status, 400);

    let (status, _) = app
        .post(
            &format!("/user/send-shortlist-request/{}", Uuid::now_v7()),
            &token_a,
            None,
        )
        .await;
    assert_eq!(status, 404);

    let (status, _) = app
        .get(&format!("/user/get-shortlist-status/{}", Uuid::now_v7()), &token_a)
        .await;
    assert_eq!(status, 404);
}

#[sqlx::test]
#[ignore] // Requires PostgreSQL
async fn test_crossed_requests_leave_one_pending_record(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let a = create_active_user(&pool, "male").await;
    let b = create_active_user(&pool, "female").await;
    let token_a = app.token_for(&a);
    let token_b = app.token_for(&b);
    let to_b = format!("/user/send-shortlist-request/{}", b.id);
    let to_a = format!("/user/send-shortlist-request/{}", a.id);

    let ((status_ab, body_ab), (status_ba, body_ba)) = tokio::join!(
        app.post(&to_b, &token_a, None),
        app.post(&to_a, &token_b, None),
    );

    let mut statuses = [status_ab, status_ba];
    statuses.sort_unstable();
    assert_eq!(statuses, [200, 400], "{body_ab} / {body_ba}");
    let loser = if status_ab == 400 { &body_ab } else { &body_ba };
    assert_eq!(loser["error"], "CONFLICT");

    let records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shortlists")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(records, 1);
}

#[sqlx::test]
#[ignore] // Requires PostgreSQL
async fn test_racing_accept_and_reject_settle_once(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let a = create_active_user(&pool, "male").await;
    let b = create_active_user(&pool, "female").await;
    let token_a = app.token_for(&a);
    let token_b = app.token_for(&b);

    let (status, _) = app
        .post(&format!("/user/send-shortlist-request/{}", b.id), &token_a, None)
        .await;
    assert_eq!(status, 200);

    let accept = format!("/user/accept-shortlist-request/{}", a.id);
    let reject = format!("/user/reject-shortlist-request/{}", a.id);
    let ((accepted, _), (rejected, _)) = tokio::join!(
        app.post(&accept, &token_b, None),
        app.post(&reject, &token_b, None),
    );

    let mut statuses = [accepted, rejected];
    statuses.sort_unstable();
    assert_eq!(statuses, [200, 400]);

    let stored: Vec<String> = sqlx::query_scalar("SELECT status::text FROM shortlists")
        .fetch_all(&pool)
        .await
        .unwrap();
    let expected = if accepted == 200 { "accepted" } else { "declined" };
    assert_eq!(stored, vec![expected.to_string()]);
}
