//! Shortlist and Like Queries

use sqlx::{PgConnection, PgExecutor, PgPool};
use tracing::error;
use uuid::Uuid;
use vivah_common::ShortlistStatus;

use super::types::MatchRow;
use crate::db::{db_error, ProfileSummary, Shortlist};

// ============================================================================
// Relationship Records
// ============================================================================

/// The record for an unordered pair, if any.
pub async fn find_pair<'e>(
    executor: impl PgExecutor<'e>,
    a: Uuid,
    b: Uuid,
) -> sqlx::Result<Option<Shortlist>> {
    sqlx::query_as::<_, Shortlist>(
        r"
        SELECT * FROM shortlists
        WHERE (requester_id = $1 AND addressee_id = $2)
           OR (requester_id = $2 AND addressee_id = $1)
        ",
    )
    .bind(a)
    .bind(b)
    .fetch_optional(executor)
    .await
    .map_err(db_error!("find_pair", user_a = %a, user_b = %b))
}

/// Open a new pending request.
pub async fn insert_request(
    conn: &mut PgConnection,
    requester_id: Uuid,
    addressee_id: Uuid,
) -> sqlx::Result<Shortlist> {
    sqlx::query_as::<_, Shortlist>(
        r"
        INSERT INTO shortlists (id, requester_id, addressee_id, status)
        VALUES ($1, $2, $3, 'pending')
        RETURNING *
        ",
    )
    .bind(Uuid::now_v7())
    .bind(requester_id)
    .bind(addressee_id)
    .fetch_one(conn)
    .await
    .map_err(db_error!("insert_request", requester_id = %requester_id, addressee_id = %addressee_id))
}

/// Turn a declined record back into a pending request from `requester_id`.
pub async fn reopen_request(
    conn: &mut PgConnection,
    id: Uuid,
    requester_id: Uuid,
    addressee_id: Uuid,
) -> sqlx::Result<Shortlist> {
    sqlx::query_as::<_, Shortlist>(
        r"
        UPDATE shortlists
        SET requester_id = $2, addressee_id = $3, status = 'pending', updated_at = NOW()
        WHERE id = $1 AND status = 'declined'
        RETURNING *
        ",
    )
    .bind(id)
    .bind(requester_id)
    .bind(addressee_id)
    .fetch_one(conn)
    .await
    .map_err(db_error!("reopen_request", shortlist_id = %id))
}

/// Resolve a pending request.
///
/// Only applies while the record is still pending, so a stale decision can
/// never overwrite a newer state.
pub async fn resolve_request(
    conn: &mut PgConnection,
    id: Uuid,
    status: ShortlistStatus,
) -> sqlx::Result<Shortlist> {
    sqlx::query_as::<_, Shortlist>(
        r"
        UPDATE shortlists
        SET status = $2, updated_at = NOW()
        WHERE id = $1 AND status = 'pending'
        RETURNING *
        ",
    )
    .bind(id)
    .bind(status)
    .fetch_one(conn)
    .await
    .map_err(db_error!("resolve_request", shortlist_id = %id, status = %status))
}

// ============================================================================
// Relationship Lists
// ============================================================================

/// Users with a pending request to `user_id`, newest first.
pub async fn list_incoming(pool: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<ProfileSummary>> {
    sqlx::query_as::<_, ProfileSummary>(
        r"
        SELECT u.id, u.full_name, u.profile_url, u.basic_information, u.status
        FROM shortlists s
        JOIN users u ON u.id = s.requester_id
        WHERE s.addressee_id = $1 AND s.status = 'pending'
        ORDER BY s.updated_at DESC
        ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(db_error!("list_incoming", user_id = %user_id))
}

/// Users `user_id` has a pending request out to, newest first.
pub async fn list_outgoing(pool: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<ProfileSummary>> {
    sqlx::query_as::<_, ProfileSummary>(
        r"
        SELECT u.id, u.full_name, u.profile_url, u.basic_information, u.status
        FROM shortlists s
        JOIN users u ON u.id = s.addressee_id
        WHERE s.requester_id = $1 AND s.status = 'pending'
        ORDER BY s.updated_at DESC
        ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(db_error!("list_outgoing", user_id = %user_id))
}

/// Accepted relationships of `user_id` with the counterpart's public fields.
pub async fn list_matches(pool: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<MatchRow>> {
    sqlx::query_as::<_, MatchRow>(
        r"
        SELECT u.id, u.full_name, u.profile_url, u.basic_information, u.status,
               s.requester_id, s.addressee_id,
               s.status AS shortlist_status, s.updated_at AS matched_at
        FROM shortlists s
        JOIN users u ON u.id = CASE
            WHEN s.requester_id = $1 THEN s.addressee_id
            ELSE s.requester_id
        END
        WHERE (s.requester_id = $1 OR s.addressee_id = $1)
          AND s.status = 'accepted'
        ORDER BY s.updated_at DESC
        ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(db_error!("list_matches", user_id = %user_id))
}

// ============================================================================
// Likes
// ============================================================================

/// Flip whether `user_id` likes `target_id`. Returns the new state.
pub async fn toggle_like(pool: &PgPool, user_id: Uuid, target_id: Uuid) -> sqlx::Result<bool> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM user_likes WHERE user_id = $1 AND liked_user_id = $2")
        .bind(user_id)
        .bind(target_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error!("toggle_like.delete", user_id = %user_id, target_id = %target_id))?
        .rows_affected();

    if removed == 0 {
        sqlx::query(
            r"
            INSERT INTO user_likes (user_id, liked_user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(user_id)
        .bind(target_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error!("toggle_like.insert", user_id = %user_id, target_id = %target_id))?;
    }

    tx.commit().await?;
    Ok(removed == 0)
}

/// Users `user_id` has liked, most recent first.
pub async fn list_liked(pool: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<ProfileSummary>> {
    sqlx::query_as::<_, ProfileSummary>(
        r"
        SELECT u.id, u.full_name, u.profile_url, u.basic_information, u.status
        FROM user_likes l
        JOIN users u ON u.id = l.liked_user_id
        WHERE l.user_id = $1
        ORDER BY l.created_at DESC
        ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(db_error!("list_liked", user_id = %user_id))
}
