//! Matchmaking HTTP Handlers
//!
//! Every transition runs in one transaction that locks both users' rows
//! (ascending id order), re-reads the pair record and only then writes.

use axum::extract::{Path, State};
use sqlx::PgPool;
use uuid::Uuid;
use vivah_common::{RelationshipView, ShortlistStatus};

use super::queries;
use super::state::{self as machine, PairRecord, SendAction};
use super::types::{LikeData, RelationshipData, ShortlistError, ShortlistedUser};
use crate::api::{ApiResponse, AppState};
use crate::auth::AuthUser;
use crate::db::{find_user_by_id, lock_user_pair, ProfileSummary};
use crate::util::parse_user_id;

type ShortlistResult<T> = Result<ApiResponse<T>, ShortlistError>;

fn path_user_id(raw: &str) -> Result<Uuid, ShortlistError> {
    parse_user_id(raw).ok_or(ShortlistError::InvalidId)
}

/// POST /user/toggle-like/{target_user_id}
#[tracing::instrument(skip(state), fields(user_id = %auth.id))]
pub async fn toggle_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(target): Path<String>,
) -> ShortlistResult<LikeData> {
    let target_id = path_user_id(&target)?;
    if target_id == auth.id {
        return Err(ShortlistError::SelfLike);
    }

    find_user_by_id(&state.db, target_id)
        .await?
        .ok_or(ShortlistError::UserNotFound)?;

    let liked = queries::toggle_like(&state.db, auth.id, target_id).await?;
    let message = if liked {
        "User liked successfully."
    } else {
        "User unliked successfully."
    };

    Ok(ApiResponse::ok(
        message,
        LikeData {
            user_id: target_id,
            liked,
        },
    ))
}

/// POST /user/send-shortlist-request/{target_user_id}
#[tracing::instrument(skip(state), fields(user_id = %auth.id))]
pub async fn send_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(target): Path<String>,
) -> ShortlistResult<RelationshipData> {
    let target_id = path_user_id(&target)?;
    if target_id == auth.id {
        return Err(ShortlistError::SelfRequest);
    }

    let mut tx = state.db.begin().await?;

    let locked = lock_user_pair(&mut *tx, auth.id, target_id).await?;
    if locked.len() < 2 {
        return Err(ShortlistError::UserNotFound);
    }

    let existing = queries::find_pair(&mut *tx, auth.id, target_id).await?;
    match machine::check_send(auth.id, target_id, existing.as_ref().map(PairRecord::from))? {
        SendAction::Insert => {
            queries::insert_request(&mut *tx, auth.id, target_id).await?;
        }
        SendAction::Reopen => {
            // check_send only reopens an existing record
            let Some(record) = existing else {
                return Err(ShortlistError::NoPendingRequest);
            };
            queries::reopen_request(&mut *tx, record.id, auth.id, target_id).await?;
        }
    }

    tx.commit().await?;

    tracing::info!(target_id = %target_id, "Shortlist request sent");

    Ok(ApiResponse::ok(
        "Shortlist request sent successfully.",
        RelationshipData {
            user_id: target_id,
            status: RelationshipView::Requested,
        },
    ))
}

/// Lock the pair, validate with `check` and move the pending record to `to`.
async fn resolve(
    state: &AppState,
    actor: Uuid,
    requester_id: Uuid,
    check: fn(Uuid, Uuid, Option<PairRecord>) -> Result<(), ShortlistError>,
    to: ShortlistStatus,
) -> Result<(), ShortlistError> {
    let mut tx = state.db.begin().await?;

    let locked = lock_user_pair(&mut *tx, actor, requester_id).await?;
    if !locked.iter().any(|u| u.id == requester_id) {
        return Err(ShortlistError::UserNotFound);
    }

    let existing = queries::find_pair(&mut *tx, actor, requester_id).await?;
    check(actor, requester_id, existing.as_ref().map(PairRecord::from))?;

    let Some(record) = existing else {
        return Err(ShortlistError::NoPendingRequest);
    };
    queries::resolve_request(&mut *tx, record.id, to).await?;

    tx.commit().await?;
    Ok(())
}

/// POST /user/accept-shortlist-request/{requester_id}
#[tracing::instrument(skip(state), fields(user_id = %auth.id))]
pub async fn accept_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(requester): Path<String>,
) -> ShortlistResult<RelationshipData> {
    let requester_id = path_user_id(&requester)?;

    resolve(
        &state,
        auth.id,
        requester_id,
        machine::check_accept,
        ShortlistStatus::Accepted,
    )
    .await?;

    tracing::info!(requester_id = %requester_id, "Shortlist request accepted");

    Ok(ApiResponse::ok(
        "Shortlist request accepted successfully.",
        RelationshipData {
            user_id: requester_id,
            status: RelationshipView::Accepted,
        },
    ))
}

/// POST /user/reject-shortlist-request/{requester_id}
#[tracing::instrument(skip(state), fields(user_id = %auth.id))]
pub async fn reject_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(requester): Path<String>,
) -> ShortlistResult<RelationshipData> {
    let requester_id = path_user_id(&requester)?;

    resolve(
        &state,
        auth.id,
        requester_id,
        machine::check_reject,
        ShortlistStatus::Declined,
    )
    .await?;

    tracing::info!(requester_id = %requester_id, "Shortlist request rejected");

    Ok(ApiResponse::ok(
        "Shortlist request rejected successfully.",
        RelationshipData {
            user_id: requester_id,
            status: RelationshipView::None,
        },
    ))
}

/// GET /user/get-shortlist-status/{target_user_id}
pub async fn shortlist_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(target): Path<String>,
) -> ShortlistResult<RelationshipData> {
    let target_id = path_user_id(&target)?;

    find_user_by_id(&state.db, target_id)
        .await?
        .ok_or(ShortlistError::UserNotFound)?;

    let record = queries::find_pair(&state.db, auth.id, target_id).await?;
    let status = machine::view(auth.id, record.as_ref().map(PairRecord::from));

    Ok(ApiResponse::ok(
        "Shortlist status fetched successfully.",
        RelationshipData {
            user_id: target_id,
            status,
        },
    ))
}

/// GET /user/get-pending-shortlist-requests
pub async fn pending_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ShortlistResult<Vec<ProfileSummary>> {
    let users = queries::list_incoming(&state.db, auth.id).await?;
    Ok(ApiResponse::ok(
        "Pending shortlist requests fetched successfully.",
        users,
    ))
}

/// GET /user/get-sent-shortlist-requests
pub async fn sent_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ShortlistResult<Vec<ProfileSummary>> {
    let users = queries::list_outgoing(&state.db, auth.id).await?;
    Ok(ApiResponse::ok(
        "Sent shortlist requests fetched successfully.",
        users,
    ))
}

/// Accepted relationships of a user.
///
/// Rows come from accepted records only, so `is_mutual` holds for every entry.
pub async fn shortlisted_for(pool: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<ShortlistedUser>> {
    let rows = queries::list_matches(pool, user_id).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let record = PairRecord {
                requester_id: row.requester_id,
                addressee_id: row.addressee_id,
                status: row.shortlist_status,
            };
            ShortlistedUser {
                profile: row.profile,
                shortlist_status: row.shortlist_status,
                is_mutual: machine::is_mutual(record),
                matched_at: row.matched_at,
            }
        })
        .collect())
}

/// GET /user/get-shortlisted-users
pub async fn shortlisted_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ShortlistResult<Vec<ShortlistedUser>> {
    let users = shortlisted_for(&state.db, auth.id).await?;
    Ok(ApiResponse::ok("Shortlisted users fetched successfully.", users))
}
