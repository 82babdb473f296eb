//! Admin API handlers.
//!
//! All routes here sit behind `require_admin`. Plain admins may not act on
//! superadmin accounts.

use axum::extract::{Path, State};
use uuid::Uuid;
use vivah_common::UserStatus;

use super::types::{
    parse_role, parse_status, AdminError, AdminUser, ListUsersParams, MarriageData,
    PaginatedUsers, StatusUpdateData, UpdateRoleRequest, UpdateStatusRequest, UserCountData,
};
use crate::api::{ApiResponse, AppState, Json, Query};
use crate::db::{
    count_users, count_users_by_status, find_user_by_id, list_users, lock_user_pair,
    set_married, update_user_role, update_user_status, User, UserProfile,
};
use crate::util::parse_user_id;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 100;

type AdminResult<T> = Result<ApiResponse<T>, AdminError>;

fn path_user_id(raw: &str) -> Result<Uuid, AdminError> {
    parse_user_id(raw).ok_or(AdminError::InvalidId)
}

fn ensure_can_manage(admin: &AdminUser, target: &User) -> Result<(), AdminError> {
    if admin.role.can_manage(target.role) {
        Ok(())
    } else {
        Err(AdminError::Forbidden(
            "Admins cannot modify a superadmin account.",
        ))
    }
}

// ============================================================================
// Status
// ============================================================================

/// Change a user's status.
///
/// `married` links the user and `marriedWith` on both rows in one
/// transaction. Any other status clears the target's own link only.
///
/// PUT /admin/update-status/{id}
#[tracing::instrument(skip(state, body), fields(admin_id = %admin.id))]
pub async fn update_status(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> AdminResult<StatusUpdateData> {
    let target_id = path_user_id(&id)?;
    let status = parse_status(body.status.as_deref())?;

    if status == UserStatus::Married {
        let partner_id = body
            .married_with
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                AdminError::Validation("marriedWith is required when status is married.".into())
            })?;
        let partner_id = parse_user_id(partner_id).ok_or(AdminError::PartnerNotFound)?;

        let data = marry(&state, &admin, target_id, partner_id).await?;
        return Ok(ApiResponse::ok(
            "User status updated successfully.",
            StatusUpdateData::Married(data),
        ));
    }

    let target = find_user_by_id(&state.db, target_id)
        .await?
        .ok_or(AdminError::UserNotFound)?;
    ensure_can_manage(&admin, &target)?;

    let user = update_user_status(&state.db, target_id, status)
        .await?
        .ok_or(AdminError::UserNotFound)?;

    tracing::info!(target_id = %target_id, status = %status, "User status updated");

    Ok(ApiResponse::ok(
        "User status updated successfully.",
        StatusUpdateData::User(UserProfile::from(user)),
    ))
}

async fn marry(
    state: &AppState,
    admin: &AdminUser,
    user_id: Uuid,
    partner_id: Uuid,
) -> Result<MarriageData, AdminError> {
    if user_id == partner_id {
        return Err(AdminError::SelfMarriage);
    }

    let mut tx = state.db.begin().await?;

    let locked = lock_user_pair(&mut *tx, user_id, partner_id).await?;
    let user = locked
        .iter()
        .find(|u| u.id == user_id)
        .ok_or(AdminError::UserNotFound)?;
    let partner = locked
        .iter()
        .find(|u| u.id == partner_id)
        .ok_or(AdminError::PartnerNotFound)?;

    ensure_can_manage(admin, user)?;
    if user.status == UserStatus::Married || user.married_with.is_some() {
        return Err(AdminError::AlreadyMarried("User"));
    }
    if partner.status == UserStatus::Married || partner.married_with.is_some() {
        return Err(AdminError::AlreadyMarried("Partner"));
    }

    let user = set_married(&mut *tx, user_id, partner_id).await?;
    let partner = set_married(&mut *tx, partner_id, user_id).await?;

    tx.commit().await?;

    tracing::info!(user_id = %user_id, partner_id = %partner_id, "Marriage recorded");

    Ok(MarriageData {
        user: UserProfile::from(user),
        partner: UserProfile::from(partner),
    })
}

// ============================================================================
// Role
// ============================================================================

/// PUT /admin/update-role/{id}
#[tracing::instrument(skip(state, body), fields(admin_id = %admin.id))]
pub async fn update_role(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateRoleRequest>,
) -> AdminResult<UserProfile> {
    let target_id = path_user_id(&id)?;
    let role = parse_role(body.role.as_deref())?;

    if target_id == admin.id {
        return Err(AdminError::SelfRoleChange);
    }
    if !admin.role.can_grant(role) {
        return Err(AdminError::Forbidden(
            "Only a superadmin can grant the superadmin role.",
        ));
    }

    let target = find_user_by_id(&state.db, target_id)
        .await?
        .ok_or(AdminError::UserNotFound)?;
    ensure_can_manage(&admin, &target)?;

    let user = update_user_role(&state.db, target_id, role)
        .await?
        .ok_or(AdminError::UserNotFound)?;

    tracing::info!(target_id = %target_id, from = %target.role, to = %role, "User role updated");

    Ok(ApiResponse::ok(
        "User role updated successfully.",
        UserProfile::from(user),
    ))
}

// ============================================================================
// Listing
// ============================================================================

/// GET /admin/get-all-users
#[tracing::instrument(skip(state, _admin))]
pub async fn get_all_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<ListUsersParams>,
) -> AdminResult<PaginatedUsers> {
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0).max(0);
    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_status(Some(raw))?),
    };

    let users = list_users(&state.db, status, limit, offset).await?;
    let total = count_users(&state.db, status).await?;

    Ok(ApiResponse::ok(
        "Users fetched successfully.",
        PaginatedUsers {
            users: users.into_iter().map(UserProfile::from).collect(),
            total,
            limit,
            offset,
        },
    ))
}

/// GET /admin/get-user-count
pub async fn get_user_count(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AdminResult<UserCountData> {
    let counts = count_users_by_status(&state.db).await?;

    Ok(ApiResponse::ok(
        "User count fetched successfully.",
        UserCountData::from_counts(counts.into_iter().map(|c| (c.status, c.count))),
    ))
}
