//! Discovery Handlers

use axum::extract::State;

use super::gate::{check_status, target_gender};
use super::types::{DiscoveryData, DiscoveryError};
use crate::api::{ApiResponse, AppState};
use crate::auth::AuthUser;
use crate::db::{find_user_by_id, list_discovery_profiles, UserProfile};

/// List active profiles of the complementary gender, newest first.
///
/// The acting user is re-read so status and gender reflect the store, not
/// the state captured when the request was authenticated.
///
/// GET /user/get-gender-based-profiles
#[tracing::instrument(skip(state), fields(user_id = %auth.id))]
pub async fn gender_based_profiles(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<ApiResponse<DiscoveryData>, DiscoveryError> {
    let user = find_user_by_id(&state.db, auth.id)
        .await?
        .ok_or(DiscoveryError::UserNotFound)?;

    check_status(user.status)?;
    let looking_for = target_gender(user.gender())?;

    let profiles: Vec<UserProfile> = list_discovery_profiles(
        &state.db,
        user.id,
        looking_for,
        state.config.discovery_limit,
    )
    .await?
    .into_iter()
    .map(UserProfile::from)
    .collect();

    tracing::debug!(count = profiles.len(), looking_for = %looking_for, "Discovery listing");

    Ok(ApiResponse::ok(
        "Profiles fetched successfully.",
        DiscoveryData {
            looking_for,
            count: profiles.len(),
            profiles,
        },
    ))
}
