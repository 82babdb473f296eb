//! Profile and Onboarding Handlers

use axum::extract::{Path, State};
use validator::Validate;

use super::onboarding::plan_step;
use super::types::{
    AddImagesRequest, ImageCollectionData, MyProfileData, OnboardingData, OnboardingRequest,
    ProfileError, ProfileImageRequest, MAX_COLLECTION_IMAGES,
};
use crate::api::{ApiResponse, AppState, Json};
use crate::auth::AuthUser;
use crate::db::{
    append_images, find_user_by_id, save_onboarding_step, update_profile_url, UserProfile,
};
use crate::matchmaking::{handlers::shortlisted_for, queries::list_liked};
use crate::util::{first_validation_message, parse_user_id};

type ProfileResult<T> = Result<ApiResponse<T>, ProfileError>;

/// GET /profile/{id}
pub async fn get_profile(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ProfileResult<UserProfile> {
    let user_id = parse_user_id(&id).ok_or(ProfileError::InvalidId)?;

    let user = find_user_by_id(&state.db, user_id)
        .await?
        .ok_or(ProfileError::UserNotFound)?;

    Ok(ApiResponse::ok(
        "Profile fetched successfully.",
        UserProfile::from(user),
    ))
}

/// GET /user/my-profile
#[tracing::instrument(skip(state), fields(user_id = %auth.id))]
pub async fn my_profile(State(state): State<AppState>, auth: AuthUser) -> ProfileResult<MyProfileData> {
    let user = find_user_by_id(&state.db, auth.id)
        .await?
        .ok_or(ProfileError::UserNotFound)?;

    let liked_users = list_liked(&state.db, auth.id).await?;
    let shortlisted_users = shortlisted_for(&state.db, auth.id).await?;

    Ok(ApiResponse::ok(
        "Profile fetched successfully.",
        MyProfileData {
            user: UserProfile::from(user),
            liked_users,
            shortlisted_users,
        },
    ))
}

/// Save one onboarding step.
///
/// Steps may be re-submitted but not skipped: a step beyond the stored one
/// is refused, and progress never moves backwards.
///
/// POST /user/update-onboarding
#[tracing::instrument(skip(state, body), fields(user_id = %auth.id, step = ?body.step))]
pub async fn update_onboarding(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<OnboardingRequest>,
) -> ProfileResult<OnboardingData> {
    let step = body
        .step
        .ok_or_else(|| ProfileError::Validation("Onboarding step is required.".into()))?;
    let plan = plan_step(step, body.data)?;

    let saved = save_onboarding_step(
        &state.db,
        auth.id,
        plan.section.column(),
        plan.data.as_ref(),
        plan.step,
        plan.next_step,
        plan.status,
    )
    .await?;

    let user = match saved {
        Some(user) => user,
        None => {
            let current = find_user_by_id(&state.db, auth.id)
                .await?
                .ok_or(ProfileError::UserNotFound)?;
            return Err(ProfileError::StepOutOfOrder {
                current: current.onboarding_step,
            });
        }
    };

    tracing::info!(
        onboarding_step = user.onboarding_step,
        onboarding_status = %user.onboarding_status,
        "Onboarding step saved"
    );

    Ok(ApiResponse::ok(
        plan.success_message(),
        OnboardingData {
            onboarding_step: user.onboarding_step,
            onboarding_status: user.onboarding_status,
            user: UserProfile::from(user),
        },
    ))
}

/// POST /user/update-profile-image
#[tracing::instrument(skip(state, body), fields(user_id = %auth.id))]
pub async fn update_profile_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ProfileImageRequest>,
) -> ProfileResult<UserProfile> {
    let Some(profile_url) = body.profile_url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    else {
        return Err(ProfileError::Validation("Profile image URL is required.".into()));
    };
    body.validate()
        .map_err(|e| ProfileError::Validation(first_validation_message(&e)))?;

    let user = update_profile_url(&state.db, auth.id, profile_url)
        .await?
        .ok_or(ProfileError::UserNotFound)?;

    Ok(ApiResponse::ok(
        "Profile image updated successfully.",
        UserProfile::from(user),
    ))
}

/// POST /user/add-images
#[tracing::instrument(skip(state, body), fields(user_id = %auth.id))]
pub async fn add_images(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<AddImagesRequest>,
) -> ProfileResult<ImageCollectionData> {
    let urls = body
        .image_collection_urls
        .map(|u| u.into_urls())
        .unwrap_or_default();
    if urls.is_empty() {
        return Err(ProfileError::Validation(
            "Please provide at least one image URL.".into(),
        ));
    }
    let appended = if urls.len() > MAX_COLLECTION_IMAGES {
        None
    } else {
        append_images(&state.db, auth.id, &urls, MAX_COLLECTION_IMAGES as i32).await?
    };

    let image_urls = match appended {
        Some(image_urls) => image_urls,
        None => {
            let current = find_user_by_id(&state.db, auth.id)
                .await?
                .ok_or(ProfileError::UserNotFound)?;
            return Err(ProfileError::CollectionFull {
                max: MAX_COLLECTION_IMAGES,
                current: current.image_urls.len(),
            });
        }
    };

    Ok(ApiResponse::ok(
        "Images added successfully.",
        ImageCollectionData {
            count: image_urls.len(),
            image_urls,
        },
    ))
}
