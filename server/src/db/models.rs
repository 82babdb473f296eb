//! Database Models
//!
//! Row types are never serialized directly. Responses go through the
//! projections below, none of which carry the password hash.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;
use vivah_common::{Gender, OnboardingStatus, ShortlistStatus, UserRole, UserStatus};

/// User model.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_no: String,
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub onboarding_status: OnboardingStatus,
    pub onboarding_step: i16,
    pub profile_url: Option<String>,
    pub image_urls: Vec<String>,
    pub basic_information: Option<Value>,
    pub education_occupation: Option<Value>,
    pub family_contact_address: Option<Value>,
    pub partner_preference: Option<Value>,
    pub hobbies_interests_skills: Option<Value>,
    pub married_with: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What `basic_information.gender` holds for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenderField {
    Missing,
    Known(Gender),
    Unrecognized(String),
}

impl User {
    /// Read the gender out of the free-form basic information section.
    pub fn gender(&self) -> GenderField {
        let raw = self
            .basic_information
            .as_ref()
            .and_then(|info| info.get("gender"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|g| !g.is_empty());

        match raw {
            None => GenderField::Missing,
            Some(raw) => match raw.to_lowercase().parse::<Gender>() {
                Ok(gender) => GenderField::Known(gender),
                Err(_) => GenderField::Unrecognized(raw.to_string()),
            },
        }
    }
}

/// Full profile as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_no: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub onboarding_status: OnboardingStatus,
    pub onboarding_step: i16,
    pub profile_url: Option<String>,
    pub image_urls: Vec<String>,
    #[serde(rename = "basic_information")]
    pub basic_information: Option<Value>,
    #[serde(rename = "education_occupation")]
    pub education_occupation: Option<Value>,
    #[serde(rename = "family_contact_address")]
    pub family_contact_address: Option<Value>,
    #[serde(rename = "partner_preference")]
    pub partner_preference: Option<Value>,
    #[serde(rename = "hobbies_interests_skills")]
    pub hobbies_interests_skills: Option<Value>,
    pub married_with: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone_no: user.phone_no,
            role: user.role,
            status: user.status,
            onboarding_status: user.onboarding_status,
            onboarding_step: user.onboarding_step,
            profile_url: user.profile_url,
            image_urls: user.image_urls,
            basic_information: user.basic_information,
            education_occupation: user.education_occupation,
            family_contact_address: user.family_contact_address,
            partner_preference: user.partner_preference,
            hobbies_interests_skills: user.hobbies_interests_skills,
            married_with: user.married_with,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Public fields of another user, used in relationship and like lists.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub id: Uuid,
    pub full_name: String,
    pub profile_url: Option<String>,
    #[serde(rename = "basic_information")]
    pub basic_information: Option<Value>,
    pub status: UserStatus,
}

/// Canonical relationship record for one unordered pair of users.
#[derive(Debug, Clone, FromRow)]
pub struct Shortlist {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
    pub status: ShortlistStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Number of users holding one status.
#[derive(Debug, Clone, FromRow)]
pub struct StatusCount {
    pub status: UserStatus,
    pub count: i64,
}

/// A marriage link whose partner does not point back.
#[derive(Debug, Clone, FromRow)]
pub struct OneSidedMarriage {
    pub user_id: Uuid,
    pub partner_id: Uuid,
    pub partner_married_with: Option<Uuid>,
}
