//! Database Queries
//!
//! Runtime queries (no compile-time `DATABASE_URL` required).
//!
//! All query functions include error context logging to aid debugging.

use serde_json::Value;
use sqlx::{PgConnection, PgPool};
use tracing::error;
use uuid::Uuid;
use vivah_common::{Gender, OnboardingStatus, UserRole, UserStatus};

use super::models::{OneSidedMarriage, StatusCount, User};

/// Log and return a database error with context.
///
/// This helper ensures all database errors are logged with relevant context
/// before being propagated, making production debugging easier.
macro_rules! db_error {
    ($query:expr) => {
        |e| {
            error!(query = $query, error = %e, "Database query failed");
            e
        }
    };
    ($query:expr, $($field:tt)*) => {
        |e| {
            error!(query = $query, $($field)*, error = %e, "Database query failed");
            e
        }
    };
}

pub(crate) use db_error;

// ============================================================================
// User Lookup
// ============================================================================

/// Find user by ID.
pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_user_by_id", user_id = %id))
}

/// Find user by (already normalized) email.
pub async fn find_user_by_email(pool: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_user_by_email", email = %email))
}

/// Find user by phone number.
pub async fn find_user_by_phone(pool: &PgPool, phone_no: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone_no = $1")
        .bind(phone_no)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_user_by_phone", phone_no = %phone_no))
}

/// Fields needed to create a user.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone_no: &'a str,
    pub password_hash: &'a str,
    pub role: UserRole,
}

/// Create a new user.
///
/// Duplicate email or phone surfaces as a unique violation on
/// `users_email_key` / `users_phone_no_key`.
pub async fn create_user(pool: &PgPool, new_user: &NewUser<'_>) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(
        r"
        INSERT INTO users (id, full_name, email, phone_no, password_hash, role)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        ",
    )
    .bind(Uuid::now_v7())
    .bind(new_user.full_name)
    .bind(new_user.email)
    .bind(new_user.phone_no)
    .bind(new_user.password_hash)
    .bind(new_user.role)
    .fetch_one(pool)
    .await
    .map_err(db_error!("create_user", email = %new_user.email))
}

/// Lock two user rows for the rest of the transaction.
///
/// Rows are locked in ascending id order so concurrent pair operations can
/// not deadlock. Missing users are simply absent from the result.
pub async fn lock_user_pair(conn: &mut PgConnection, a: Uuid, b: Uuid) -> sqlx::Result<Vec<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1) ORDER BY id FOR UPDATE")
        .bind(vec![a, b])
        .fetch_all(conn)
        .await
        .map_err(db_error!("lock_user_pair", user_a = %a, user_b = %b))
}

// ============================================================================
// Discovery
// ============================================================================

/// Active users of the given gender, newest first, excluding the viewer.
pub async fn list_discovery_profiles(
    pool: &PgPool,
    viewer_id: Uuid,
    gender: Gender,
    limit: i64,
) -> sqlx::Result<Vec<User>> {
    sqlx::query_as::<_, User>(
        r"
        SELECT * FROM users
        WHERE status = 'active'
          AND lower(basic_information->>'gender') = $2
          AND id <> $1
        ORDER BY created_at DESC
        LIMIT $3
        ",
    )
    .bind(viewer_id)
    .bind(gender.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(db_error!("list_discovery_profiles", viewer_id = %viewer_id))
}

// ============================================================================
// Onboarding & Profile
// ============================================================================

/// Write one onboarding section and advance progress.
///
/// `column` must be one of the five section columns. The write only applies
/// when the stored step has reached `submitted_step`; the step never
/// decreases and a completed onboarding stays completed. Returns `None` when
/// the guard did not match.
pub async fn save_onboarding_step(
    pool: &PgPool,
    user_id: Uuid,
    column: &'static str,
    data: Option<&Value>,
    submitted_step: i16,
    next_step: i16,
    status: OnboardingStatus,
) -> sqlx::Result<Option<User>> {
    let sql = format!(
        r"
        UPDATE users
        SET {column} = COALESCE($2, {column}),
            onboarding_step = GREATEST(onboarding_step, $3),
            onboarding_status = CASE
                WHEN onboarding_status = 'completed' THEN onboarding_status
                ELSE $4
            END,
            updated_at = NOW()
        WHERE id = $1 AND onboarding_step >= $5
        RETURNING *
        "
    );

    sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .bind(data)
        .bind(next_step)
        .bind(status)
        .bind(submitted_step)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("save_onboarding_step", user_id = %user_id, step = submitted_step))
}

/// Set the profile image URL.
pub async fn update_profile_url(
    pool: &PgPool,
    user_id: Uuid,
    profile_url: &str,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET profile_url = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(user_id)
    .bind(profile_url)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("update_profile_url", user_id = %user_id))
}

/// Append images to the collection if the result stays within `max_images`.
///
/// Returns the new collection, or `None` when the limit would be exceeded.
pub async fn append_images(
    pool: &PgPool,
    user_id: Uuid,
    urls: &[String],
    max_images: i32,
) -> sqlx::Result<Option<Vec<String>>> {
    sqlx::query_scalar::<_, Vec<String>>(
        r"
        UPDATE users
        SET image_urls = image_urls || $2, updated_at = NOW()
        WHERE id = $1 AND cardinality(image_urls) + cardinality($2::text[]) <= $3
        RETURNING image_urls
        ",
    )
    .bind(user_id)
    .bind(urls)
    .bind(max_images)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("append_images", user_id = %user_id, count = urls.len()))
}

// ============================================================================
// Admin
// ============================================================================

/// List users, newest first, optionally filtered by status.
pub async fn list_users(
    pool: &PgPool,
    status: Option<UserStatus>,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<User>> {
    sqlx::query_as::<_, User>(
        r"
        SELECT * FROM users
        WHERE ($1::user_status IS NULL OR status = $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        ",
    )
    .bind(status)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(db_error!("list_users"))
}

/// Count users, optionally filtered by status.
pub async fn count_users(pool: &PgPool, status: Option<UserStatus>) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE ($1::user_status IS NULL OR status = $1)",
    )
    .bind(status)
    .fetch_one(pool)
    .await
    .map_err(db_error!("count_users"))
}

/// Number of users per status. Statuses nobody holds are absent.
pub async fn count_users_by_status(pool: &PgPool) -> sqlx::Result<Vec<StatusCount>> {
    sqlx::query_as::<_, StatusCount>(
        "SELECT status, COUNT(*) AS count FROM users GROUP BY status",
    )
    .fetch_all(pool)
    .await
    .map_err(db_error!("count_users_by_status"))
}

/// Set a non-married status. Clears the user's own marriage link.
pub async fn update_user_status(
    pool: &PgPool,
    user_id: Uuid,
    status: UserStatus,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r"
        UPDATE users
        SET status = $2, married_with = NULL, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        ",
    )
    .bind(user_id)
    .bind(status)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("update_user_status", user_id = %user_id, status = %status))
}

/// Mark a user married to `partner_id`. Runs inside the caller's transaction.
pub async fn set_married(
    conn: &mut PgConnection,
    user_id: Uuid,
    partner_id: Uuid,
) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(
        r"
        UPDATE users
        SET status = 'married', married_with = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        ",
    )
    .bind(user_id)
    .bind(partner_id)
    .fetch_one(conn)
    .await
    .map_err(db_error!("set_married", user_id = %user_id, partner_id = %partner_id))
}

/// Change a user's role.
pub async fn update_user_role(
    pool: &PgPool,
    user_id: Uuid,
    role: UserRole,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(user_id)
    .bind(role)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("update_user_role", user_id = %user_id, role = %role))
}

/// Marriage links whose partner does not link back.
pub async fn find_one_sided_marriages(pool: &PgPool) -> sqlx::Result<Vec<OneSidedMarriage>> {
    sqlx::query_as::<_, OneSidedMarriage>(
        r"
        SELECT u.id AS user_id, p.id AS partner_id, p.married_with AS partner_married_with
        FROM users u
        JOIN users p ON p.id = u.married_with
        WHERE p.married_with IS DISTINCT FROM u.id
        ",
    )
    .fetch_all(pool)
    .await
    .map_err(db_error!("find_one_sided_marriages"))
}
