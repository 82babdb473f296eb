//! Discovery Eligibility
//!
//! Specific statuses are checked before the general "must be active" rule so
//! each gets its own message.

use vivah_common::{Gender, UserStatus};

use super::types::DiscoveryError;
use crate::db::GenderField;

/// Ensure a user's status allows taking part in discovery.
pub fn check_status(status: UserStatus) -> Result<(), DiscoveryError> {
    match status {
        UserStatus::Blocked => Err(DiscoveryError::Blocked),
        UserStatus::Muted => Err(DiscoveryError::Muted),
        UserStatus::Married => Err(DiscoveryError::Married),
        UserStatus::Active => Ok(()),
        other => Err(DiscoveryError::Inactive(other)),
    }
}

/// The gender whose profiles this user is shown.
pub fn target_gender(gender: GenderField) -> Result<Gender, DiscoveryError> {
    match gender {
        GenderField::Known(gender) => Ok(gender.complement()),
        GenderField::Missing => Err(DiscoveryError::GenderMissing),
        GenderField::Unrecognized(raw) => Err(DiscoveryError::GenderUnrecognized(raw)),
    }
}
