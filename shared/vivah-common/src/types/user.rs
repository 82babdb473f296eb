//! User Types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Implements `as_str`, `Display` and `FromStr` over the wire names of an enum.
macro_rules! wire_names {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire name of this variant.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    other => Err(Error::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                        allowed: [$($name),+].join(", "),
                    }),
                }
            }
        }
    };
}

pub(crate) use wire_names;

/// Account role. Governs access to admin operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "user_role", rename_all = "lowercase"))]
pub enum UserRole {
    #[default]
    User,
    Admin,
    SuperAdmin,
}

wire_names!(UserRole, "role", {
    User => "user",
    Admin => "admin",
    SuperAdmin => "superadmin",
});

impl UserRole {
    /// Whether this role may use the admin surface at all.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    /// Whether an actor with this role may act on an account holding `target`.
    ///
    /// Plain admins cannot touch superadmin accounts.
    #[must_use]
    pub const fn can_manage(self, target: Self) -> bool {
        match self {
            Self::SuperAdmin => true,
            Self::Admin => !matches!(target, Self::SuperAdmin),
            Self::User => false,
        }
    }

    /// Whether an actor with this role may hand out `role`.
    #[must_use]
    pub const fn can_grant(self, role: Self) -> bool {
        match self {
            Self::SuperAdmin => true,
            Self::Admin => !matches!(role, Self::SuperAdmin),
            Self::User => false,
        }
    }
}

/// Account status. Only `active` accounts take part in discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "user_status", rename_all = "lowercase"))]
pub enum UserStatus {
    Active,
    Blocked,
    Married,
    Muted,
    #[default]
    Pending,
}

wire_names!(UserStatus, "status", {
    Active => "active",
    Blocked => "blocked",
    Married => "married",
    Muted => "muted",
    Pending => "pending",
});

impl UserStatus {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Gender as recorded in `basic_information.gender`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

wire_names!(Gender, "gender", {
    Male => "male",
    Female => "female",
});

impl Gender {
    /// The gender shown to this user in discovery.
    #[must_use]
    pub const fn complement(self) -> Self {
        match self {
            Self::Male => Self::Female,
            Self::Female => Self::Male,
        }
    }
}

/// Onboarding progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "onboarding_status", rename_all = "snake_case")
)]
pub enum OnboardingStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

wire_names!(OnboardingStatus, "onboarding status", {
    NotStarted => "not_started",
    InProgress => "in_progress",
    Completed => "completed",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names_round_trip() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), *role);
        }
        assert_eq!(
            serde_json::to_string(&UserRole::SuperAdmin).unwrap(),
            "\"superadmin\""
        );
    }

    #[test]
    fn test_unknown_status_lists_allowed_values() {
        let err = "divorced".parse::<UserStatus>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("divorced"));
        assert!(msg.contains("active"));
        assert!(msg.contains("pending"));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(UserRole::default(), UserRole::User);
        assert_eq!(UserStatus::default(), UserStatus::Pending);
        assert_eq!(OnboardingStatus::default(), OnboardingStatus::NotStarted);
    }

    #[test]
    fn test_admin_cannot_grant_or_manage_superadmin() {
        assert!(UserRole::Admin.can_grant(UserRole::Admin));
        assert!(UserRole::Admin.can_grant(UserRole::User));
        assert!(!UserRole::Admin.can_grant(UserRole::SuperAdmin));
        assert!(!UserRole::Admin.can_manage(UserRole::SuperAdmin));
        assert!(UserRole::SuperAdmin.can_grant(UserRole::SuperAdmin));
        assert!(UserRole::SuperAdmin.can_manage(UserRole::SuperAdmin));
        assert!(!UserRole::User.can_grant(UserRole::User));
    }

    #[test]
    fn test_gender_complement_is_an_involution() {
        assert_eq!(Gender::Male.complement(), Gender::Female);
        assert_eq!(Gender::Female.complement(), Gender::Male);
        assert_eq!(Gender::Male.complement().complement(), Gender::Male);
    }

    #[test]
    fn test_onboarding_status_snake_case() {
        assert_eq!(
            serde_json::to_string(&OnboardingStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            "not_started".parse::<OnboardingStatus>().unwrap(),
            OnboardingStatus::NotStarted
        );
    }
}
