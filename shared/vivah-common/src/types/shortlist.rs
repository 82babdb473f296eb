//! Shortlist (match request) Types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::user::wire_names;
use crate::error::Error;

/// Stored state of the single relationship record kept per pair of users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "shortlist_status", rename_all = "lowercase")
)]
pub enum ShortlistStatus {
    Pending,
    Accepted,
    Declined,
}

wire_names!(ShortlistStatus, "shortlist status", {
    Pending => "pending",
    Accepted => "accepted",
    Declined => "declined",
});

/// A relationship as seen by one of its two participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipView {
    /// No open or accepted relationship.
    #[default]
    None,
    /// The viewer sent a request that is still pending.
    Requested,
    /// The other party sent the viewer a request that is still pending.
    Incoming,
    /// Both parties are matched.
    Accepted,
}

wire_names!(RelationshipView, "relationship", {
    None => "none",
    Requested => "requested",
    Incoming => "incoming",
    Accepted => "accepted",
});
