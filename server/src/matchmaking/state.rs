//! Shortlist State Machine
//!
//! One record per unordered pair of users:
//!
//! ```text
//! none / declined --send--> pending(requester -> addressee)
//! pending --addressee accepts--> accepted
//! pending --addressee rejects--> declined (reads as none)
//! accepted: terminal
//! ```
//!
//! These functions only decide; callers hold the row locks and perform the
//! writes.

use uuid::Uuid;
use vivah_common::{RelationshipView, ShortlistStatus};

use super::types::ShortlistError;
use crate::db::Shortlist;

/// The parts of a stored record the transitions look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairRecord {
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
    pub status: ShortlistStatus,
}

impl From<&Shortlist> for PairRecord {
    fn from(row: &Shortlist) -> Self {
        Self {
            requester_id: row.requester_id,
            addressee_id: row.addressee_id,
            status: row.status,
        }
    }
}

/// How a permitted send request is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendAction {
    /// No record yet for the pair.
    Insert,
    /// A declined record is re-opened with the new requester.
    Reopen,
}

/// Decide whether `actor` may send a request to `target`.
pub fn check_send(
    actor: Uuid,
    target: Uuid,
    record: Option<PairRecord>,
) -> Result<SendAction, ShortlistError> {
    if actor == target {
        return Err(ShortlistError::SelfRequest);
    }

    match record.map(|r| r.status) {
        None => Ok(SendAction::Insert),
        Some(ShortlistStatus::Declined) => Ok(SendAction::Reopen),
        Some(ShortlistStatus::Pending) => Err(ShortlistError::AlreadyRequested),
        Some(ShortlistStatus::Accepted) => Err(ShortlistError::AlreadyConnected),
    }
}

/// Whether `record` is a pending request from `requester` to `actor`.
fn is_pending_from(record: PairRecord, requester: Uuid, actor: Uuid) -> bool {
    record.status == ShortlistStatus::Pending
        && record.requester_id == requester
        && record.addressee_id == actor
}

/// Decide whether `actor` may accept the request `requester` sent them.
pub fn check_accept(
    actor: Uuid,
    requester: Uuid,
    record: Option<PairRecord>,
) -> Result<(), ShortlistError> {
    match record {
        Some(r) if r.status == ShortlistStatus::Accepted => Err(ShortlistError::AlreadyConnected),
        Some(r) if is_pending_from(r, requester, actor) => Ok(()),
        _ => Err(ShortlistError::NoPendingRequest),
    }
}

/// Decide whether `actor` may reject the request `requester` sent them.
pub fn check_reject(
    actor: Uuid,
    requester: Uuid,
    record: Option<PairRecord>,
) -> Result<(), ShortlistError> {
    match record {
        Some(r) if is_pending_from(r, requester, actor) => Ok(()),
        _ => Err(ShortlistError::NoPendingRequest),
    }
}

/// The relationship as seen by `viewer`.
pub fn view(viewer: Uuid, record: Option<PairRecord>) -> RelationshipView {
    match record {
        None => RelationshipView::None,
        Some(r) if r.requester_id != viewer && r.addressee_id != viewer => RelationshipView::None,
        Some(r) => match r.status {
            ShortlistStatus::Accepted => RelationshipView::Accepted,
            ShortlistStatus::Declined => RelationshipView::None,
            ShortlistStatus::Pending if r.requester_id == viewer => RelationshipView::Requested,
            ShortlistStatus::Pending => RelationshipView::Incoming,
        },
    }
}

/// Whether both participants independently see the pair as accepted.
pub fn is_mutual(record: PairRecord) -> bool {
    view(record.requester_id, Some(record)) == RelationshipView::Accepted
        && view(record.addressee_id, Some(record)) == RelationshipView::Accepted
}
