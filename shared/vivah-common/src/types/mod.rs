//! Shared Types

pub mod shortlist;
pub mod user;

pub use shortlist::*;
pub use user::*;
