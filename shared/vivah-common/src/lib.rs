//! `Vivah` Common Library
//!
//! Shared wire types used by the server and its clients.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
