//! `Vivah` Server
//!
//! Matrimony platform backend: accounts, step-wise profile onboarding,
//! gender-based discovery, likes, mutual shortlisting and admin moderation.

pub mod admin;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod discovery;
pub mod matchmaking;
pub mod profile;
pub mod uploads;
pub mod util;
