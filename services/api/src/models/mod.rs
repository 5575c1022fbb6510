//! API service models

pub mod preferences;
pub mod user;
pub mod vote;
