//! Common library for the AI Crypto Advisor backend
//!
//! This crate provides shared infrastructure used by the API service:
//! PostgreSQL connection pooling and database error handling.

pub mod database;
pub mod error;
