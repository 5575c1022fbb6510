//! Data access layer

pub mod user;
pub mod vote;

pub use user::UserRepository;
pub use vote::VoteRepository;
