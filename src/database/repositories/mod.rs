//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;
pub mod credentials;
pub mod state;

// Re-export repositories
pub use user::UserRepository;
pub use credentials::CredentialRepository;
pub use state::StateRepository;
