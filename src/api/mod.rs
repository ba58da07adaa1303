//! Credential relay HTTP API
//!
//! Lets internal services fetch a user's encrypted broker credentials. The
//! relay hands out ciphertext only; decryption happens on the consumer side.

pub mod handlers;
pub mod server;

pub use handlers::{ApiError, CredentialsRequest, CredentialsResponse};
pub use server::{router, serve, ApiState};
