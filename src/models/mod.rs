//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod credentials;
pub mod payment;
pub mod state;

// Re-export commonly used models
pub use user::{UserProfile, ProfileUpdate, Language, Currency, Plan, MessageRef};
pub use credentials::{CredentialRecord, EncryptedLogin};
pub use payment::{CryptoPayment, PaymentStatus};
pub use state::{StateEntry, NavStack, CurrentScreen, PendingPayment, PendingPaymentInfo, AdminFlow, AdminAction, PoFlow, NAV_STACK_LIMIT};
