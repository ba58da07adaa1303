//! State management module
//!
//! This module handles screen navigation and the shared application context

pub mod context;
pub mod navigation;
pub mod screens;

// Re-export commonly used state components
pub use context::AppContext;
pub use navigation::{NavigationEngine, NavOutcome, RenderedScreen, Transition};
pub use screens::{ScreenDescriptor, SCREENS};
