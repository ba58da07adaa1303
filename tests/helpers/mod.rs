//! Test helpers module
//!
//! This module provides utilities and helpers for testing the UI bot.
//! It includes a recording messenger, fake sinks and payment providers, and
//! a test context wiring them into an in-memory database.

#![allow(dead_code)]

pub mod messenger_mock;
pub mod test_context;
pub mod test_data;

pub use messenger_mock::*;
pub use test_context::*;
pub use test_data::*;
