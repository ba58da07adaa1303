//! Helper functions and utilities
//!
//! Small parsing and formatting helpers shared by the handlers.

/// Parse a target user id from free text or a command argument
///
/// Accepts a bare id or a `tg://user?id=` mention. Zero is not a valid id.
pub fn parse_user_id(text: &str) -> Option<i64> {
    let text = text.trim();
    let id = if let Some(id_str) = text.strip_prefix("tg://user?id=") {
        id_str.parse::<i64>().ok()
    } else {
        text.parse::<i64>().ok()
    };

    id.filter(|id| *id != 0)
}

/// Split command arguments on whitespace
pub fn split_args(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Check that a string's length in characters is within bounds (inclusive)
pub fn char_len_between(text: &str, min: usize, max: usize) -> bool {
    let len = text.chars().count();
    len >= min && len <= max
}
