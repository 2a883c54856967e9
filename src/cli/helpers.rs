//! Shared helper functions for CLI output

/// Truncate a string to max_len, adding "..." if truncated
///
/// Keeps table columns readable when a report carries a long
/// expected/actual result description.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    // Free-text fields can hold any UTF-8; cut at the last char
    // boundary within budget, never mid-character.
    let budget = max_len.saturating_sub(3);
    let cut = (0..=budget)
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0);
    format!("{}...", &s[..cut])
}
