//! Reusable field filters
//!
//! These filters transform raw string input before it is parsed

/// Filter: trim surrounding whitespace
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Filter: convert string to lowercase
pub fn lowercase(value: &str) -> String {
    value.to_lowercase()
}

/// Filter: normalize a keyword (status, priority, flags)
///
/// Trims, lowercases and maps spaces and hyphens to underscores so that
/// `"In Progress"`, `"in-progress"` and `"in_progress"` all match.
pub fn keyword(value: &str) -> String {
    lowercase(value.trim())
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Filter: round number to specified decimal places
pub fn round_decimals(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    // === trim() ===

    #[test]
    fn test_trim_removes_whitespace() {
        assert_eq!(trim("  hello  "), "hello");
    }

    #[test]
    fn test_trim_empty_string() {
        assert_eq!(trim("   "), "");
    }

    // === lowercase() ===

    #[test]
    fn test_lowercase_converts_string() {
        assert_eq!(lowercase("Hello@WORLD.com"), "hello@world.com");
    }

    // === keyword() ===

    #[test]
    fn test_keyword_normalizes_separators() {
        assert_eq!(keyword(" In Progress "), "in_progress");
        assert_eq!(keyword("on-hold"), "on_hold");
        assert_eq!(keyword("DRAFT"), "draft");
    }

    // === round_decimals() ===

    #[test]
    fn test_round_decimals_two_places() {
        assert_eq!(round_decimals(3.14159, 2), 3.14);
    }

    #[test]
    fn test_round_decimals_rounds_up() {
        assert_eq!(round_decimals(2.675_1, 2), 2.68);
    }

    #[test]
    fn test_round_decimals_negative_number() {
        assert_eq!(round_decimals(-3.456, 1), -3.5);
    }
}
