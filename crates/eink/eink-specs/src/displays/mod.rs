//! Pre-configured display specifications
//!
//! Templates for the Pimoroni Inky boards.

pub mod pimoroni;

pub use pimoroni::*;

use crate::DisplaySpec;

/// Every built-in template
pub const ALL: &[DisplaySpec] = &[INKY_PHAT, INKY_PHAT_SSD1608, INKY_WHAT];

/// Look up a template by its short configuration name
///
/// Accepted names are `phat`, `phat-ssd1608` and `what`.
pub fn by_name(name: &str) -> Option<DisplaySpec> {
    [
        ("phat", INKY_PHAT),
        ("phat-ssd1608", INKY_PHAT_SSD1608),
        ("what", INKY_WHAT),
    ]
    .into_iter()
    .find(|(short, _)| short.eq_ignore_ascii_case(name))
    .map(|(_, spec)| spec)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("pHAT").map(|s| s.width), Some(212));
        assert_eq!(by_name("what").map(|s| s.height), Some(300));
        assert!(by_name("impression").is_none());
        assert_eq!(by_name("PHAT-SSD1608").map(|s| s.width), Some(250));
        assert!(by_name("phat-").is_none());
    }

    #[test]
    fn test_all_templates_have_physical_size() {
        for spec in ALL {
            assert!(spec.diagonal_inches > 0.0, "{} has no diagonal", spec.name);
            assert!(spec.pixel_count() > 0);
        }
    }
}
