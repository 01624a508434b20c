//! Length accounting
//!
//! `LengthPolicy` is the single source of truth for platform limits and for
//! how text length is counted against them. Most platforms count Unicode
//! code points; Bluesky's backend counts extended grapheme clusters, so a
//! combined emoji is one unit there but several code points elsewhere.
//! Counting code points against a grapheme limit under-counts and can
//! silently produce over-limit posts, which is why the mode lives in the
//! platform table and not in call sites.

use unicode_segmentation::UnicodeSegmentation;

use crate::platform::{CountMode, Platform};

/// Twitter's limit with the premium subscription
const TWITTER_PREMIUM_LIMIT: usize = 25_000;

/// Per-platform limits and counting
#[derive(Debug, Clone)]
pub struct LengthPolicy {
    /// Instance-supplied Mastodon limit; the flagship default is 500
    pub mastodon_limit: usize,
}

impl Default for LengthPolicy {
    fn default() -> Self {
        Self {
            mastodon_limit: Platform::Mastodon.default_limit(),
        }
    }
}

impl LengthPolicy {
    /// Create a policy with an instance-specific Mastodon limit
    pub fn with_mastodon_limit(mastodon_limit: usize) -> Self {
        Self { mastodon_limit }
    }

    /// Maximum post length for a platform, in its own counting units
    ///
    /// # Arguments
    ///
    /// * `platform` - Target platform
    /// * `premium` - Externally supplied premium flag (only Twitter cares)
    pub fn limit(&self, platform: Platform, premium: bool) -> usize {
        match platform {
            Platform::Twitter if premium => TWITTER_PREMIUM_LIMIT,
            Platform::Mastodon => self.mastodon_limit,
            _ => platform.default_limit(),
        }
    }

    /// Count `text` in the platform's units
    pub fn count(&self, text: &str, platform: Platform) -> usize {
        match platform.count_mode() {
            CountMode::CodePoints => text.chars().count(),
            CountMode::Graphemes => text.graphemes(true).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let policy = LengthPolicy::default();
        assert_eq!(policy.limit(Platform::LinkedIn, false), 3000);
        assert_eq!(policy.limit(Platform::Twitter, false), 280);
        assert_eq!(policy.limit(Platform::Bluesky, false), 300);
        assert_eq!(policy.limit(Platform::Mastodon, false), 500);
    }

    #[test]
    fn test_twitter_premium_limit() {
        let policy = LengthPolicy::default();
        assert_eq!(policy.limit(Platform::Twitter, true), 25_000);
        // Premium flag is ignored everywhere else
        assert_eq!(policy.limit(Platform::Bluesky, true), 300);
        assert_eq!(policy.limit(Platform::Mastodon, true), 500);
    }

    #[test]
    fn test_mastodon_instance_limit() {
        let policy = LengthPolicy::with_mastodon_limit(5000);
        assert_eq!(policy.limit(Platform::Mastodon, false), 5000);
        // Other platforms are untouched by the instance limit
        assert_eq!(policy.limit(Platform::Twitter, false), 280);
    }

    #[test]
    fn test_count_ascii() {
        let policy = LengthPolicy::default();
        assert_eq!(policy.count("hello", Platform::Twitter), 5);
        assert_eq!(policy.count("hello", Platform::Bluesky), 5);
        assert_eq!(policy.count("", Platform::Twitter), 0);
    }

    #[test]
    fn test_count_combined_emoji_differs_by_mode() {
        // Family emoji: four code points joined by three ZWJs, one grapheme
        let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}\u{200D}\u{1F466}";
        let policy = LengthPolicy::default();

        assert_eq!(policy.count(family, Platform::Bluesky), 1);
        assert_eq!(policy.count(family, Platform::Twitter), 7);
    }

    #[test]
    fn test_count_flag_emoji() {
        // Regional indicator pair: two code points, one grapheme
        let flag = "\u{1F1EF}\u{1F1F5}";
        let policy = LengthPolicy::default();

        assert_eq!(policy.count(flag, Platform::Bluesky), 1);
        assert_eq!(policy.count(flag, Platform::Mastodon), 2);
    }

    #[test]
    fn test_count_combining_accent() {
        // 'e' + combining acute: two code points, one grapheme
        let accented = "e\u{0301}";
        let policy = LengthPolicy::default();

        assert_eq!(policy.count(accented, Platform::Bluesky), 1);
        assert_eq!(policy.count(accented, Platform::Twitter), 2);
    }
}
