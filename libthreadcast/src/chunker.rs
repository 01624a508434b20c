//! Platform-aware chunking
//!
//! Splits over-limit text into an ordered sequence of platform-legal
//! pieces. Break points are chosen by repeatedly taking the longest prefix
//! that fits and then backing up to the most natural break available,
//! in priority order:
//!
//! 1. sentence-ending punctuation followed by a space (accepted at >= 60%
//!    of the limit);
//! 2. a blank-line paragraph break (>= 40%);
//! 3. a single line break (>= 60%);
//! 4. a word boundary (>= 70%);
//! 5. a hard cut exactly at the limit.
//!
//! The minimum fractions keep a convenient break from producing
//! pathologically short chunks. All positions are measured in the
//! platform's counting units, which is what makes this correct for
//! grapheme-counting platforms where a unit may be several bytes of
//! several code points.

use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

use crate::length::LengthPolicy;
use crate::platform::{CountMode, Platform};

/// Appended when a chunk had to be forcibly truncated
pub const TRUNCATION_MARK: char = '…';

const SENTENCE_MIN_PCT: usize = 60;
const PARAGRAPH_MIN_PCT: usize = 40;
const NEWLINE_MIN_PCT: usize = 60;
const WORD_MIN_PCT: usize = 70;

/// Byte ranges of the first `max_units` counting units of `text`
fn unit_ranges(text: &str, mode: CountMode, max_units: usize) -> Vec<(usize, usize)> {
    match mode {
        CountMode::CodePoints => text
            .char_indices()
            .take(max_units)
            .map(|(i, c)| (i, i + c.len_utf8()))
            .collect(),
        CountMode::Graphemes => text
            .grapheme_indices(true)
            .take(max_units)
            .map(|(i, g)| (i, i + g.len()))
            .collect(),
    }
}

fn meets(position_units: usize, limit: usize, pct: usize) -> bool {
    position_units * 100 >= limit * pct
}

/// Pick the cut byte offset inside the window of `limit` units
///
/// `units` are the byte ranges of the window's units within `rest`;
/// `window_end` is the byte offset one past the last of them. Candidates
/// at unit index 0 are never taken, so the cut always makes progress.
fn choose_cut(rest: &str, units: &[(usize, usize)], window_end: usize, limit: usize) -> usize {
    let unit = |i: usize| &rest[units[i].0..units[i].1];
    // First char of the unit after `i`, looking past the window edge
    let next_char = |i: usize| -> Option<char> {
        if i + 1 < units.len() {
            unit(i + 1).chars().next()
        } else {
            rest[window_end..].chars().next()
        }
    };

    // Sentence end: the punctuation stays in the chunk, so the emitted
    // chunk holds i + 1 units.
    for i in (0..units.len()).rev() {
        if matches!(unit(i), "." | "!" | "?")
            && next_char(i).is_some_and(|c| c.is_whitespace())
            && meets(i + 1, limit, SENTENCE_MIN_PCT)
        {
            return units[i].1;
        }
    }

    // Paragraph break
    for i in (1..units.len()).rev() {
        if unit(i) == "\n" && next_char(i) == Some('\n') && meets(i, limit, PARAGRAPH_MIN_PCT) {
            return units[i].0;
        }
    }

    // Single line break
    for i in (1..units.len()).rev() {
        if unit(i) == "\n" && meets(i, limit, NEWLINE_MIN_PCT) {
            return units[i].0;
        }
    }

    // Word boundary
    for i in (1..units.len()).rev() {
        if unit(i).chars().next().is_some_and(|c| c.is_whitespace())
            && meets(i, limit, WORD_MIN_PCT)
        {
            return units[i].0;
        }
    }

    // Hard cut at the limit; also how a single over-limit word is split
    window_end
}

/// Last-resort integrity guard: a produced chunk must never exceed the
/// limit, whatever the counting mode did
fn enforce_limit(policy: &LengthPolicy, piece: &str, platform: Platform, limit: usize) -> String {
    let counted = policy.count(piece, platform);
    if counted <= limit {
        return piece.to_string();
    }

    warn!(
        "chunk counts {} units against a limit of {} on {}; forcing truncation",
        counted, limit, platform
    );
    let keep = unit_ranges(piece, platform.count_mode(), limit.saturating_sub(1));
    let end = keep.last().map(|&(_, e)| e).unwrap_or(0);
    let mut truncated = piece[..end].to_string();
    truncated.push(TRUNCATION_MARK);
    truncated
}

/// Split `text` into platform-legal chunks
///
/// Text that already fits is returned as a single element, unchanged.
/// Every emitted chunk satisfies `policy.count(chunk, platform) <= limit`
/// and is non-empty; whitespace around each cut is trimmed.
pub fn chunk(policy: &LengthPolicy, text: &str, platform: Platform, premium: bool) -> Vec<String> {
    let limit = policy.limit(platform, premium);
    if policy.count(text, platform) <= limit {
        return vec![text.to_string()];
    }

    let mode = platform.count_mode();
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        if policy.count(rest, platform) <= limit {
            chunks.push(rest.to_string());
            break;
        }

        let units = unit_ranges(rest, mode, limit);
        let window_end = units.last().map(|&(_, e)| e).unwrap_or(rest.len());
        let cut = choose_cut(rest, &units, window_end, limit);

        let piece = rest[..cut].trim_end();
        if !piece.is_empty() {
            chunks.push(enforce_limit(policy, piece, platform, limit));
        }
        rest = rest[cut..].trim_start();
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> LengthPolicy {
        LengthPolicy::default()
    }

    fn assert_all_within(chunks: &[String], platform: Platform, limit: usize) {
        let p = policy();
        for c in chunks {
            assert!(
                p.count(c, platform) <= limit,
                "chunk of {} units exceeds {}: {:?}",
                p.count(c, platform),
                limit,
                c
            );
            assert!(!c.is_empty());
        }
    }

    #[test]
    fn test_short_text_single_chunk_unchanged() {
        let chunks = chunk(&policy(), "  hello world  ", Platform::Twitter, false);
        assert_eq!(chunks, vec!["  hello world  "]);
    }

    #[test]
    fn test_scenario_d_sentence_breaks() {
        // ~500 characters of sentences against the 280 limit
        let sentence = "The quick brown fox jumps over the lazy dog and keeps going. ";
        let text = sentence.repeat(8).trim_end().to_string();
        assert!(text.chars().count() >= 490);

        let chunks = chunk(&policy(), &text, Platform::Twitter, false);
        assert!(chunks.len() >= 2);
        assert_all_within(&chunks, Platform::Twitter, 280);
        // Broke at a sentence end, not mid-word
        assert!(chunks[0].ends_with('.'));
    }

    #[test]
    fn test_word_boundary_break() {
        // No sentence punctuation or newlines anywhere
        let word = "alpha ";
        let text = word.repeat(100); // 600 chars
        let chunks = chunk(&policy(), &text, Platform::Twitter, false);

        assert!(chunks.len() >= 2);
        assert_all_within(&chunks, Platform::Twitter, 280);
        for c in &chunks {
            // Every chunk is made of whole words
            assert!(c.split_whitespace().all(|w| w == "alpha"));
        }
    }

    #[test]
    fn test_paragraph_break_preferred_over_word() {
        // A paragraph break at ~45% of the limit beats a word boundary
        // near the end because paragraphs are checked first at >= 40%.
        let first = "a".repeat(126);
        let rest = "word ".repeat(60);
        let text = format!("{}\n\n{}", first, rest);
        let chunks = chunk(&policy(), &text, Platform::Twitter, false);

        assert_eq!(chunks[0], first);
        assert_all_within(&chunks, Platform::Twitter, 280);
    }

    #[test]
    fn test_single_long_word_hard_split() {
        let text = "a".repeat(600);
        let chunks = chunk(&policy(), &text, Platform::Twitter, false);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 280);
        assert_eq!(chunks[1].chars().count(), 280);
        assert_eq!(chunks[2].chars().count(), 40);
    }

    #[test]
    fn test_no_empty_chunks_and_whitespace_trimmed() {
        let text = format!("{}    \n\n   {}", "b".repeat(270), "c".repeat(100));
        let chunks = chunk(&policy(), &text, Platform::Twitter, false);

        for c in &chunks {
            assert!(!c.is_empty());
            assert_eq!(c.trim_end(), c);
        }
    }

    #[test]
    fn test_content_preserved_across_chunking() {
        let sentence = "Pack my box with five dozen liquor jugs. ";
        let text = sentence.repeat(20);
        let chunks = chunk(&policy(), &text, Platform::Twitter, false);

        let squash = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(squash(&chunks.join(" ")), squash(&text));
    }

    #[test]
    fn test_grapheme_counting_respects_limit() {
        // 400 family emoji: 400 graphemes but 2800 code points
        let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}\u{200D}\u{1F466}";
        let text = family.repeat(400);
        let chunks = chunk(&policy(), &text, Platform::Bluesky, false);

        assert_all_within(&chunks, Platform::Bluesky, 300);
        assert_eq!(chunks.len(), 2);
        assert_eq!(policy().count(&chunks[0], Platform::Bluesky), 300);
        // No cluster was split down the middle
        let p = policy();
        let total: usize = chunks.iter().map(|c| p.count(c, Platform::Bluesky)).sum();
        assert_eq!(total, 400);
    }

    #[test]
    fn test_premium_limit_changes_chunking() {
        let text = "word ".repeat(100); // 500 chars
        let standard = chunk(&policy(), &text, Platform::Twitter, false);
        let premium = chunk(&policy(), &text, Platform::Twitter, true);

        assert!(standard.len() >= 2);
        assert_eq!(premium.len(), 1);
    }

    #[test]
    fn test_mastodon_instance_limit() {
        let p = LengthPolicy::with_mastodon_limit(100);
        let text = "word ".repeat(50); // 250 chars
        let chunks = chunk(&p, &text, Platform::Mastodon, false);

        assert!(chunks.len() >= 3);
        for c in &chunks {
            assert!(p.count(c, Platform::Mastodon) <= 100);
        }
    }

    #[test]
    fn test_enforce_limit_truncates_with_marker() {
        let p = policy();
        let over = "x".repeat(300);
        let fixed = enforce_limit(&p, &over, Platform::Twitter, 280);

        assert_eq!(p.count(&fixed, Platform::Twitter), 280);
        assert!(fixed.ends_with(TRUNCATION_MARK));
    }

    #[test]
    fn test_chunk_order_is_stable() {
        let text = (0..40)
            .map(|i| format!("Sentence number {} is here. ", i))
            .collect::<String>();
        let chunks = chunk(&policy(), &text, Platform::Twitter, false);

        // Each numbered sentence appears in order across the sequence
        let joined = chunks.join(" ");
        let mut last = 0;
        for i in 0..40 {
            let pos = joined.find(&format!("number {} ", i)).unwrap();
            assert!(pos >= last);
            last = pos;
        }
    }
}
