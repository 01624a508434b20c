//! Boundary-surface tests driving [`TextService`] the way an embedding
//! caller would, scenario by scenario.

use libthreadcast::service::TextService;
use libthreadcast::{InMemoryDirectory, LengthPolicy, PersonDirectory, PersonRecord, Platform};

fn service() -> TextService {
    TextService::new(LengthPolicy::default())
}

fn directory() -> InMemoryDirectory {
    let mut john = PersonRecord::new("John Doe", "John Doe");
    john.twitter = Some("johndoe".to_string());
    john.bluesky = Some("john.bsky.social".to_string());

    let mut dir = InMemoryDirectory::new();
    dir.create(john).unwrap();
    dir
}

#[test]
fn test_styling_survives_counting() {
    // Styled glyphs count exactly one unit per source character, so a
    // styled post and its plain twin have the same length standing.
    let svc = service();
    let plain = svc
        .count_for_platform("Launch day is finally here", Platform::Twitter, false)
        .unwrap();
    let styled_text = svc
        .format_text("**Launch** day is _finally_ here")
        .unwrap()
        .formatted;
    let styled = svc
        .count_for_platform(&styled_text, Platform::Twitter, false)
        .unwrap();

    assert_eq!(plain.count, styled.count);
}

#[test]
fn test_chunking_respects_grapheme_platforms() {
    let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}\u{200D}\u{1F466}";
    let text = format!("{} party announcement {}", family.repeat(150), family.repeat(150));

    let svc = service();
    let outcome = svc
        .chunk_for_platform(&text, Platform::Bluesky, false)
        .unwrap();

    let policy = LengthPolicy::default();
    for chunk in &outcome.chunks {
        assert!(policy.count(chunk, Platform::Bluesky) <= 300);
        // Never split inside a joined cluster
        assert!(!chunk.starts_with('\u{200D}'));
        assert!(!chunk.ends_with('\u{200D}'));
    }
}

#[test]
fn test_tags_then_preview_agree() {
    let svc = service();
    let dir = directory();
    let input = "Big thanks to @{John Doe} for the review!";

    let tags = svc.resolve_tags(input, Platform::Twitter, &dir).unwrap();
    let preview = svc
        .preview_for_platform(input, Platform::Twitter, false, &dir)
        .unwrap();

    // No markup in the input, so preview is exactly the tag resolution
    assert_eq!(preview.processed, tags.processed);
    assert_eq!(tags.processed, "Big thanks to @johndoe for the review!");
}

#[test]
fn test_preview_json_shape_for_scripting() {
    let svc = service();
    let dir = directory();
    let outcome = svc
        .preview_for_platform("hello @{John Doe}", Platform::Bluesky, false, &dir)
        .unwrap();

    let json = serde_json::to_value(&outcome).unwrap();
    assert!(json["count"].is_u64());
    assert_eq!(json["limit"], 300);
    assert!(json["remaining"].is_i64());
    assert_eq!(json["exceeds_limit"], false);
    assert_eq!(json["needs_chunking"], false);
    assert_eq!(json["processed"], "hello @john.bsky.social");
}

#[test]
fn test_mastodon_instance_limit_flows_through() {
    let svc = TextService::new(LengthPolicy::with_mastodon_limit(5000));
    let text = "a".repeat(600);

    let outcome = svc
        .count_for_platform(&text, Platform::Mastodon, false)
        .unwrap();
    assert_eq!(outcome.limit, 5000);
    assert!(!outcome.exceeds_limit);

    let chunks = svc
        .chunk_for_platform(&text, Platform::Mastodon, false)
        .unwrap();
    assert_eq!(chunks.total_chunks, 1);
}

#[test]
fn test_whitespace_only_rejected_with_exit_code() {
    let err = service().format_text(" \n\t ").unwrap_err();
    assert_eq!(err.exit_code(), 3);
    assert!(err.to_string().contains("empty"));
}
