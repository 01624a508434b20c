//! Unified mention resolution
//!
//! Authors write platform-agnostic mentions as `@{Name}`; this module
//! rewrites them into whatever the target platform can actually render.
//! The asymmetry between platforms is deliberate: on platforms that
//! auto-link `@name` tokens, emitting one for an identity we could not
//! resolve would render as a broken mention, so the `@` is dropped there.
//! LinkedIn mentions require manual action anyway, so the `@` survives as
//! a cue to the author.

use serde::Serialize;

use crate::directory::PersonDirectory;
use crate::platform::Platform;

/// One `@{Name}` occurrence and what it resolved to
#[derive(Debug, Clone, Serialize)]
pub struct TagMatch {
    /// The original markup, e.g. `@{Jane Doe}`
    pub original: String,
    /// The record name it resolved to, or the literal name if unresolved
    pub person_name: String,
    /// Whether a directory record was found
    pub resolved: bool,
}

/// Result of resolving every unified tag in a text
#[derive(Debug, Clone)]
pub struct ResolvedTags {
    pub text: String,
    pub matches: Vec<TagMatch>,
}

/// Strip at most one leading `@` so stored handles may carry it or not
fn bare_handle(handle: &str) -> &str {
    handle.strip_prefix('@').unwrap_or(handle)
}

/// Rewrite every `@{Name}` for the target platform
///
/// Name may contain any character except the closing brace. A `@{` with no
/// closing brace is malformed markup and stays literal. Lookup is
/// case-insensitive against every record's `name`, then `display_name`.
pub fn resolve_tags(
    text: &str,
    platform: Platform,
    directory: &dyn PersonDirectory,
) -> ResolvedTags {
    let mut out = String::with_capacity(text.len());
    let mut matches = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("@{") {
        let Some(close) = rest[start + 2..].find('}') else {
            // Malformed: no closing brace anywhere ahead
            break;
        };
        let name = &rest[start + 2..start + 2 + close];
        let original = &rest[start..start + 2 + close + 1];

        out.push_str(&rest[..start]);
        match directory.find_by_name(name) {
            Some(record) => {
                match record.handle_for(platform) {
                    Some(handle) => {
                        out.push('@');
                        out.push_str(bare_handle(handle));
                    }
                    None => {
                        if !platform.auto_links_mentions() {
                            out.push('@');
                        }
                        out.push_str(&record.display_name);
                    }
                }
                matches.push(TagMatch {
                    original: original.to_string(),
                    person_name: record.name,
                    resolved: true,
                });
            }
            None => {
                if !platform.auto_links_mentions() {
                    out.push('@');
                }
                out.push_str(name);
                matches.push(TagMatch {
                    original: original.to_string(),
                    person_name: name.to_string(),
                    resolved: false,
                });
            }
        }
        rest = &rest[start + 2 + close + 1..];
    }

    out.push_str(rest);
    ResolvedTags { text: out, matches }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{InMemoryDirectory, PersonRecord};

    fn directory_with_john() -> InMemoryDirectory {
        let mut record = PersonRecord::new("John Doe", "John Doe");
        record.twitter = Some("johndoe".to_string());
        record.bluesky = Some("@john.example.com".to_string());
        let mut dir = InMemoryDirectory::new();
        dir.create(record).unwrap();
        dir
    }

    #[test]
    fn test_scenario_b_resolves_handle() {
        let dir = directory_with_john();
        let result = resolve_tags("Thanks @{John Doe}!", Platform::Twitter, &dir);
        assert_eq!(result.text, "Thanks @johndoe!");
        assert_eq!(result.matches.len(), 1);
        assert!(result.matches[0].resolved);
        assert_eq!(result.matches[0].original, "@{John Doe}");
        assert_eq!(result.matches[0].person_name, "John Doe");
    }

    #[test]
    fn test_stored_at_prefix_is_stripped_before_re_adding() {
        // The bluesky handle is stored with a leading @ already
        let dir = directory_with_john();
        let result = resolve_tags("cc @{John Doe}", Platform::Bluesky, &dir);
        assert_eq!(result.text, "cc @john.example.com");
    }

    #[test]
    fn test_scenario_c_unknown_on_auto_linking_platform() {
        let dir = InMemoryDirectory::new();
        let result = resolve_tags("Thanks @{Unknown}!", Platform::Twitter, &dir);
        // No @ prefix: an unresolvable @name would render as a broken mention
        assert_eq!(result.text, "Thanks Unknown!");
        assert!(!result.matches[0].resolved);
    }

    #[test]
    fn test_scenario_c_unknown_on_manual_platform() {
        let dir = InMemoryDirectory::new();
        let result = resolve_tags("Thanks @{Unknown}!", Platform::LinkedIn, &dir);
        assert_eq!(result.text, "Thanks @Unknown!");
    }

    #[test]
    fn test_found_without_handle_uses_display_name() {
        let mut dir = InMemoryDirectory::new();
        dir.create(PersonRecord::new("Jane Doe", "Jane")).unwrap();

        let auto = resolve_tags("hi @{Jane Doe}", Platform::Mastodon, &dir);
        assert_eq!(auto.text, "hi Jane");

        let manual = resolve_tags("hi @{Jane Doe}", Platform::LinkedIn, &dir);
        assert_eq!(manual.text, "hi @Jane");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let dir = directory_with_john();
        let result = resolve_tags("hi @{john doe}", Platform::Twitter, &dir);
        assert_eq!(result.text, "hi @johndoe");
    }

    #[test]
    fn test_name_with_spaces_and_punctuation() {
        let mut dir = InMemoryDirectory::new();
        let mut record = PersonRecord::new("Dr. Jane O'Brien-Smith", "Jane");
        record.twitter = Some("jane".to_string());
        dir.create(record).unwrap();

        let result = resolve_tags("ping @{Dr. Jane O'Brien-Smith}", Platform::Twitter, &dir);
        assert_eq!(result.text, "ping @jane");
    }

    #[test]
    fn test_malformed_brace_stays_literal() {
        let dir = directory_with_john();
        let result = resolve_tags("broken @{John Doe", Platform::Twitter, &dir);
        assert_eq!(result.text, "broken @{John Doe");
        assert!(result.matches.is_empty());
    }

    #[test]
    fn test_multiple_tags() {
        let mut dir = directory_with_john();
        let mut jane = PersonRecord::new("Jane", "Jane");
        jane.twitter = Some("janed".to_string());
        dir.create(jane).unwrap();

        let result = resolve_tags("@{John Doe} and @{Jane} and @{Nobody}", Platform::Twitter, &dir);
        assert_eq!(result.text, "@johndoe and @janed and Nobody");
        assert_eq!(result.matches.len(), 3);
    }

    #[test]
    fn test_text_without_tags_is_unchanged() {
        let dir = InMemoryDirectory::new();
        let result = resolve_tags("no tags here, just an email a@b.com", Platform::Twitter, &dir);
        assert_eq!(result.text, "no tags here, just an email a@b.com");
        assert!(result.matches.is_empty());
    }
}
