//! Style transcoding
//!
//! Converts lightweight emphasis markup into Unicode styled glyphs that
//! survive plain-text platforms: `**bold**` becomes Mathematical Bold
//! (U+1D400 block) and `_italic_` becomes Mathematical Italic (U+1D434
//! block). The mapping is reversible: [`normalize`] maps every styled glyph
//! back to its ASCII source so counting and diffing operate on equivalent
//! text regardless of styling.
//!
//! Mention tokens (`@handle` and `@{Name}` forms) are opaque to the italic
//! pass: their internal underscores are handle characters, not delimiters.
//! Rather than substituting placeholders, the text is split into plain and
//! opaque segments by position and only the plain segments are rewritten.
//!
//! All functions here are pure.

/// One segment of the mention-protection split
enum Segment {
    Plain(String),
    Opaque(String),
}

fn is_handle_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Map an ASCII letter or digit to its Mathematical Bold glyph
fn bold_char(c: char) -> char {
    let mapped = match c {
        'A'..='Z' => char::from_u32(0x1D400 + (c as u32 - 'A' as u32)),
        'a'..='z' => char::from_u32(0x1D41A + (c as u32 - 'a' as u32)),
        '0'..='9' => char::from_u32(0x1D7CE + (c as u32 - '0' as u32)),
        _ => None,
    };
    mapped.unwrap_or(c)
}

/// Map an ASCII letter to its Mathematical Italic glyph
///
/// U+1D455 (italic small h) is a reserved code point; Unicode carved that
/// glyph out long ago as U+210E PLANCK CONSTANT. Digits have no italic
/// forms and pass through unchanged.
fn italic_char(c: char) -> char {
    let mapped = match c {
        'h' => Some('\u{210E}'),
        'A'..='Z' => char::from_u32(0x1D434 + (c as u32 - 'A' as u32)),
        'a'..='z' => char::from_u32(0x1D44E + (c as u32 - 'a' as u32)),
        _ => None,
    };
    mapped.unwrap_or(c)
}

/// Map a styled glyph back to its plain ASCII source character
fn plain_char(c: char) -> char {
    let code = c as u32;
    let mapped = match code {
        0x1D400..=0x1D419 => char::from_u32('A' as u32 + (code - 0x1D400)),
        0x1D41A..=0x1D433 => char::from_u32('a' as u32 + (code - 0x1D41A)),
        0x1D7CE..=0x1D7D7 => char::from_u32('0' as u32 + (code - 0x1D7CE)),
        0x1D434..=0x1D44D => char::from_u32('A' as u32 + (code - 0x1D434)),
        0x1D44E..=0x1D467 => char::from_u32('a' as u32 + (code - 0x1D44E)),
        0x210E => Some('h'),
        _ => None,
    };
    mapped.unwrap_or(c)
}

/// Rewrite every well-formed `<delim>content<delim>` span
///
/// Content characters go through `map`; the delimiters are dropped. Spans
/// are shortest-match and non-nesting. An unterminated or empty span is
/// left as literal text.
fn rewrite_spans(text: &str, delim: &str, map: &dyn Fn(char) -> char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(delim) {
        let content_start = start + delim.len();
        match rest[content_start..].find(delim) {
            Some(0) => {
                // Empty span ("****" or "__"): literal
                out.push_str(&rest[..content_start]);
                rest = &rest[content_start..];
            }
            Some(len) => {
                out.push_str(&rest[..start]);
                out.extend(rest[content_start..content_start + len].chars().map(map));
                rest = &rest[content_start + len + delim.len()..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

/// Split text into plain and opaque (mention) segments by position
///
/// Opaque segments are `@` followed by handle-like characters, and the
/// unified `@{Name}` markup. An unterminated `@{` is not a mention and
/// stays plain.
fn split_mentions(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut plain = String::new();
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '@' {
            plain.push(c);
            continue;
        }

        match chars.peek() {
            Some(&(_, '{')) => {
                if let Some(close) = text[i..].find('}') {
                    if !plain.is_empty() {
                        segments.push(Segment::Plain(std::mem::take(&mut plain)));
                    }
                    let end = i + close + 1;
                    segments.push(Segment::Opaque(text[i..end].to_string()));
                    while chars.peek().is_some_and(|&(j, _)| j < end) {
                        chars.next();
                    }
                } else {
                    plain.push(c);
                }
            }
            Some(&(_, next)) if is_handle_char(next) => {
                if !plain.is_empty() {
                    segments.push(Segment::Plain(std::mem::take(&mut plain)));
                }
                let mut token = String::from('@');
                while let Some(&(_, h)) = chars.peek() {
                    if is_handle_char(h) {
                        token.push(h);
                        chars.next();
                    } else {
                        break;
                    }
                }
                segments.push(Segment::Opaque(token));
            }
            _ => plain.push(c),
        }
    }

    if !plain.is_empty() {
        segments.push(Segment::Plain(plain));
    }
    segments
}

/// Apply `f` to the non-mention parts of `text` and splice the result
fn with_mentions_protected(text: &str, f: impl Fn(&str) -> String) -> String {
    split_mentions(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Plain(s) => f(&s),
            Segment::Opaque(s) => s,
        })
        .collect()
}

/// Replace emphasis markup with styled glyphs
///
/// `**text**` becomes Mathematical Bold and `_text_` Mathematical Italic,
/// letter by letter; characters with no styled variant pass through.
/// Mention tokens are never treated as italic delimiters. Unterminated
/// markup stays literal.
pub fn apply_style(text: &str) -> String {
    let bolded = rewrite_spans(text, "**", &bold_char);
    with_mentions_protected(&bolded, |plain| rewrite_spans(plain, "_", &italic_char))
}

/// Map every styled glyph back to its plain source character
///
/// Left inverse of the glyph substitution in [`apply_style`]: characters
/// with no reverse mapping are left unchanged.
pub fn normalize(text: &str) -> String {
    text.chars().map(plain_char).collect()
}

/// Normalize, then drop well-formed emphasis delimiters
///
/// The result is the content an author actually wrote, so a styled and an
/// unstyled rendering of equivalent text reduce to the same string.
fn content_of(text: &str) -> String {
    let normalized = normalize(text);
    let without_bold = rewrite_spans(&normalized, "**", &|c| c);
    with_mentions_protected(&without_bold, |plain| rewrite_spans(plain, "_", &|c| c))
}

/// Count characters of the underlying content, styling-invariant
pub fn count_characters(text: &str) -> usize {
    content_of(text).chars().count()
}

/// Count whitespace-separated words of the underlying content
pub fn count_words(text: &str) -> usize {
    content_of(text).split_whitespace().count()
}
