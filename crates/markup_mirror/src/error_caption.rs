// Copyright 2026 The Matrix.org Foundation C.I.C.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Caret captions for parse failures.
//!
//! Markup parsers report the *byte* offset of the character they choked
//! on. Shown to a human that number is useless twice over: it counts bytes
//! rather than characters, and it points into a string the user can't see
//! the shape of. This module re-derives the codepoint offset and appends
//! an excerpt of the offending line with a caret under the bad character.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::markup::markdown;

/// Trailing numeric offset in a parser diagnostic, e.g.
/// `"… starting at byte offset 6"`.
static OFFSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"offset\s+(\d+)").expect("static regex"));

/// At most this many characters of context before the caret.
const CONTEXT_CHARS: usize = 25;

/// Characters shown after the offending one.
const TRAILING_CHARS: usize = 5;

/// Append a caret caption to `diagnostic`, pointing into `bad_text`.
///
/// `bad_text` must be the string that was actually fed to the parser —
/// the diagnostic's offset is relative to it, not to whatever the message
/// originally looked like. When the diagnostic carries no parsable offset
/// the diagnostic is returned unchanged; this path never fails.
pub fn explain_error(bad_text: &str, diagnostic: &str) -> String {
    match caption(bad_text, diagnostic) {
        Some(captioned) => captioned,
        None => {
            tracing::warn!(diagnostic, "no parsable offset in diagnostic");
            diagnostic.to_string()
        }
    }
}

fn caption(bad_text: &str, diagnostic: &str) -> Option<String> {
    let captures = OFFSET.captures_iter(diagnostic).last()?;
    let byte_offset: usize = captures[1].parse().ok()?;
    let byte_offset = byte_offset.min(bad_text.len());

    // The offset counts bytes; the caret must count characters. Decode
    // only the prefix and measure it. An offset inside a multi-byte
    // character resolves to the last whole character before it.
    let bytes = &bad_text.as_bytes()[..byte_offset];
    let offset = match std::str::from_utf8(bytes) {
        Ok(prefix) => prefix.chars().count(),
        Err(partial) => match std::str::from_utf8(&bytes[..partial.valid_up_to()]) {
            Ok(prefix) => prefix.chars().count(),
            Err(_) => return None,
        },
    };

    let context = CONTEXT_CHARS.min(offset);
    let start = offset - context;

    let flat: String = bad_text
        .chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    let excerpt: String = flat
        .chars()
        .skip(start)
        .take(context + TRAILING_CHARS)
        .collect();
    let pointer = format!("{}^", " ".repeat(context));

    Some(format!(
        "{diagnostic}, (chars offset {offset}):\n\n{}\n{}",
        markdown::pre(&excerpt, None),
        markdown::code_inline(&pointer),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointer_position(caption: &str) -> (String, usize) {
        // Excerpt is the line after the opening fence; the pointer line is
        // inline code at the end.
        let mut lines = caption.lines().rev();
        let pointer = lines.next().unwrap().trim_matches('`');
        let excerpt = lines
            .next()
            .unwrap()
            .trim_end_matches("```")
            .to_string();
        (excerpt, pointer.chars().count() - 1)
    }

    #[test]
    fn caret_sits_under_the_offending_character() {
        let caption = explain_error(
            "hello *world",
            "can't find end of the Bold entity starting at byte offset 6",
        );
        assert!(caption.contains("(chars offset 6)"));
        let (excerpt, caret) = pointer_position(&caption);
        assert_eq!(excerpt.chars().nth(caret), Some('*'));
    }

    #[test]
    fn multibyte_prefix_moves_the_caret_to_the_codepoint() {
        // 'é' is two bytes: byte offset 7 is codepoint offset 6.
        let caption = explain_error(
            "héllo *world",
            "can't find end of the Bold entity starting at byte offset 7",
        );
        assert!(caption.contains("(chars offset 6)"));
        let (excerpt, caret) = pointer_position(&caption);
        assert_eq!(excerpt.chars().nth(caret), Some('*'));
    }

    #[test]
    fn window_is_clamped_near_the_start() {
        let caption = explain_error("*oops", "bad entity at byte offset 0");
        assert!(caption.contains("(chars offset 0)"));
        let (excerpt, caret) = pointer_position(&caption);
        assert_eq!(caret, 0);
        assert_eq!(excerpt.chars().next(), Some('*'));
    }

    #[test]
    fn long_prefix_is_clamped_to_the_context_window() {
        let text = format!("{}*tail", "x".repeat(40));
        let caption = explain_error(&text, "stuck at byte offset 40");
        let (excerpt, caret) = pointer_position(&caption);
        assert_eq!(caret, 25);
        assert_eq!(excerpt.chars().nth(caret), Some('*'));
        assert_eq!(excerpt.chars().count(), 25 + 5);
    }

    #[test]
    fn newlines_in_the_excerpt_become_spaces() {
        let caption = explain_error(
            "line one\nline *two",
            "stuck at byte offset 14",
        );
        let (excerpt, caret) = pointer_position(&caption);
        assert!(!excerpt.contains('\n'));
        assert_eq!(excerpt.chars().nth(caret), Some('*'));
    }

    #[test]
    fn uses_the_last_offset_in_the_diagnostic() {
        let caption = explain_error(
            "ab *cd",
            "entity at offset 0 unterminated, see byte offset 3",
        );
        assert!(caption.contains("(chars offset 3)"));
    }

    #[test]
    fn diagnostic_without_an_offset_is_returned_unchanged() {
        let diagnostic = "something went wrong";
        assert_eq!(
            explain_error("text", diagnostic),
            diagnostic
        );
    }

    #[test]
    fn out_of_range_offset_is_clamped_to_the_end() {
        let caption = explain_error("ab", "bad input at byte offset 99");
        assert!(caption.contains("(chars offset 2)"));
    }
}
