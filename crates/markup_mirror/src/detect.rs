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

//! Format detection: a counting heuristic, not a parser.
//!
//! A message typed as raw markdown or HTML is full of characters that a
//! safe escaping pass for that same dialect would have to protect, because
//! the author typed the delimiters themselves. A message whose formatting
//! arrived as structured annotations shows the opposite profile: rendering
//! its annotations introduces more escape-worthy characters than either
//! raw-dialect guess explains. Comparing the three counts gives a best
//! guess — probabilistically correct, never failing, with ties going to
//! markdown.

use crate::markup::{
    html, markdown, serialize_with, Dialect, SerializeOptions,
};
use crate::rich_text::RichText;

/// How many escape characters a safe escaping pass for `dialect` would
/// introduce over `text`, net of escape characters already present.
///
/// A counting probe only: the escaped rendition never leaves this function.
pub fn count_escapes(dialect: Dialect, text: &str) -> usize {
    match dialect {
        Dialect::Markdown => {
            let escaped = markdown::escape_markdown(text);
            occurrences(&escaped, '\\').saturating_sub(occurrences(text, '\\'))
        }
        Dialect::Html => {
            let escaped = html::quote_html(text);
            occurrences(&escaped, '&').saturating_sub(occurrences(text, '&'))
        }
    }
}

fn occurrences(text: &str, needle: char) -> usize {
    text.chars().filter(|&c| c == needle).count()
}

/// Guess the dialect the author intended.
///
/// `None` means the message already carries structured annotations that
/// explain its special characters better than either dialect guess: echo
/// it as-is, no dialect applies.
pub fn detect_format(message: &RichText) -> Option<Dialect> {
    let raw = message.text();

    let markdown_escapes = count_escapes(Dialect::Markdown, raw);
    let html_escapes = count_escapes(Dialect::Html, raw);

    // Render the message's own annotations, leaving the text itself
    // untouched: delimiters introduced here come from annotations alone.
    let probe = serialize_with(
        message,
        Dialect::Markdown,
        &SerializeOptions {
            escape_plain_text: false,
            plain_url_passthrough: true,
        },
    );
    let entity_escapes = count_escapes(Dialect::Markdown, &probe);

    let format = if entity_escapes > markdown_escapes.max(html_escapes) {
        None
    } else if html_escapes > markdown_escapes {
        Some(Dialect::Html)
    } else {
        Some(Dialect::Markdown)
    };
    tracing::debug!(
        ?format,
        markdown_escapes,
        html_escapes,
        entity_escapes,
        "detected message formatting"
    );
    format
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EntityKind, MessageEntity};

    #[test]
    fn literal_markdown_is_detected() {
        let message = RichText::plain("*bold* and _italic_");
        assert_eq!(detect_format(&message), Some(Dialect::Markdown));
    }

    #[test]
    fn literal_html_is_detected() {
        let message = RichText::plain("<b>bold</b> and <i>italic</i>");
        assert_eq!(detect_format(&message), Some(Dialect::Html));
    }

    #[test]
    fn annotated_prose_needs_no_dialect() {
        let message = RichText::from_entities(
            "have a look at the manual please",
            &[MessageEntity::new(
                EntityKind::TextLink {
                    url: "https://example.com/manual".into(),
                },
                19,
                6,
            )],
        );
        assert_eq!(detect_format(&message), None);
    }

    #[test]
    fn plain_prose_falls_back_to_markdown() {
        let message = RichText::plain("just some words");
        assert_eq!(detect_format(&message), Some(Dialect::Markdown));
    }

    #[test]
    fn ties_favor_markdown() {
        // One '<' against one '.' — one escape each way.
        let message = RichText::plain("a < b . c");
        assert_eq!(
            count_escapes(Dialect::Markdown, message.text()),
            count_escapes(Dialect::Html, message.text())
        );
        assert_eq!(detect_format(&message), Some(Dialect::Markdown));
    }

    #[test]
    fn markdown_escape_count_is_net_of_existing_backslashes() {
        assert_eq!(count_escapes(Dialect::Markdown, "a\\b"), 0);
        assert_eq!(count_escapes(Dialect::Markdown, "*a*"), 2);
        assert_eq!(count_escapes(Dialect::Markdown, "\\*a*"), 2);
    }

    #[test]
    fn html_escape_count_is_net_of_existing_ampersands() {
        assert_eq!(count_escapes(Dialect::Html, "a & b"), 0);
        assert_eq!(count_escapes(Dialect::Html, "<b>"), 2);
        assert_eq!(count_escapes(Dialect::Html, "\"q\""), 2);
    }

    #[test]
    fn bare_url_alone_does_not_look_like_markup() {
        // The URL's dots count toward the markdown guess, but with no
        // entities the probe equals the raw text, so the result is a
        // dialect, not a pre-formatted verdict.
        let message = RichText::plain("see http://example.com/x for info");
        assert_eq!(detect_format(&message), Some(Dialect::Markdown));
    }
}
