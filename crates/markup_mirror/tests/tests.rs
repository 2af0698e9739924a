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

use indoc::indoc;
use speculoos::prelude::*;

use markup_mirror::{
    deserialize, detect_format, echo_reply, explain_error, serialize,
    Annotation, AnnotationKind, Dialect, EntityKind, MessageEntity, RichText,
};

fn round_trips(rich: &RichText, dialect: Dialect) {
    let rendered = serialize(rich, dialect);
    let parsed = deserialize(&rendered, dialect)
        .unwrap_or_else(|e| panic!("{dialect} rejected {rendered:?}: {e}"));
    assert_eq!(&parsed, rich, "through {dialect}: {rendered:?}");
}

#[test]
fn values_round_trip_through_both_dialects() {
    let cases = [
        RichText::plain("hello there"),
        RichText::plain("specials: 2 * 3 = 6, really!"),
        RichText::new(
            "bold and italic",
            vec![
                Annotation::new(AnnotationKind::Bold, 0, 4),
                Annotation::new(AnnotationKind::Italic, 9, 15),
            ],
        ),
        RichText::new(
            "a*b",
            vec![Annotation::new(AnnotationKind::Code, 0, 3)],
        ),
        RichText::new(
            "fn main() {}\n",
            vec![Annotation::new(
                AnnotationKind::CodeBlock {
                    language: Some("rust".into()),
                },
                0,
                13,
            )],
        ),
        RichText::new(
            "the docs",
            vec![Annotation::new(
                AnnotationKind::Link {
                    url: "https://example.com/?a=1&b=2".into(),
                },
                4,
                8,
            )],
        ),
        RichText::new(
            "ask alice about it",
            vec![Annotation::new(
                AnnotationKind::Mention { user_id: 93212972 },
                4,
                9,
            )],
        ),
        RichText::new(
            "emoji 😀 then bold",
            vec![Annotation::new(AnnotationKind::Bold, 13, 17)],
        ),
    ];
    for rich in &cases {
        round_trips(rich, Dialect::Markdown);
        round_trips(rich, Dialect::Html);
    }
}

#[test]
fn multiline_markdown_message_round_trips_as_a_string() {
    let source = indoc! {"
        *status report*
        deploy finished, see `logs/latest`
        ```
        cargo build --release
        ```
    "};
    let parsed = deserialize(source, Dialect::Markdown).unwrap();
    assert_eq!(serialize(&parsed, Dialect::Markdown), source);
}

#[test]
fn fenced_block_does_not_grow_across_round_trips() {
    let rich = RichText::new(
        "let x = 1;\n",
        vec![Annotation::new(
            AnnotationKind::CodeBlock { language: None },
            0,
            11,
        )],
    );
    let once = serialize(&rich, Dialect::Markdown);
    let reparsed = deserialize(&once, Dialect::Markdown).unwrap();
    let twice = serialize(&reparsed, Dialect::Markdown);
    assert_eq!(once, twice);
    assert_eq!(deserialize(&twice, Dialect::Markdown).unwrap(), rich);
    assert!(!twice.contains("\n\n"), "blank lines accumulated: {twice:?}");
}

#[test]
fn bare_url_in_plain_text_is_left_untouched() {
    let rich = RichText::plain("see http://example.com/x for info");
    assert_eq!(
        serialize(&rich, Dialect::Markdown),
        "see http://example.com/x for info"
    );
}

// The detection heuristic is probabilistic — these pin its behavior on the
// canonical inputs, including the tie-break rule, not a grammar.

#[test]
fn detects_literal_markdown() {
    let message = RichText::plain("*bold* and _italic_");
    assert_that!(detect_format(&message)).is_equal_to(Some(Dialect::Markdown));
}

#[test]
fn detects_literal_html() {
    let message = RichText::plain("<b>bold</b> and <i>italic</i>");
    assert_that!(detect_format(&message)).is_equal_to(Some(Dialect::Html));
}

#[test]
fn platform_annotated_prose_detects_as_preformatted() {
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
    assert_that!(detect_format(&message)).is_equal_to(None);
}

#[test]
fn caret_caption_points_at_the_bad_character() {
    let error = deserialize("hello *world", Dialect::Markdown).unwrap_err();
    let diagnostic = error.to_string();
    assert!(diagnostic.contains("byte offset 6"), "got: {diagnostic}");

    let caption = explain_error("hello *world", &diagnostic);
    let expected = format!(
        "{diagnostic}, (chars offset 6):\n\n```\nhello *worl```\n`      ^`"
    );
    assert_eq!(caption, expected);
}

#[test]
fn caret_counts_codepoints_not_bytes() {
    // The multi-byte 'é' shifts the byte offset to 7; the caret must still
    // sit under the '*' at codepoint 6.
    let error = deserialize("héllo *world", Dialect::Markdown).unwrap_err();
    let diagnostic = error.to_string();
    assert!(diagnostic.contains("byte offset 7"), "got: {diagnostic}");

    let caption = explain_error("héllo *world", &diagnostic);
    let expected = format!(
        "{diagnostic}, (chars offset 6):\n\n```\nhéllo *worl```\n`      ^`"
    );
    assert_eq!(caption, expected);
}

#[test]
fn foreign_diagnostics_with_the_same_wording_work_too() {
    let caption = explain_error(
        "a <b>x",
        "Bad Request: can't parse entities: unsupported start tag at byte offset 2",
    );
    assert!(caption.contains("(chars offset 2)"), "got: {caption}");
    assert!(caption.contains('^'), "got: {caption}");
}

#[test]
fn utf16_entity_offsets_map_to_codepoints() {
    let message = RichText::from_entities(
        "😀 bold text",
        &[MessageEntity::new(EntityKind::Bold, 3, 4)],
    );
    assert_eq!(
        message.annotations(),
        &[Annotation::new(AnnotationKind::Bold, 2, 6)]
    );
    assert_eq!(serialize(&message, Dialect::Markdown), "😀 *bold* text");
}

#[test]
fn mention_round_trips_in_both_dialects() {
    let markdown = "[alice](tg://user?id=93212972)";
    let parsed = deserialize(markdown, Dialect::Markdown).unwrap();
    assert_eq!(
        parsed.annotations(),
        &[Annotation::new(
            AnnotationKind::Mention { user_id: 93212972 },
            0,
            5
        )]
    );
    assert_eq!(serialize(&parsed, Dialect::Markdown), markdown);
    assert_eq!(
        serialize(&parsed, Dialect::Html),
        "<a href=\"tg://user?id=93212972\">alice</a>"
    );
}

#[test]
fn nested_html_round_trips() {
    // Nesting is an HTML affordance; the markdown dialect is flat and
    // cannot express it.
    let parsed = deserialize("<b><i>x</i></b>", Dialect::Html).unwrap();
    assert_eq!(parsed.annotations().len(), 2);
    round_trips(&parsed, Dialect::Html);
}

#[test]
fn echo_rerenders_annotated_messages_as_markdown() {
    let message = RichText::from_entities(
        "read the manual first",
        &[MessageEntity::new(
            EntityKind::TextLink {
                url: "https://example.com/m".into(),
            },
            9,
            6,
        )],
    );
    let reply = echo_reply(&message);
    assert_eq!(reply.text, "read the [manual](https://example.com/m) first");
    assert_that!(reply.dialect).is_equal_to(Some(Dialect::Markdown));
}

#[test]
fn echo_passes_typed_markup_through_for_reparsing() {
    let reply = echo_reply(&RichText::plain("*bold* and _italic_"));
    assert_eq!(reply.text, "*bold* and _italic_");
    assert_that!(reply.dialect).is_equal_to(Some(Dialect::Markdown));

    let reply = echo_reply(&RichText::plain("<b>bold</b>"));
    assert_eq!(reply.text, "<b>bold</b>");
    assert_that!(reply.dialect).is_equal_to(Some(Dialect::Html));
}
