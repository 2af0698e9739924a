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

//! The two raw markup dialects and conversion to/from [`RichText`].
//!
//! Serialization is total: any rich-text value renders in either dialect,
//! and delimiter characters occurring in plain text are escaped so the
//! result re-parses to the same value. Parsing is strict and partial: bad
//! markup is rejected with a [`ParseError`] carrying the byte offset of the
//! offending character.

pub mod html;
pub mod markdown;
pub mod parse_error;
pub mod parser;

use strum_macros::{Display, EnumString};

use crate::rich_text::{char_slice, Annotation, AnnotationKind, RichText};
use parse_error::ParseError;

/// A raw markup syntax an author can type a message in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Dialect {
    Markdown,
    #[strum(serialize = "HTML")]
    Html,
}

/// Serializer configuration.
///
/// These flags exist so that the detector can render its probe string
/// through the ordinary serializer instead of overriding serialization
/// steps behind the scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Escape dialect-special characters in plain (non-annotated) text.
    pub escape_plain_text: bool,
    /// Emit bare URLs in plain text verbatim instead of escaping them.
    pub plain_url_passthrough: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            escape_plain_text: true,
            plain_url_passthrough: true,
        }
    }
}

/// Render `rich` in `dialect` with default options.
pub fn serialize(rich: &RichText, dialect: Dialect) -> String {
    serialize_with(rich, dialect, &SerializeOptions::default())
}

/// Render `rich` in `dialect`.
pub fn serialize_with(
    rich: &RichText,
    dialect: Dialect,
    options: &SerializeOptions,
) -> String {
    match dialect {
        Dialect::Markdown => render(rich, &markdown::MarkdownWriter, options),
        Dialect::Html => render(rich, &html::HtmlWriter, options),
    }
}

/// Parse raw markup in `dialect` back into a rich-text value.
pub fn deserialize(text: &str, dialect: Dialect) -> Result<RichText, ParseError> {
    match dialect {
        Dialect::Markdown => parser::markdown::from_markdown(text),
        Dialect::Html => parser::html::from_html(text),
    }
}

/// One dialect's way of writing plain runs and annotated spans.
///
/// The annotation walk itself is dialect-independent and lives in
/// [`render`]; writers only decide delimiters and escaping.
pub(crate) trait DialectWriter {
    fn write_plain(&self, out: &mut String, text: &str, options: &SerializeOptions);

    /// Wrap one annotated span. `inner` is already rendered for container
    /// kinds, and raw text for [`AnnotationKind::Code`],
    /// [`AnnotationKind::CodeBlock`] and [`AnnotationKind::PlainUrl`].
    fn write_span(
        &self,
        out: &mut String,
        kind: &AnnotationKind,
        inner: &str,
        options: &SerializeOptions,
    );
}

/// Walk the annotations of `rich` in document order and render each span.
pub(crate) fn render(
    rich: &RichText,
    writer: &impl DialectWriter,
    options: &SerializeOptions,
) -> String {
    let mut sorted: Vec<&Annotation> = rich.annotations().iter().collect();
    // Outermost-first: by start, then longest range.
    sorted.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut out = String::with_capacity(rich.text().len());
    render_range(
        rich.text(),
        &sorted,
        0,
        rich.char_len(),
        writer,
        options,
        &mut out,
    );
    out
}

fn render_range(
    text: &str,
    annotations: &[&Annotation],
    start: usize,
    end: usize,
    writer: &impl DialectWriter,
    options: &SerializeOptions,
    out: &mut String,
) {
    let mut pos = start;
    let mut i = 0;
    while i < annotations.len() {
        let annotation = annotations[i];
        if annotation.start < pos || annotation.end > end {
            i += 1;
            continue;
        }
        if annotation.start > pos {
            writer.write_plain(
                out,
                &char_slice(text, pos, annotation.start),
                options,
            );
        }

        // Annotations starting inside this one are its children; the
        // no-partial-overlap invariant means they also end inside it.
        let mut j = i + 1;
        while j < annotations.len() && annotations[j].start < annotation.end {
            j += 1;
        }

        let inner = match &annotation.kind {
            AnnotationKind::Code
            | AnnotationKind::CodeBlock { .. }
            | AnnotationKind::PlainUrl => {
                char_slice(text, annotation.start, annotation.end)
            }
            _ => {
                let mut nested = String::new();
                render_range(
                    text,
                    &annotations[i + 1..j],
                    annotation.start,
                    annotation.end,
                    writer,
                    options,
                    &mut nested,
                );
                nested
            }
        };
        writer.write_span(out, &annotation.kind, &inner, options);

        pos = annotation.end;
        i = j;
    }
    if pos < end {
        writer.write_plain(out, &char_slice(text, pos, end), options);
    }
}
