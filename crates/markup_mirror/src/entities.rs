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

//! Transport-side structured annotations.
//!
//! Platforms deliver rich-text metadata as entities anchored at UTF-16
//! code-unit offsets. [`RichText::from_entities`] translates those ranges
//! into the codepoint offsets the rest of the crate works in. Entities that
//! fall outside the text or split a surrogate pair are transport bugs; they
//! are skipped, not propagated.

use widestring::Utf16Str;
use widestring::Utf16String;

use crate::rich_text::{Annotation, AnnotationKind, RichText};
use tg_mentions::Mention;

/// The fixed allow-list of entity kinds the transport can deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Bold,
    Italic,
    Code,
    Pre { language: Option<String> },
    TextLink { url: String },
    TextMention { user_id: u64 },
    /// A bare URL the platform recognized inside ordinary text.
    Url,
}

/// A structured annotation as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntity {
    pub kind: EntityKind,
    /// Offset into the message text, in UTF-16 code units.
    pub offset: usize,
    /// Length of the annotated span, in UTF-16 code units.
    pub length: usize,
}

impl MessageEntity {
    pub fn new(kind: EntityKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            offset,
            length,
        }
    }
}

impl RichText {
    /// Build a rich-text value from plain text and transport entities.
    pub fn from_entities(
        text: impl Into<String>,
        entities: &[MessageEntity],
    ) -> RichText {
        let text = text.into();
        let utf16 = Utf16String::from_str(&text);
        let mut annotations = Vec::with_capacity(entities.len());

        for entity in entities {
            let Some(start) = codepoint_offset(&utf16, entity.offset) else {
                tracing::debug!(?entity, "entity start is not a codepoint boundary");
                continue;
            };
            let Some(end) = codepoint_offset(&utf16, entity.offset + entity.length)
            else {
                tracing::debug!(?entity, "entity end is not a codepoint boundary");
                continue;
            };
            annotations.push(Annotation::new(
                annotation_kind(&entity.kind),
                start,
                end,
            ));
        }

        RichText::new(text, annotations)
    }
}

/// Number of codepoints in the UTF-16 prefix ending at `unit`.
///
/// `None` when `unit` is past the end of the text or splits a surrogate
/// pair.
fn codepoint_offset(text: &Utf16Str, unit: usize) -> Option<usize> {
    let mut units = 0;
    let mut chars = 0;
    for c in text.chars() {
        if units == unit {
            return Some(chars);
        }
        if units > unit {
            // Landed between the halves of a surrogate pair.
            return None;
        }
        units += c.len_utf16();
        chars += 1;
    }
    (units == unit).then_some(chars)
}

fn annotation_kind(kind: &EntityKind) -> AnnotationKind {
    match kind {
        EntityKind::Bold => AnnotationKind::Bold,
        EntityKind::Italic => AnnotationKind::Italic,
        EntityKind::Code => AnnotationKind::Code,
        EntityKind::Pre { language } => AnnotationKind::CodeBlock {
            language: language.clone(),
        },
        // Some clients deliver a user mention as a text link at a mention
        // URI rather than as a dedicated mention entity.
        EntityKind::TextLink { url } => match Mention::from_uri(url) {
            Some(mention) => AnnotationKind::Mention {
                user_id: mention.user_id(),
            },
            None => AnnotationKind::Link { url: url.clone() },
        },
        EntityKind::TextMention { user_id } => AnnotationKind::Mention {
            user_id: *user_id,
        },
        EntityKind::Url => AnnotationKind::PlainUrl,
    }
}
