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

//! Parse failures for the markup dialects.
//!
//! Every variant carries the byte offset of the first byte of the
//! offending character in the string that was parsed, and every `Display`
//! rendition contains the literal words `byte offset N` — the error-caption
//! builder extracts the offset from that wording, the same way it handles
//! diagnostics produced by a remote markup parser.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An opening delimiter or tag with no matching close.
    #[error("can't find end of the {name} entity starting at byte offset {offset}")]
    UnclosedEntity { name: &'static str, offset: usize },

    /// A tag outside the supported subset.
    #[error("unsupported start tag \"{tag}\" at byte offset {offset}")]
    UnsupportedTag { tag: String, offset: usize },

    /// A close tag that doesn't match the innermost open tag.
    #[error("unexpected end tag \"{found}\" at byte offset {offset}, expected \"</{expected}>\"")]
    MismatchedTag {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    /// A close tag with nothing open.
    #[error("unexpected end tag \"{tag}\" at byte offset {offset}")]
    StrayEndTag { tag: String, offset: usize },

    /// A `<` that doesn't open a well-formed tag.
    #[error("malformed tag at byte offset {offset}")]
    MalformedTag { offset: usize },

    /// A `&` that doesn't start a recognized character reference.
    #[error("unexpected character reference at byte offset {offset}")]
    BadCharacterReference { offset: usize },

    /// Link syntax without a target, e.g. `[text]` with no `(url)`, or an
    /// `<a>` tag without an `href`.
    #[error("link entity is missing a target at byte offset {offset}")]
    MissingLinkTarget { offset: usize },
}

impl ParseError {
    /// Byte offset of the offending character in the parsed string.
    pub fn byte_offset(&self) -> usize {
        match self {
            ParseError::UnclosedEntity { offset, .. }
            | ParseError::UnsupportedTag { offset, .. }
            | ParseError::MismatchedTag { offset, .. }
            | ParseError::StrayEndTag { offset, .. }
            | ParseError::MalformedTag { offset }
            | ParseError::BadCharacterReference { offset }
            | ParseError::MissingLinkTarget { offset } => *offset,
        }
    }
}
