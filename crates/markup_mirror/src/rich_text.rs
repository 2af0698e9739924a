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

//! Canonical rich-text value: plain text plus style annotations.
//!
//! Annotation ranges are **codepoint** offsets into the plain text, never
//! byte or UTF-16 offsets. Ranges may be disjoint or properly nested, but
//! never partially overlap. Annotation order is whatever the source parse
//! produced — consumers that need an ordering sort for themselves.

/// A style or link/mention marker over a codepoint range of plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationKind {
    Bold,
    Italic,
    /// Inline fixed-width code.
    Code,
    /// Pre-formatted fixed-width block, with an optional language tag.
    CodeBlock { language: Option<String> },
    /// An explicitly authored hyperlink.
    Link { url: String },
    /// An inline mention of a user account.
    Mention { user_id: u64 },
    /// A bare URL occurring in ordinary text. Serialized verbatim: never
    /// escaped, never wrapped in link syntax.
    PlainUrl,
}

impl AnnotationKind {
    /// Name used in parser diagnostics.
    pub(crate) fn entity_name(&self) -> &'static str {
        match self {
            AnnotationKind::Bold => "Bold",
            AnnotationKind::Italic => "Italic",
            AnnotationKind::Code => "Code",
            AnnotationKind::CodeBlock { .. } => "Pre",
            AnnotationKind::Link { .. } => "Link",
            AnnotationKind::Mention { .. } => "Mention",
            AnnotationKind::PlainUrl => "Url",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub kind: AnnotationKind,
    /// Codepoint offset of the first annotated character.
    pub start: usize,
    /// Codepoint offset one past the last annotated character.
    pub end: usize,
}

impl Annotation {
    pub fn new(kind: AnnotationKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }
}

/// A message's rich-text content.
///
/// A value type: freely cloneable, no shared mutable state. Equality is
/// structural — same text, same annotation *set* (order-insensitive).
#[derive(Debug, Clone, Default)]
pub struct RichText {
    text: String,
    annotations: Vec<Annotation>,
}

impl RichText {
    pub fn new(text: impl Into<String>, annotations: Vec<Annotation>) -> Self {
        let value = Self {
            text: text.into(),
            annotations,
        };
        #[cfg(any(test, feature = "assert-invariants"))]
        value.assert_invariants();
        value
    }

    /// A value with no annotations.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Length of the plain text in codepoints.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    #[cfg(any(test, feature = "assert-invariants"))]
    fn assert_invariants(&self) {
        let len = self.char_len();
        for a in &self.annotations {
            assert!(a.start <= a.end, "annotation range reversed: {a:?}");
            assert!(a.end <= len, "annotation out of bounds: {a:?} (len {len})");
        }
        for (i, a) in self.annotations.iter().enumerate() {
            for b in &self.annotations[i + 1..] {
                let disjoint = a.end <= b.start || b.end <= a.start;
                let nested = (a.start <= b.start && b.end <= a.end)
                    || (b.start <= a.start && a.end <= b.end);
                assert!(
                    disjoint || nested,
                    "annotations partially overlap: {a:?} / {b:?}"
                );
            }
        }
    }
}

impl PartialEq for RichText {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && same_annotation_set(&self.annotations, &other.annotations)
    }
}

impl Eq for RichText {}

/// Multiset equality over annotations, so that two parses that discovered
/// the same markup in a different order still compare equal.
fn same_annotation_set(a: &[Annotation], b: &[Annotation]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    'outer: for x in a {
        for (i, y) in b.iter().enumerate() {
            if !used[i] && x == y {
                used[i] = true;
                continue 'outer;
            }
        }
        return false;
    }
    true
}

/// Slice `text` by codepoint offsets.
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}
