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

//! Markdown rendition: `*bold*`, `_italic_`, `` `code` ``, fenced blocks,
//! `[text](url)` links and mentions.
//!
//! The decoration helpers mirror the dialect one-to-one and are also used
//! by the error-caption builder, which wraps its excerpt and pointer lines
//! in code markup.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{DialectWriter, SerializeOptions};
use crate::rich_text::AnnotationKind;
use tg_mentions::Mention;

/// Characters a safe escaping pass protects with a backslash.
pub(crate) const SPECIAL: &str = "_*[]()~`>#+-=|{}.!";

/// Bare URLs inside ordinary prose. Deliberately loose: the point is to
/// leave whatever the author pasted untouched, not to validate it.
static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:https?|ftp)://[^\s<>]+").expect("static regex"));

pub fn bold(text: &str) -> String {
    format!("*{text}*")
}

pub fn italic(text: &str) -> String {
    format!("_{text}_")
}

pub fn code_inline(text: &str) -> String {
    format!("`{text}`")
}

/// Fenced code block. The closing fence is emitted directly after the
/// content: a block whose content already ends in a newline gets its fence
/// on its own line, and one that doesn't, doesn't. Re-emitting a newline
/// here would grow the text on every round trip.
pub fn pre(text: &str, language: Option<&str>) -> String {
    format!("```{}\n{text}```", language.unwrap_or(""))
}

pub fn link(text: &str, url: &str) -> String {
    format!("[{text}]({url})")
}

/// Backslash-escape every markdown-special character in `text`.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL.contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub(crate) struct MarkdownWriter;

impl DialectWriter for MarkdownWriter {
    fn write_plain(&self, out: &mut String, text: &str, options: &SerializeOptions) {
        if !options.escape_plain_text {
            out.push_str(text);
            return;
        }
        if options.plain_url_passthrough {
            let mut last = 0;
            for m in BARE_URL.find_iter(text) {
                out.push_str(&escape_markdown(&text[last..m.start()]));
                out.push_str(m.as_str());
                last = m.end();
            }
            out.push_str(&escape_markdown(&text[last..]));
        } else {
            out.push_str(&escape_markdown(text));
        }
    }

    fn write_span(
        &self,
        out: &mut String,
        kind: &AnnotationKind,
        inner: &str,
        _options: &SerializeOptions,
    ) {
        match kind {
            AnnotationKind::Bold => out.push_str(&bold(inner)),
            AnnotationKind::Italic => out.push_str(&italic(inner)),
            AnnotationKind::Code => out.push_str(&code_inline(inner)),
            AnnotationKind::CodeBlock { language } => {
                out.push_str(&pre(inner, language.as_deref()))
            }
            AnnotationKind::Link { url } => out.push_str(&link(inner, url)),
            AnnotationKind::Mention { user_id } => {
                out.push_str(&link(inner, &Mention::new(*user_id).uri()))
            }
            AnnotationKind::PlainUrl => out.push_str(inner),
        }
    }
}
