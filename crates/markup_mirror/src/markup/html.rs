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

//! HTML rendition: the fixed tag subset `<b>`, `<i>`, `<code>`, `<pre>`
//! and `<a href>`.
//!
//! A code block with a language tag renders as
//! `<pre><code class="language-x">…</code></pre>`; without one, as a bare
//! `<pre>`. Plain-URL passthrough is a markdown discipline — in HTML every
//! text run is entity-encoded, bare URLs included, or the output would not
//! re-parse.

use super::{DialectWriter, SerializeOptions};
use crate::rich_text::AnnotationKind;
use tg_mentions::Mention;

pub fn bold(text: &str) -> String {
    format!("<b>{text}</b>")
}

pub fn italic(text: &str) -> String {
    format!("<i>{text}</i>")
}

pub fn code_inline(text: &str) -> String {
    format!("<code>{}</code>", html_escape::encode_text(text))
}

pub fn pre(text: &str, language: Option<&str>) -> String {
    let escaped = html_escape::encode_text(text);
    match language {
        Some(language) => format!(
            "<pre><code class=\"language-{}\">{escaped}</code></pre>",
            html_escape::encode_double_quoted_attribute(language)
        ),
        None => format!("<pre>{escaped}</pre>"),
    }
}

pub fn link(text: &str, url: &str) -> String {
    format!(
        "<a href=\"{}\">{text}</a>",
        html_escape::encode_double_quoted_attribute(url)
    )
}

/// Entity-escape `&`, `<`, `>` and `"`, the way a conservative
/// quote-everything pass would. Used by the escaping counter; the
/// serializer itself uses the narrower text encoding.
pub fn quote_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) struct HtmlWriter;

impl DialectWriter for HtmlWriter {
    fn write_plain(&self, out: &mut String, text: &str, options: &SerializeOptions) {
        if options.escape_plain_text {
            out.push_str(&html_escape::encode_text(text));
        } else {
            out.push_str(text);
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
            AnnotationKind::PlainUrl => {
                out.push_str(&html_escape::encode_text(inner))
            }
        }
    }
}
