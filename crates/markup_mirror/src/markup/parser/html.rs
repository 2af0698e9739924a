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

//! Strict parser for the HTML dialect.
//!
//! Only the fixed tag subset is accepted: `<b>`/`<strong>`, `<i>`/`<em>`,
//! `<code>`, `<pre>` (optionally wrapping a single
//! `<code class="language-x">`), and `<a href="…">`. Tags nest; inside
//! `pre`/`code` no further markup is allowed. A `&` must start a character
//! reference. A stray `>` in text is literal, matching what lenient
//! renderers do with it, but every `<` must open a well-formed tag.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::markup::parse_error::ParseError;
use crate::rich_text::{Annotation, AnnotationKind, RichText};
use tg_mentions::Mention;

pub fn from_html(src: &str) -> Result<RichText, ParseError> {
    HtmlParser::new(src).run()
}

const SUPPORTED_TAGS: &[&str] = &["b", "strong", "i", "em", "code", "pre", "a"];

/// Character references longer than this cannot be one of ours.
const MAX_REFERENCE_LEN: usize = 12;

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([a-zA-Z-]+)\s*=\s*"([^"]*)""#).expect("static regex")
});

fn canonical(name: &str) -> Option<&'static str> {
    SUPPORTED_TAGS.iter().copied().find(|tag| *tag == name)
}

fn attribute_value(attrs: &str, name: &str) -> Option<String> {
    ATTRIBUTE
        .captures_iter(attrs)
        .find(|caps| &caps[1] == name)
        .map(|caps| html_escape::decode_html_entities(&caps[2]).into_owned())
}

struct OpenTag {
    name: &'static str,
    /// Codepoint offset in the output text where the span starts.
    start: usize,
    /// Byte offset of the `<` in the source, for diagnostics.
    byte_offset: usize,
    href: Option<String>,
    language: Option<String>,
}

struct HtmlParser<'a> {
    src: &'a str,
    pos: usize,
    text: String,
    out_len: usize,
    annotations: Vec<Annotation>,
    stack: Vec<OpenTag>,
}

impl<'a> HtmlParser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            text: String::with_capacity(src.len()),
            out_len: 0,
            annotations: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn push_char(&mut self, c: char) {
        self.text.push(c);
        self.out_len += 1;
    }

    fn run(mut self) -> Result<RichText, ParseError> {
        while let Some(c) = self.peek() {
            match c {
                '<' => self.tag()?,
                '&' => self.character_reference()?,
                _ => {
                    self.push_char(c);
                    self.bump();
                }
            }
        }
        if let Some(frame) = self.stack.last() {
            return Err(ParseError::UnclosedEntity {
                name: frame.name,
                offset: frame.byte_offset,
            });
        }
        Ok(RichText::new(self.text, self.annotations))
    }

    fn tag(&mut self) -> Result<(), ParseError> {
        let open = self.pos;
        let src = self.src;
        self.bump();
        let closing = matches!(self.peek(), Some('/'));
        if closing {
            self.bump();
        }

        // Scan to the closing '>', skipping quoted attribute values.
        let rest = &src[self.pos..];
        let mut end = None;
        let mut in_quotes = false;
        for (i, c) in rest.char_indices() {
            match c {
                '"' => in_quotes = !in_quotes,
                '>' if !in_quotes => {
                    end = Some(i);
                    break;
                }
                _ => {}
            }
        }
        let Some(end) = end else {
            return Err(ParseError::MalformedTag { offset: open });
        };
        let inner = &rest[..end];
        self.pos += end + 1;

        if closing {
            self.close_tag(inner.trim(), open)
        } else {
            self.open_tag(inner, open)
        }
    }

    fn open_tag(&mut self, inner: &str, open: usize) -> Result<(), ParseError> {
        let name_end = inner
            .find(|c: char| c.is_whitespace())
            .unwrap_or(inner.len());
        let (name, attrs) = inner.split_at(name_end);
        let Some(name) = canonical(name) else {
            return Err(ParseError::UnsupportedTag {
                tag: name.to_string(),
                offset: open,
            });
        };

        // Inside pre/code the only markup allowed is the one `<code>`
        // immediately wrapping a pre block's content.
        if let Some(top) = self.stack.last() {
            let code_right_after_pre = top.name == "pre"
                && name == "code"
                && top.start == self.out_len;
            if (top.name == "pre" || top.name == "code")
                && !code_right_after_pre
            {
                return Err(ParseError::UnsupportedTag {
                    tag: name.to_string(),
                    offset: open,
                });
            }
        }

        let href = attribute_value(attrs, "href");
        if name == "a" && href.is_none() {
            return Err(ParseError::MissingLinkTarget { offset: open });
        }
        let language = attribute_value(attrs, "class")
            .and_then(|class| class.strip_prefix("language-").map(str::to_string));

        self.stack.push(OpenTag {
            name,
            start: self.out_len,
            byte_offset: open,
            href,
            language,
        });
        Ok(())
    }

    fn close_tag(&mut self, name: &str, open: usize) -> Result<(), ParseError> {
        if name.is_empty() {
            return Err(ParseError::MalformedTag { offset: open });
        }
        let Some(frame) = self.stack.pop() else {
            return Err(ParseError::StrayEndTag {
                tag: name.to_string(),
                offset: open,
            });
        };
        if frame.name != name {
            return Err(ParseError::MismatchedTag {
                expected: frame.name,
                found: name.to_string(),
                offset: open,
            });
        }

        match frame.name {
            "b" | "strong" => self.annotations.push(Annotation::new(
                AnnotationKind::Bold,
                frame.start,
                self.out_len,
            )),
            "i" | "em" => self.annotations.push(Annotation::new(
                AnnotationKind::Italic,
                frame.start,
                self.out_len,
            )),
            "code" => {
                // A code tag directly inside pre contributes its language
                // to the block instead of an inline-code annotation.
                if let Some(parent) = self.stack.last_mut() {
                    if parent.name == "pre" {
                        parent.language = frame.language;
                        return Ok(());
                    }
                }
                self.annotations.push(Annotation::new(
                    AnnotationKind::Code,
                    frame.start,
                    self.out_len,
                ));
            }
            "pre" => self.annotations.push(Annotation::new(
                AnnotationKind::CodeBlock {
                    language: frame.language,
                },
                frame.start,
                self.out_len,
            )),
            "a" => {
                let Some(url) = frame.href else {
                    return Err(ParseError::MissingLinkTarget {
                        offset: frame.byte_offset,
                    });
                };
                let kind = match Mention::from_uri(&url) {
                    Some(mention) => AnnotationKind::Mention {
                        user_id: mention.user_id(),
                    },
                    None => AnnotationKind::Link { url },
                };
                self.annotations.push(Annotation::new(
                    kind,
                    frame.start,
                    self.out_len,
                ));
            }
            _ => {}
        }
        Ok(())
    }

    fn character_reference(&mut self) -> Result<(), ParseError> {
        let open = self.pos;
        let src = self.src;
        self.bump();
        let rest = &src[self.pos..];
        let semicolon = rest
            .find(';')
            .filter(|i| (1..=MAX_REFERENCE_LEN).contains(i));
        let Some(semicolon) = semicolon else {
            return Err(ParseError::BadCharacterReference { offset: open });
        };
        let body = &rest[..semicolon];

        let decoded = match body {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let value = if let Some(hex) = body
                    .strip_prefix("#x")
                    .or_else(|| body.strip_prefix("#X"))
                {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = body.strip_prefix('#') {
                    dec.parse::<u32>().ok()
                } else {
                    None
                };
                match value.and_then(char::from_u32) {
                    Some(c) => c,
                    None => {
                        return Err(ParseError::BadCharacterReference {
                            offset: open,
                        })
                    }
                }
            }
        };

        self.push_char(decoded);
        self.pos += semicolon + 1;
        Ok(())
    }
}
