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

//! Strict parser for the markdown dialect.
//!
//! `*bold*`, `_italic_`, `` `code` ``, ```` ```language⏎content``` ````
//! fences, `[text](url)` links (a mention when the url is a mention URI),
//! and backslash escapes. Entities do not nest; an opening delimiter with
//! no close is an error at the delimiter.

use crate::markup::parse_error::ParseError;
use crate::rich_text::{Annotation, AnnotationKind, RichText};
use tg_mentions::Mention;

pub fn from_markdown(src: &str) -> Result<RichText, ParseError> {
    MarkdownParser::new(src).run()
}

struct MarkdownParser<'a> {
    src: &'a str,
    /// Byte cursor into `src`.
    pos: usize,
    text: String,
    /// Codepoint length of `text`, tracked to avoid re-counting.
    out_len: usize,
    annotations: Vec<Annotation>,
}

impl<'a> MarkdownParser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            text: String::with_capacity(src.len()),
            out_len: 0,
            annotations: Vec::new(),
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

    /// Consume the character after a backslash as a literal.
    fn escape(&mut self) {
        self.bump();
        match self.peek() {
            Some(next) => {
                self.push_char(next);
                self.bump();
            }
            // A trailing backslash escapes nothing; keep it.
            None => self.push_char('\\'),
        }
    }

    fn run(mut self) -> Result<RichText, ParseError> {
        while let Some(c) = self.peek() {
            match c {
                '\\' => self.escape(),
                '*' => self.delimited('*', AnnotationKind::Bold)?,
                '_' => self.delimited('_', AnnotationKind::Italic)?,
                '`' => self.code()?,
                '[' => self.link()?,
                _ => {
                    self.push_char(c);
                    self.bump();
                }
            }
        }
        Ok(RichText::new(self.text, self.annotations))
    }

    /// `*bold*` / `_italic_`. Content is literal except for escapes.
    fn delimited(
        &mut self,
        delim: char,
        kind: AnnotationKind,
    ) -> Result<(), ParseError> {
        let open = self.pos;
        self.bump();
        let start = self.out_len;
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::UnclosedEntity {
                        name: kind.entity_name(),
                        offset: open,
                    })
                }
                Some('\\') => self.escape(),
                Some(c) if c == delim => {
                    self.bump();
                    break;
                }
                Some(c) => {
                    self.push_char(c);
                    self.bump();
                }
            }
        }
        self.annotations
            .push(Annotation::new(kind, start, self.out_len));
        Ok(())
    }

    fn code(&mut self) -> Result<(), ParseError> {
        let open = self.pos;
        if self.src[self.pos..].starts_with("```") {
            return self.fenced(open);
        }
        self.bump();
        let start = self.out_len;
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::UnclosedEntity {
                        name: "Code",
                        offset: open,
                    })
                }
                Some('`') => {
                    self.bump();
                    break;
                }
                Some(c) => {
                    self.push_char(c);
                    self.bump();
                }
            }
        }
        self.annotations
            .push(Annotation::new(AnnotationKind::Code, start, self.out_len));
        Ok(())
    }

    /// ```` ```language⏎content``` ````. The first line of the fenced body
    /// is the language tag; everything after it, up to the closing fence,
    /// is content, including any trailing newline.
    fn fenced(&mut self, open: usize) -> Result<(), ParseError> {
        let src = self.src;
        self.pos += 3;
        let rest = &src[self.pos..];
        let Some(idx) = rest.find("```") else {
            return Err(ParseError::UnclosedEntity {
                name: "Pre",
                offset: open,
            });
        };
        let body = &rest[..idx];
        let (language, content) = match body.find('\n') {
            Some(newline) => {
                let language = &body[..newline];
                let language =
                    (!language.is_empty()).then(|| language.to_string());
                (language, &body[newline + 1..])
            }
            None => (None, body),
        };

        let start = self.out_len;
        self.text.push_str(content);
        self.out_len += content.chars().count();
        self.annotations.push(Annotation::new(
            AnnotationKind::CodeBlock { language },
            start,
            self.out_len,
        ));
        self.pos += idx + 3;
        Ok(())
    }

    fn link(&mut self) -> Result<(), ParseError> {
        let open = self.pos;
        self.bump();
        let start = self.out_len;
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::UnclosedEntity {
                        name: "Link",
                        offset: open,
                    })
                }
                Some(']') => {
                    self.bump();
                    break;
                }
                Some('\\') => self.escape(),
                Some(c) => {
                    self.push_char(c);
                    self.bump();
                }
            }
        }
        let end = self.out_len;

        match self.peek() {
            Some('(') => self.bump(),
            _ => {
                return Err(ParseError::MissingLinkTarget { offset: self.pos })
            }
        }
        let mut url = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::UnclosedEntity {
                        name: "Link",
                        offset: open,
                    })
                }
                Some(')') => {
                    self.bump();
                    break;
                }
                Some(c) => {
                    url.push(c);
                    self.bump();
                }
            }
        }

        let kind = match Mention::from_uri(&url) {
            Some(mention) => AnnotationKind::Mention {
                user_id: mention.user_id(),
            },
            None => AnnotationKind::Link { url },
        };
        self.annotations.push(Annotation::new(kind, start, end));
        Ok(())
    }
}
