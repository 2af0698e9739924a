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

//! Round-trip engine for chat message markup.
//!
//! A message's rich text can exist in three shapes: structured annotations
//! delivered by the transport, raw markdown typed by the author, or raw
//! HTML. This crate holds the canonical [`RichText`] model, converts it to
//! and from both raw dialects, guesses which shape an incoming message was
//! authored in, and renders caret captions for markup the parsers reject.
//!
//! ```
//! use markup_mirror::{deserialize, serialize, Dialect};
//!
//! let message = deserialize("*hello*", Dialect::Markdown).unwrap();
//! assert_eq!(message.text(), "hello");
//! assert_eq!(serialize(&message, Dialect::Html), "<b>hello</b>");
//! ```
//!
//! Everything here is a pure, synchronous computation over its own inputs;
//! calls may run concurrently from any number of request handlers.

pub mod detect;
pub mod echo;
pub mod entities;
pub mod error_caption;
pub mod markup;
pub mod rich_text;

pub use detect::{count_escapes, detect_format};
pub use echo::{echo_reply, raw_view, EchoReply};
pub use entities::{EntityKind, MessageEntity};
pub use error_caption::explain_error;
pub use markup::parse_error::ParseError;
pub use markup::{
    deserialize, serialize, serialize_with, Dialect, SerializeOptions,
};
pub use rich_text::{Annotation, AnnotationKind, RichText};
