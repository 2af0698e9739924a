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

//! Echo and raw-view decisions for incoming messages.
//!
//! The transport layer sends messages and edits them; the decisions about
//! *what* to send live here, where they stay pure and testable: which text
//! to echo back for an incoming message, and which string to display when
//! the user toggles a message to its raw-markup view.

use crate::detect::detect_format;
use crate::markup::{serialize, Dialect};
use crate::rich_text::RichText;

/// What to send back for an incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoReply {
    /// The outgoing message text.
    pub text: String,
    /// Dialect the outgoing text should be parsed in; `None` sends it
    /// plain.
    pub dialect: Option<Dialect>,
}

/// Decide how to echo an incoming message.
///
/// A message that already carries structured annotations is re-rendered as
/// markdown so its formatting survives the trip; anything else is echoed
/// verbatim and parsed in whatever dialect it looks like it was typed in.
pub fn echo_reply(message: &RichText) -> EchoReply {
    match detect_format(message) {
        None => EchoReply {
            text: serialize(message, Dialect::Markdown),
            dialect: Some(Dialect::Markdown),
        },
        Some(dialect) => EchoReply {
            text: message.text().to_string(),
            dialect: Some(dialect),
        },
    }
}

/// The raw-markup rendition shown when a message is toggled to a raw view.
///
/// Sent with no parse mode, so the author sees the markup characters
/// themselves and can copy them.
pub fn raw_view(message: &RichText, dialect: Dialect) -> String {
    serialize(message, dialect)
}
