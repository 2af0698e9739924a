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

//! Utilities for user-mention URIs.
//!
//! Chat platforms address an "inline mention" link at a user account rather
//! than a web resource, using a `tg://user?id=<numeric id>` URI as the link
//! target. This crate parses and constructs those URIs so that callers never
//! have to string-match them by hand.

use url::Url;

/// Scheme used by mention URIs.
pub const MENTION_SCHEME: &str = "tg";

/// Host component of a user-mention URI.
const MENTION_HOST: &str = "user";

/// A mention of a user account, addressed by numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mention {
    user_id: u64,
}

impl Mention {
    pub fn new(user_id: u64) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    /// The canonical URI form, e.g. `tg://user?id=93212972`.
    pub fn uri(&self) -> String {
        format!("{MENTION_SCHEME}://{MENTION_HOST}?id={}", self.user_id)
    }

    /// Parse a mention out of a URI.
    ///
    /// Returns `None` for anything that is not a well-formed user-mention
    /// URI: wrong scheme, wrong host, missing or non-numeric `id`.
    pub fn from_uri(uri: &str) -> Option<Mention> {
        let url = Url::parse(uri).ok()?;
        if url.scheme() != MENTION_SCHEME || url.host_str() != Some(MENTION_HOST) {
            return None;
        }
        let id = url
            .query_pairs()
            .find(|(key, _)| key == "id")
            .map(|(_, value)| value.into_owned())?;
        let user_id = id.parse::<u64>().ok()?;
        Some(Mention { user_id })
    }
}

/// Whether `uri` is a well-formed user-mention URI.
pub fn is_mention_uri(uri: &str) -> bool {
    Mention::from_uri(uri).is_some()
}
