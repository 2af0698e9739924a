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

//! Strict parsers for the raw markup dialects.
//!
//! These are deliberately not general markdown/HTML grammars: each accepts
//! exactly the subset its serializer emits, and rejects everything else
//! with the byte offset of the offending character, so that an author's
//! typo can be pointed at rather than silently swallowed.

pub mod html;
pub mod markdown;
