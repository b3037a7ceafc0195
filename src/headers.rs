// Copyright 2021 Juan A. Cáceres (cacexp@gmail.com)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Response header parsing and the case-insensitive header map
//! used on the request/agent side.

use case_insensitive_hashmap::CaseInsensitiveHashMap;
use unicase::UniCase;

/// Fixed key under which the `HTTP ...` status line is stored.
pub const STATUS_LINE_KEY: &str = "http-status-line";

type CaseInsensitiveString = UniCase<String>;

/// Case-insensitive, ordered-by-nothing request-side header map. Used
/// for request headers and agent default headers.
#[derive(Clone, Debug, Default)]
pub struct RequestHeaders(CaseInsensitiveHashMap<String>);

impl RequestHeaders {
    pub fn new() -> Self {
        RequestHeaders(CaseInsensitiveHashMap::new())
    }

    /// Inserts a header, returning `true` if a previous value was
    /// overridden.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> bool
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(CaseInsensitiveString::new(key.into()), value.into()).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().next().is_none()
    }

    /// Overlays `other` onto `self`, `other` winning on key collisions
    /// (used to apply per-request headers over agent defaults).
    pub fn overlay(&mut self, other: &RequestHeaders) {
        for (k, v) in other.iter() {
            self.insert(k.to_string(), v.to_string());
        }
    }
}

/// A lowercase-keyed, merge-on-duplicate multimap built incrementally
/// from raw response header lines.
#[derive(Clone, Debug, Default)]
pub struct ResponseHeaders {
    map: std::collections::HashMap<String, String>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        ResponseHeaders {
            map: std::collections::HashMap::new(),
        }
    }

    /// Feeds one raw, CRLF-stripped header line.
    pub fn feed_line(&mut self, line: &str) {
        if line.len() >= 4 && line[..4].eq_ignore_ascii_case("http") {
            self.map.insert(STATUS_LINE_KEY.to_string(), line.to_string());
            return;
        }

        let Some(colon) = line.find(':') else {
            return;
        };

        let name = line[..colon].to_ascii_lowercase();
        let value = line[colon + 1..].trim_start_matches(' ').to_string();

        self.insert_merge(name, value);
    }

    fn insert_merge(&mut self, name: String, value: String) {
        let separator = if name == "set-cookie" { "; " } else { ", " };
        match self.map.get_mut(&name) {
            Some(existing) => {
                existing.push_str(separator);
                existing.push_str(&value);
            }
            None => {
                self.map.insert(name, value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(&name.to_ascii_lowercase()).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_merge_uses_comma_for_plain_headers() {
        let mut h = ResponseHeaders::new();
        h.feed_line("Vary: Accept-Encoding");
        h.feed_line("Vary: User-Agent");
        assert_eq!(h.get("vary"), Some("Accept-Encoding, User-Agent"));
    }

    #[test]
    fn duplicate_merge_uses_semicolon_for_set_cookie() {
        let mut h = ResponseHeaders::new();
        h.feed_line("Set-Cookie: a=1; Path=/");
        h.feed_line("Set-Cookie: b=2");
        assert_eq!(h.get("set-cookie"), Some("a=1; Path=/; b=2"));
    }

    #[test]
    fn keys_are_canonicalised_to_lowercase() {
        let mut h = ResponseHeaders::new();
        h.feed_line("Content-Type: text/plain");
        assert!(h.iter().all(|(k, _)| k.chars().all(|c| !c.is_ascii_uppercase())));
    }

    #[test]
    fn status_line_stored_verbatim() {
        let mut h = ResponseHeaders::new();
        h.feed_line("HTTP/1.1 200 OK");
        assert_eq!(h.get(STATUS_LINE_KEY), Some("HTTP/1.1 200 OK"));
    }

    #[test]
    fn request_headers_are_case_insensitive() {
        let mut h = RequestHeaders::new();
        h.insert("Content-Type", "application/json");
        assert_eq!(h.get("content-type"), Some("application/json"));
        assert!(h.insert("content-Type", "text/plain"));
        assert_eq!(h.get("Content-type"), Some("text/plain"));
    }

    #[test]
    fn overlay_overrides_by_name() {
        let mut defaults = RequestHeaders::new();
        defaults.insert("Accept", "*/*");
        defaults.insert("X-Default", "1");

        let mut per_request = RequestHeaders::new();
        per_request.insert("Accept", "application/json");

        defaults.overlay(&per_request);

        assert_eq!(defaults.get("Accept"), Some("application/json"));
        assert_eq!(defaults.get("X-Default"), Some("1"));
    }
}
