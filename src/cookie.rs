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

//! Cookie entity, store, Set-Cookie parser, and send-order construction.
//!
//! A cookie's identity is the `(name, domain, path)` triple; the store
//! is a jar keyed on that identity, with domain/path matching and a
//! deterministic send-order applied when building the `Cookie` header
//! for an outgoing request.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::{Duration, SystemTime};

/// A stored cookie. Equality and hashing are over the identity triple
/// `(name, domain, path)` only — value and attributes are not part of
/// identity.
#[derive(Clone, Debug)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    /// "session" cookies (no explicit expiry) use `SystemTime::UNIX_EPOCH
    /// + Duration::MAX`-equivalent sentinel: the farthest representable
    /// time, so they never compare as expired.
    pub expires: SystemTime,
    pub create_time: SystemTime,
}

fn session_expiry() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(u64::MAX / 2)
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Cookie {
        Cookie {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: "/".to_string(),
            secure: false,
            expires: session_expiry(),
            create_time: SystemTime::now(),
        }
    }

    fn identity(&self) -> (&str, &str, &str) {
        (&self.name, &self.domain, &self.path)
    }
}

impl PartialEq for Cookie {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}
impl Eq for Cookie {}

/// A lightweight view used only for send-order sorting: borrows name,
/// value, path length, and create-time from a stored `Cookie` or from a
/// transient `(name, value)` request-time pair.
#[derive(Clone, Debug)]
pub struct CookieRef<'a> {
    name: &'a str,
    value: &'a str,
    path_length: usize,
    create_time: SystemTime,
}

impl<'a> CookieRef<'a> {
    pub fn from_cookie(c: &'a Cookie) -> Self {
        CookieRef {
            name: &c.name,
            value: &c.value,
            path_length: c.path.len(),
            create_time: c.create_time,
        }
    }

    /// Builds a ref for an ad-hoc `(name, value)` pair supplied at
    /// request time. Its create-time is pinned to the farthest
    /// representable instant so that, at equal path length, it sorts
    /// after stored cookies with the same name.
    pub fn from_pair(name: &'a str, value: &'a str, path: &str) -> Self {
        CookieRef {
            name,
            value,
            path_length: path.len(),
            create_time: session_expiry(),
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn value(&self) -> &str {
        self.value
    }
}

impl<'a> PartialEq for CookieRef<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.path_length == other.path_length && self.create_time == other.create_time
    }
}
impl<'a> Eq for CookieRef<'a> {}

impl<'a> PartialOrd for CookieRef<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a> Ord for CookieRef<'a> {
    /// Name ascending, then path length **descending**, then create-time
    /// ascending — ascending order is send order (longest path first,
    /// then earliest creation).
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(other.name)
            .then_with(|| other.path_length.cmp(&self.path_length))
            .then_with(|| self.create_time.cmp(&other.create_time))
    }
}

/// A hash set of `Cookie`s keyed by the identity triple `(name, domain,
/// path)`. At most one cookie per triple.
#[derive(Clone, Debug, Default)]
pub struct CookieStore {
    // Keyed on the identity triple for O(1) lookup/replace; `Cookie`
    // also carries the triple so callers get it back out whole.
    cookies: HashMap<(String, String, String), Cookie>,
}

impl CookieStore {
    pub fn new() -> Self {
        CookieStore {
            cookies: HashMap::new(),
        }
    }

    fn key_of(name: &str, domain: &str, path: &str) -> (String, String, String) {
        (name.to_string(), domain.to_string(), path.to_string())
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Inserts or replaces a cookie by identity triple.
    pub fn insert(&mut self, cookie: Cookie) {
        let key = Self::key_of(&cookie.name, &cookie.domain, &cookie.path);
        self.cookies.insert(key, cookie);
    }

    /// Merges `other` into `self`. Cookies with `secure == true` are
    /// dropped if `base_is_https` is `false`.
    pub fn merge(&mut self, other: CookieStore, base_is_https: bool) {
        for (key, cookie) in other.cookies {
            if cookie.secure && !base_is_https {
                continue;
            }
            self.cookies.insert(key, cookie);
        }
    }

    pub fn find(&self, name: &str, domain: &str, path: &str) -> Option<&Cookie> {
        self.cookies.get(&Self::key_of(name, domain, path))
    }

    pub fn erase_by<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&Cookie) -> bool,
    {
        let before = self.cookies.len();
        self.cookies.retain(|_, c| !pred(c));
        before - self.cookies.len()
    }

    /// Erases every cookie whose `expires` strictly precedes `now`.
    pub fn remove_expired_cookies(&mut self) -> usize {
        let now = SystemTime::now();
        self.erase_by(|c| c.expires < now)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.values()
    }

    /// Domain match: empty cookie domain always matches;
    /// otherwise `host` must end with `domain`, either exactly or with
    /// a `.` boundary, and the `.` boundary case requires a non-IP host.
    fn domain_matches(cookie_domain: &str, host: &str, host_is_ip: bool) -> bool {
        if cookie_domain.is_empty() {
            return true;
        }
        if !host.ends_with(cookie_domain) {
            return false;
        }
        if host.len() == cookie_domain.len() {
            return true;
        }
        let suffix_pos = host.len() - cookie_domain.len() - 1;
        host.as_bytes()[suffix_pos] == b'.' && !host_is_ip
    }

    /// Path match.
    fn path_matches(cookie_path: &str, request_path: &str) -> bool {
        if !request_path.starts_with(cookie_path) {
            return false;
        }
        cookie_path.len() == request_path.len()
            || cookie_path.ends_with('/')
            || request_path.as_bytes()[cookie_path.len()] == b'/'
    }

    /// Builds the send-order list for a request against `host`
    /// (authority, e.g. "example.com:8080" — matched on the stripped
    /// host form by the caller), `request_path`, `is_https`, and
    /// `host_is_ip`, merging in ad-hoc `(name, value)` pairs supplied at
    /// request time (treated as always matching).
    pub fn build_send_list<'a>(
        &'a self,
        host: &str,
        request_path: &str,
        is_https: bool,
        host_is_ip: bool,
        extra: &'a [(String, String)],
    ) -> Vec<CookieRef<'a>> {
        let mut out: Vec<CookieRef<'a>> = self
            .cookies
            .values()
            .filter(|c| {
                if c.secure && !is_https {
                    return false;
                }
                if !Self::domain_matches(&c.domain, host, host_is_ip) {
                    return false;
                }
                Self::path_matches(&c.path, request_path)
            })
            .map(CookieRef::from_cookie)
            .collect();

        for (name, value) in extra {
            out.push(CookieRef::from_pair(name, value, request_path));
        }

        out.sort();
        out
    }

    /// Parses a (possibly `"; "`-merged) `Set-Cookie` header value and
    /// inserts/updates the resulting cookie(s).
    pub fn insert_from_set_cookie(&mut self, set_cookie_value: &str, default_domain: &str) {
        for cookie in parse_set_cookie(set_cookie_value, default_domain) {
            self.commit(cookie);
        }
    }

    fn commit(&mut self, parsed: ParsedCookie) {
        let key = Self::key_of(&parsed.name, &parsed.domain, &parsed.path);
        if let Some(existing) = self.cookies.get_mut(&key) {
            existing.value = parsed.value;
            existing.expires = parsed.expires;
            existing.secure = parsed.secure;
        } else {
            self.cookies.insert(
                key,
                Cookie {
                    name: parsed.name,
                    value: parsed.value,
                    domain: parsed.domain,
                    path: parsed.path,
                    secure: parsed.secure,
                    expires: parsed.expires,
                    create_time: SystemTime::now(),
                },
            );
        }
    }
}

struct ParsedCookie {
    name: String,
    value: String,
    domain: String,
    path: String,
    secure: bool,
    expires: SystemTime,
}

const ATTRIBUTE_NAMES: [&str; 7] = ["Expires", "Max-Age", "Domain", "Secure", "Path", "HttpOnly", "SameSite"];

fn is_attribute_name(name: &str) -> bool {
    ATTRIBUTE_NAMES.contains(&name)
}

/// Parses one `Set-Cookie` header value (possibly several cookies
/// joined by `"; "`) into a list of committed cookies.
fn parse_set_cookie(value: &str, default_domain: &str) -> Vec<ParsedCookie> {
    let mut results = Vec::new();
    let mut current: Option<ParsedCookie> = None;

    for raw_segment in value.split(';') {
        let segment = raw_segment.trim_start_matches(' ');

        let (seg_name, seg_value) = match segment.find('=') {
            Some(eq) => (segment[..eq].trim_end_matches(' '), Some(segment[eq + 1..].trim_end_matches(' '))),
            None => (segment.trim_end_matches(' '), None),
        };

        if seg_name.is_empty() && seg_value.is_none() {
            continue;
        }

        let is_attr = is_attribute_name(seg_name);

        if is_attr {
            match current.as_mut() {
                Some(cookie) => apply_attribute(cookie, seg_name, seg_value),
                // An attribute-shaped segment before any body is dropped.
                None => {}
            }
            continue;
        }

        // A segment without '=' (and not attribute-shaped) is dropped.
        let Some(seg_value) = seg_value else { continue };

        // Non-attribute segment: commit the current cookie (if any) and
        // start a new one.
        if let Some(cookie) = current.take() {
            results.push(cookie);
        }

        current = Some(ParsedCookie {
            name: seg_name.to_string(),
            value: seg_value.to_string(),
            domain: default_domain.to_string(),
            path: "/".to_string(),
            secure: false,
            expires: session_expiry(),
        });
    }

    if let Some(cookie) = current.take() {
        results.push(cookie);
    }

    results
}

fn apply_attribute(cookie: &mut ParsedCookie, name: &str, value: Option<&str>) {
    match name {
        "Expires" => {
            cookie.expires = match value.and_then(|v| httpdate::parse_http_date(v).ok()) {
                Some(t) => t,
                None => SystemTime::now(),
            };
        }
        "Max-Age" => {
            cookie.expires = match value.and_then(|v| v.parse::<u64>().ok()) {
                Some(secs) => SystemTime::now() + Duration::from_secs(secs),
                // Negative/unparseable Max-Age defaults to "now" per
                // except this parser only accepts
                // unsigned integers in the first place: a literal
                // negative Max-Age (e.g. "-1") fails `parse::<u64>`
                // and is treated as "now", while a negative value is
                // never treated as an immediate-expiry signal beyond
                // that (see DESIGN.md Open Question).
                None => SystemTime::now(),
            };
        }
        "Domain" => {
            if let Some(v) = value {
                cookie.domain = v.to_string();
            }
        }
        "Path" => {
            if let Some(v) = value {
                cookie.path = v.to_string();
            }
        }
        "Secure" => cookie.secure = true,
        "HttpOnly" | "SameSite" => {}
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_identity_round_trip() {
        let mut store = CookieStore::new();
        store.insert_from_set_cookie("name=value1", "example.com");
        store.insert_from_set_cookie("name=value2; Path=/x", "example.com");

        assert_eq!(store.len(), 2);
        let c1 = store.find("name", "example.com", "/").unwrap();
        assert_eq!(c1.value, "value1");
        let c2 = store.find("name", "example.com", "/x").unwrap();
        assert_eq!(c2.value, "value2");

        store.insert_from_set_cookie("name=value3", "example.com");
        assert_eq!(store.len(), 2);
        let c1b = store.find("name", "example.com", "/").unwrap();
        assert_eq!(c1b.value, "value3");
    }

    #[test]
    fn at_most_one_cookie_per_identity_triple() {
        let mut store = CookieStore::new();
        store.insert(Cookie::new("a", "1"));
        store.insert(Cookie::new("a", "2"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.find("a", "", "/").unwrap().value, "2");
    }

    #[test]
    fn remove_expired_cookies_removes_only_past_expiry() {
        let mut store = CookieStore::new();
        let mut expired = Cookie::new("old", "v");
        expired.expires = SystemTime::now() - Duration::from_secs(10);
        store.insert(expired);

        let fresh = Cookie::new("new", "v");
        store.insert(fresh);

        store.remove_expired_cookies();
        assert_eq!(store.len(), 1);
        assert!(store.find("new", "", "/").is_some());
        assert!(store.find("old", "", "/").is_none());
    }

    #[test]
    fn send_order_longest_path_first_then_earliest_create_time() {
        // All three cookies use an empty domain (matches any host) and
        // distinct paths, which keeps the identity triples distinct
        // while leaving domain out of the CookieRef ordering entirely.
        let mut store = CookieStore::new();

        store.insert(Cookie {
            name: "k".to_string(),
            value: "root".to_string(),
            domain: "".to_string(),
            path: "/".to_string(),
            secure: false,
            expires: session_expiry(),
            create_time: SystemTime::now(),
        });
        store.insert(Cookie {
            name: "k".to_string(),
            value: "abc".to_string(),
            domain: "".to_string(),
            path: "/abc/".to_string(),
            secure: false,
            expires: session_expiry(),
            create_time: SystemTime::now(),
        });
        store.insert(Cookie {
            name: "k".to_string(),
            value: "abcdef".to_string(),
            domain: "".to_string(),
            path: "/abc/def/".to_string(),
            secure: false,
            expires: session_expiry(),
            create_time: SystemTime::now(),
        });

        let list = store.build_send_list("host", "/abc/def/", true, false, &[]);
        let values: Vec<&str> = list.iter().map(|r| r.value()).collect();
        assert_eq!(values, vec!["abcdef", "abc", "root"]);
    }

    #[test]
    fn send_list_includes_ad_hoc_pairs_sorted_after_stored_cookies() {
        let mut store = CookieStore::new();
        store.insert(Cookie::new("s", "stored"));

        let extra = vec![("s".to_string(), "adhoc".to_string())];
        let list = store.build_send_list("host", "/", true, false, &extra);

        // Same name, same path length ("/" for both): the ad-hoc pair's
        // pinned create-time must sort it after the stored cookie, not
        // before, and building the list must not panic.
        let values: Vec<&str> = list.iter().map(|r| r.value()).collect();
        assert_eq!(values, vec!["stored", "adhoc"]);
    }

    #[test]
    fn domain_match_rules() {
        // For cookie domain "example.com": an exactly-matching host and
        // any subdomain of it match; a host that merely ends with the
        // same characters without a '.' boundary does not.
        assert!(CookieStore::domain_matches("", "anything.com", false));
        assert!(CookieStore::domain_matches("example.com", "example.com", false));
        assert!(CookieStore::domain_matches("example.com", "aaa.example.com", false));
        assert!(CookieStore::domain_matches("example.com", "bbb.aaa.example.com", false));
        assert!(!CookieStore::domain_matches("example.com", "notexample.com", false));
        assert!(!CookieStore::domain_matches("example.com", "other.org", false));

        // The '.'-boundary suffix match is suppressed for IP hosts.
        assert!(!CookieStore::domain_matches("2.3.4", "1.2.3.4", true));
    }

    #[test]
    fn path_match_rules() {
        assert!(CookieStore::path_matches("/", "/abc/def"));
        assert!(CookieStore::path_matches("/abc/", "/abc/def"));
        assert!(CookieStore::path_matches("/abc", "/abc/def"));
        assert!(!CookieStore::path_matches("/abc/def/ghi", "/abc/def"));
        assert!(!CookieStore::path_matches("/abcdef", "/abc/def"));
    }

    #[test]
    fn secure_cookie_dropped_when_merging_into_non_https_agent() {
        let mut secure_batch = CookieStore::new();
        let mut c = Cookie::new("s", "v");
        c.secure = true;
        secure_batch.insert(c);

        let mut into = CookieStore::new();
        into.merge(secure_batch, false);
        assert!(into.is_empty());
    }
}
