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

//! HTTP status code wrapper with category and single-code predicates.

use std::fmt;

/// Wraps a 16-bit HTTP status code.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StatusCode(u16);

impl StatusCode {
    /// Builds a `StatusCode` from a raw value.
    pub fn new(code: u16) -> Self {
        StatusCode(code)
    }

    /// The raw numeric code.
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// 1xx.
    pub fn is_informational(&self) -> bool {
        (100..200).contains(&self.0)
    }

    /// 2xx.
    pub fn is_successful(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// 3xx.
    pub fn is_redirection(&self) -> bool {
        (300..400).contains(&self.0)
    }

    /// 4xx.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// 5xx.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }

    pub fn is_ok(&self) -> bool {
        self.0 == 200
    }

    pub fn is_found(&self) -> bool {
        self.0 == 302
    }

    pub fn is_unauthorized(&self) -> bool {
        self.0 == 401
    }

    pub fn is_forbidden(&self) -> bool {
        self.0 == 403
    }

    pub fn is_not_found(&self) -> bool {
        self.0 == 404
    }

    pub fn is_request_timeout(&self) -> bool {
        self.0 == 408
    }

    pub fn is_internal_server_error(&self) -> bool {
        self.0 == 500
    }

    pub fn is_service_unavailable(&self) -> bool {
        self.0 == 503
    }
}

impl From<u16> for StatusCode {
    fn from(v: u16) -> Self {
        StatusCode(v)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert!(StatusCode::new(101).is_informational());
        assert!(StatusCode::new(200).is_successful());
        assert!(StatusCode::new(302).is_redirection());
        assert!(StatusCode::new(404).is_client_error());
        assert!(StatusCode::new(503).is_server_error());
    }

    #[test]
    fn single_code_predicates() {
        assert!(StatusCode::new(200).is_ok());
        assert!(StatusCode::new(302).is_found());
        assert!(StatusCode::new(401).is_unauthorized());
        assert!(StatusCode::new(403).is_forbidden());
        assert!(StatusCode::new(404).is_not_found());
        assert!(StatusCode::new(408).is_request_timeout());
        assert!(StatusCode::new(500).is_internal_server_error());
        assert!(StatusCode::new(503).is_service_unavailable());
        assert!(!StatusCode::new(200).is_not_found());
    }
}
