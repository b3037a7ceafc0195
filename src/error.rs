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

//! Backend error codes and the crate's public error type.

use std::fmt;
use std::panic::Location;

/// A backend-native error value plus the source location where it was raised.
///
/// Default construction denotes "no error" (the zero code, with a
/// location pointing at the call to `ErrorCode::default`).
#[derive(Clone, Debug)]
pub struct ErrorCode {
    code: i64,
    message: &'static str,
    location: &'static Location<'static>,
}

impl ErrorCode {
    /// Builds an `ErrorCode`, capturing the caller's location.
    #[track_caller]
    pub fn new(code: i64, message: &'static str) -> Self {
        ErrorCode {
            code,
            message,
            location: Location::caller(),
        }
    }

    /// The canonical "url malformed" error, used when a request is
    /// attempted against an invalid `UrlInfo`.
    #[track_caller]
    pub fn malformed_url() -> Self {
        ErrorCode::new(-1, "url malformed")
    }

    /// The backend-native error value.
    pub fn code(&self) -> i64 {
        self.code
    }

    /// The call site where this error was produced.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Stringifies the backend error value. Backends that wrap a native
    /// error type are expected to provide a richer message via `new`;
    /// this is the fallback human-readable form.
    pub fn as_str(&self) -> &'static str {
        self.message
    }
}

impl Default for ErrorCode {
    #[track_caller]
    fn default() -> Self {
        ErrorCode::new(0, "no error")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {}, at {}:{})", self.message, self.code, self.location.file(), self.location.line())
    }
}

impl PartialEq for ErrorCode {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

/// Top-level error type for operations that fail before an outcome can
/// even be constructed (e.g. building a request on an invalid URL).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Backend(#[from] ErrorCodeError),
    #[error("malformed url: {0}")]
    MalformedUrl(String),
}

/// Wrapper so `ErrorCode` (which intentionally isn't `std::error::Error`,
/// to keep it a plain data carrier) can be used with `thiserror`'s
/// `#[from]`.
#[derive(Debug)]
pub struct ErrorCodeError(pub ErrorCode);

impl fmt::Display for ErrorCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorCodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_no_error() {
        let e = ErrorCode::default();
        assert_eq!(e.code(), 0);
        assert_eq!(e.as_str(), "no error");
    }

    #[test]
    fn malformed_url_has_expected_code_name() {
        let e = ErrorCode::malformed_url();
        assert_eq!(e.as_str(), "url malformed");
    }
}
