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

//! `HttpResult`: the response-flavoured facade around `Outcome`.

use std::borrow::Cow;
use std::ops::BitOr;

use crate::error::ErrorCode;
use crate::headers::{ResponseHeaders, STATUS_LINE_KEY};
use crate::outcome::Outcome;
use crate::status::StatusCode;

/// A completed HTTP response: status, collected body (empty when a
/// streaming receiver consumed it), and parsed headers.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub(crate) status: StatusCode,
    pub(crate) body: Vec<u8>,
    pub(crate) headers: ResponseHeaders,
}

impl HttpResponse {
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}

/// The result of a terse or agent request: `Value` on a completed
/// transfer (any status code, including 4xx/5xx — those are not
/// errors), `Error` on a transport/backend failure or malformed
/// URL, `Exception` on a captured panic from inside the pipeline.
pub type HttpResult = Outcome<HttpResponse, ErrorCode>;

pub(crate) fn response_value(status: StatusCode, body: Vec<u8>, headers: ResponseHeaders) -> HttpResult {
    Outcome::Value(HttpResponse { status, body, headers })
}

impl HttpResult {
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Outcome::Value(r) => Some(r.status_code()),
            _ => None,
        }
    }

    pub fn response_body(&self) -> &[u8] {
        match self {
            Outcome::Value(r) => r.body(),
            _ => &[],
        }
    }

    /// Lossily decodes the body as UTF-8; empty for a non-`Value` outcome.
    pub fn response_body_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.response_body())
    }

    pub fn response_headers(&self) -> Option<&ResponseHeaders> {
        match self {
            Outcome::Value(r) => Some(r.headers()),
            _ => None,
        }
    }

    pub fn response_header(&self, name: &str) -> Option<&str> {
        self.response_headers().and_then(|h| h.get(name))
    }

    pub fn error(&self) -> Option<&ErrorCode> {
        match self {
            Outcome::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Best-effort human-readable failure description, in the
    /// preference order: the response's `http-status-line`
    /// header; the backend error's string; or an exception summary.
    pub fn error_message(&self) -> String {
        match self {
            Outcome::Value(r) => r
                .headers
                .get(STATUS_LINE_KEY)
                .map(|s| s.to_string())
                .unwrap_or_else(|| r.status.to_string()),
            Outcome::Error(e) => e.as_str().to_string(),
            Outcome::Exception(ex) => match ex.message() {
                Some(m) => format!("Exception : {}", m),
                None => "Unstringable exception".to_string(),
            },
        }
    }
}

/// `result | f` invokes `f` with the body decoded as text, passing an
/// empty string on failure — a shorthand for `then`-style
/// chaining when the caller only wants the body as text.
impl<F, R> BitOr<F> for HttpResult
where
    F: FnOnce(&str) -> R,
{
    type Output = R;

    fn bitor(self, f: F) -> R {
        let body = self.response_body_str().into_owned();
        f(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn ok_result(body: &str) -> HttpResult {
        let mut headers = ResponseHeaders::new();
        headers.feed_line("HTTP/1.1 200 OK");
        response_value(StatusCode::new(200), body.as_bytes().to_vec(), headers)
    }

    #[test]
    fn status_code_and_body_accessors() {
        let r = ok_result("hello");
        assert_eq!(r.status_code(), Some(StatusCode::new(200)));
        assert_eq!(r.response_body(), b"hello");
        assert_eq!(r.response_body_str(), "hello");
    }

    #[test]
    fn error_message_prefers_status_line() {
        let r = ok_result("hello");
        assert_eq!(r.error_message(), "HTTP/1.1 200 OK");
    }

    #[test]
    fn error_message_falls_back_to_backend_error() {
        let r: HttpResult = Outcome::Error(ErrorCode::new(-7, "connect failed"));
        assert_eq!(r.error_message(), "connect failed");
    }

    #[test]
    fn pipe_operator_invokes_with_body_text() {
        let r = ok_result("hello world");
        let len = r | (|s: &str| s.len());
        assert_eq!(len, 11);
    }
}
