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

//! # chttpp
//!
//! A high-level HTTP(S) client with two request modes on top of a
//! pluggable backend:
//!
//! * [`Terse`] — one-shot, stateless requests: each call opens a fresh
//!   backend session and tears it down when the transfer completes.
//! * [`Agent`] — a long-lived request context against a fixed base URL
//!   that retains cookies, default headers, and toggles across many
//!   calls.
//!
//! Both are generic over a `B: `[`Backend`] type parameter — this crate
//! defines the backend *contract* only; no concrete network backend
//! ships here (a Windows system HTTP stack and a POSIX-leaning HTTP
//! library are both out of scope). A downstream crate plugs in a
//! backend and gets `Terse::<MyBackend>::get(..)` /
//! `Agent::<MyBackend>::new(..)` for free.
//!
//! ## Terse mode
//!
//! No concrete `Backend` ships in this crate (see [`backend`]), so the
//! snippet below names a hypothetical `SomeBackend` a downstream crate
//! would provide:
//!
//! ```ignore
//! use chttpp::{Terse, RequestConfigForGet};
//!
//! let config = RequestConfigForGet::default();
//! let result = Terse::<SomeBackend>::get("https://api.example/status", &config);
//!
//! if let Some(status) = result.status_code() {
//!     println!("got {}", status);
//! }
//! ```
//!
//! ## Agent mode
//!
//! ```ignore
//! use chttpp::{Agent, AgentInitialConfig, AgentRequestConfig};
//!
//! let mut agent = Agent::<SomeBackend>::new("https://api.example/v1", AgentInitialConfig::default())
//!     .expect("valid base url");
//!
//! let result = agent.get("resources/42", AgentRequestConfig::new());
//! let body = result.response_body_str();
//! ```
//!
//! ## The outcome monad
//!
//! Every call returns an [`outcome::Outcome`] (aliased as
//! [`result::HttpResult`] for HTTP calls specifically): a response on
//! success, a backend [`ErrorCode`] on transport failure, or a captured
//! panic from inside a user continuation — never a silent empty value
//! and never an unwind across the pipeline boundary. See [`outcome`]
//! for the three-state design and its chaining combinators.
//!
//! # Future features
//! * A `multipart` body variant for the byte-sequence customisation point.

#![allow(dead_code)]

use std::fmt;

pub mod agent;
pub mod backend;
pub mod body;
pub mod config;
pub mod cookie;
pub mod error;
pub mod headers;
pub mod outcome;
pub mod result;
pub mod status;
pub mod terse;
pub mod url;

pub use agent::Agent;
pub use backend::{Backend, BackendSession};
pub use body::{AsByteSeq, LoadByteSeq, QueryContentType};
pub use config::{
    AgentInitialConfig, AgentRequestConfig, Auth, AuthScheme, HttpVersion, ProxyConfig, ProxyScheme,
    RequestConfig, RequestConfigForGet, Toggle,
};
pub use cookie::{Cookie, CookieRef, CookieStore};
pub use error::{Error, ErrorCode};
pub use headers::{RequestHeaders, ResponseHeaders};
pub use outcome::{CapturedException, Outcome};
pub use result::{HttpResponse, HttpResult};
pub use status::StatusCode;
pub use terse::Terse;
pub use url::UrlInfo;

/// HTTP request method.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum HttpMethod {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    CONNECT,
    OPTIONS,
    TRACE,
    PATCH,
}

impl HttpMethod {
    /// Whether a request with this method carries a body in this
    /// crate's pipeline: GET/HEAD/DELETE/OPTIONS/TRACE are
    /// body-less; POST/PUT/PATCH/CONNECT carry one.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::POST | Self::PUT | Self::PATCH | Self::CONNECT)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::GET => "GET",
                Self::HEAD => "HEAD",
                Self::POST => "POST",
                Self::PUT => "PUT",
                Self::DELETE => "DELETE",
                Self::CONNECT => "CONNECT",
                Self::OPTIONS => "OPTIONS",
                Self::TRACE => "TRACE",
                Self::PATCH => "PATCH",
            }
        )
    }
}

/// HTTP 100 CONTINUE status code
pub const HTTP_100_CONTINUE: u16 = 100;
/// HTTP 101 SWITCHING_PROTOCOLS status code
pub const HTTP_101_SWITCHING_PROTOCOLS: u16 = 101;
/// HTTP 200 OK status code
pub const HTTP_200_OK: u16 = 200;
/// HTTP 201 CREATED status code
pub const HTTP_201_CREATED: u16 = 201;
/// HTTP 202 ACCEPTED status code
pub const HTTP_202_ACCEPTED: u16 = 202;
/// HTTP 203 NON-AUTHORIZATIVE INFORMATION status code
pub const HTTP_203_NON_AUTHORIZATIVE_INFORMATION: u16 = 203;
/// HTTP 204 NO CONTENT status code
pub const HTTP_204_NO_CONTENT: u16 = 204;
/// HTTP 205 RESET CONTENT status code
pub const HTTP_205_RESET_CONTENT: u16 = 205;
/// HTTP 300 MULTIPLE CHOICES status code
pub const HTTP_300_MULTIPLE_CHOICES: u16 = 300;
/// HTTP 301 MOVED PERMANENTLY status code
pub const HTTP_301_MOVED_PERMANENTLY: u16 = 301;
/// HTTP 302 FOUND status code
pub const HTTP_302_FOUND: u16 = 302;
/// HTTP 303 SEE OTHER status code
pub const HTTP_303_SEE_OTHER: u16 = 303;
/// HTTP 305 RESET CONTENT status code
pub const HTTP_305_RESET_CONTENT: u16 = 305;
/// HTTP 307 TEMPORARY REDIRECT status code
pub const HTTP_307_TEMPORARY_REDIRECT: u16 = 307;
/// HTTP 400 BAD REQUEST status code
pub const HTTP_400_BAD_REQUEST: u16 = 400;
/// HTTP 401 UNAUTHORIZED status code
pub const HTTP_401_UNAUTHORIZED: u16 = 401;
/// HTTP 403 FORBIDDEN status code
pub const HTTP_403_FORBIDDEN: u16 = 403;
/// HTTP 404 NOT FOUND status code
pub const HTTP_404_NOT_FOUND: u16 = 404;
/// HTTP 405 METHOD NOT ALLOWED status code
pub const HTTP_405_METHOD_NOT_ALLOWED: u16 = 405;
/// HTTP 406 NOT ACCEPTABLE status code
pub const HTTP_406_NOT_ACCEPTABLE: u16 = 406;
/// HTTP 408 REQUEST_TIMEOUT status code
pub const HTTP_408_REQUEST_TIMEOUT: u16 = 408;
/// HTTP 409 CONFLICT status code
pub const HTTP_409_CONFLICT: u16 = 409;
/// HTTP 410 GONE status code
pub const HTTP_410_GONE: u16 = 410;
/// HTTP 411 LENGTH REQUIRED status code
pub const HTTP_411_LENGTH_REQUIRED: u16 = 411;
/// HTTP 413 PAYLOAD TOO LARGE status code
pub const HTTP_413_PAYLOAD_TOO_LARGE: u16 = 413;
/// HTTP 414 URI TOO LONG status code
pub const HTTP_414_URI_TOO_LONG: u16 = 414;
/// HTTP 415 UNSUPPORTED MEDIA TYPE status code
pub const HTTP_415_UNSUPPORTED_MEDIA_TYPE: u16 = 415;
/// HTTP 417 EXPECTATION FAILED status code
pub const HTTP_417_EXPECTATION_FAILED: u16 = 417;
/// HTTP 426 UPGRADE REQUIRED status code
pub const HTTP_426_UPGRADE_REQUIRED: u16 = 426;
/// HTTP 500 INTERNAL SERVER ERROR status code
pub const HTTP_500_INTERNAL_SERVER_ERROR: u16 = 500;
/// HTTP 501 NOT IMPLEMENTED status code
pub const HTTP_501_NOT_IMPLEMENTED: u16 = 501;
/// HTTP 502 BAD GATEWAY status code
pub const HTTP_502_BAD_GATEWAY: u16 = 502;
/// HTTP 503 SERVICE UNAVAILABLE status code
pub const HTTP_503_SERVICE_UNAVAILABLE: u16 = 503;
/// HTTP 504 GATEWAY TIMEOUT status code
pub const HTTP_504_GATEWAY_TIMEOUT: u16 = 504;
/// HTTP 505 HTTP VERSION NOT SUPPORTED status code
pub const HTTP_505_HTTP_VERSION_NOT_SUPPORTED: u16 = 505;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_display_matches_wire_token() {
        assert_eq!(HttpMethod::GET.to_string(), "GET");
        assert_eq!(HttpMethod::PATCH.to_string(), "PATCH");
    }

    #[test]
    fn body_bearing_methods() {
        assert!(HttpMethod::POST.has_body());
        assert!(HttpMethod::PUT.has_body());
        assert!(HttpMethod::PATCH.has_body());
        assert!(!HttpMethod::GET.has_body());
        assert!(!HttpMethod::DELETE.has_body());
    }

    #[test]
    fn status_constant_matches_predicate() {
        assert!(StatusCode::new(HTTP_200_OK).is_ok());
        assert!(StatusCode::new(HTTP_404_NOT_FOUND).is_not_found());
    }
}
