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

//! The backend contract, expressed as two traits. No concrete
//! backend ships in this crate — a Windows system HTTP stack and a
//! POSIX-leaning HTTP library are both out of scope — but
//! `terse.rs` and `agent.rs` are written generic over `B: Backend` so a
//! downstream crate can plug either in at compile time.

use std::time::Duration;

use crate::config::{HttpVersion, ProxyConfig};
use crate::error::ErrorCode;
use crate::headers::RequestHeaders;
use crate::status::StatusCode;

/// HTTP request method, shared between the pipeline and the backend
/// adapter.
pub use crate::HttpMethod;

/// A live backend connection/session, scoped to one terse call or to
/// the lifetime of an `Agent`.
pub trait BackendSession: Sized {
    /// Initialises a session against `base_url` with the given proxy,
    /// timeout, and HTTP-version preferences.
    fn init(
        base_url: &str,
        proxy: Option<&ProxyConfig>,
        timeout: Option<Duration>,
        version: HttpVersion,
    ) -> Result<Self, ErrorCode>;

    /// Configures HTTP basic auth for subsequent requests on this session.
    fn set_basic_auth(&mut self, user: &str, pass: &str);

    /// Configures proxy auth for this session.
    fn set_proxy_auth(&mut self, user: &str, pass: &str);

    /// Toggles the backend's redirect-following policy.
    fn set_follow_redirects(&mut self, enabled: bool);

    /// Toggles automatic `gzip`/`deflate` (and backend-supported further
    /// encodings) decompression.
    fn set_automatic_decompression(&mut self, enabled: bool);

    /// Clears a method that may be sticky from a prior request on this
    /// session: before issuing a GET, the backend's method
    /// must be explicitly reset rather than relying on a default.
    fn reset_method_to_get(&mut self);
}

/// The per-request transfer operation.
pub trait Backend {
    type Session: BackendSession;

    /// Performs one request/response transfer on `session`.
    ///
    /// `on_chunk` is invoked once per arriving body chunk, in arrival
    /// order; `on_header_line` is invoked once per raw response header
    /// line (CRLF stripped, status line included).
    #[allow(clippy::too_many_arguments)]
    fn perform(
        session: &mut Self::Session,
        method: HttpMethod,
        url: &str,
        headers: &RequestHeaders,
        body: Option<&[u8]>,
        on_chunk: &mut dyn FnMut(&[u8]),
        on_header_line: &mut dyn FnMut(&str),
    ) -> Result<StatusCode, ErrorCode>;

    /// Process-wide initialisation required by some backends (the
    /// POSIX-leaning library in particular, needs "process-wide
    /// state"). Must be called at most once per process, before the
    /// first `BackendSession::init`. A backend with no such requirement
    /// returns `Ok(())` unconditionally.
    ///
    /// This crate does not call `global_init`/`global_cleanup` itself —
    /// no concrete backend is linked in — but an embedder wiring up a
    /// real backend must guard the call with something like
    /// `std::sync::Once`, and abort the process on failure rather than
    /// attempt to continue with an unusable backend.
    fn global_init() -> Result<(), ErrorCode> {
        Ok(())
    }

    /// Releases whatever `global_init` acquired. Called at most once,
    /// at normal process termination.
    fn global_cleanup() {}
}

#[cfg(test)]
pub(crate) mod test_backend {
    //! A minimal in-memory `Backend` used only by this crate's own
    //! pipeline tests. Not a reusable test harness — just enough to
    //! drive `terse.rs`/`agent.rs` without a real network stack.

    use super::*;
    use std::cell::RefCell;

    /// A scripted response returned by `StubSession::perform` in order.
    pub struct ScriptedResponse {
        pub status: u16,
        pub header_lines: Vec<String>,
        pub body: Vec<u8>,
    }

    pub struct StubSession {
        pub base_url: String,
        pub follow_redirects: bool,
        pub automatic_decompression: bool,
        pub basic_auth: Option<(String, String)>,
        pub method_reset_count: u32,
        pub script: RefCell<Vec<ScriptedResponse>>,
        pub last_request: RefCell<Option<(HttpMethod, String, Vec<(String, String)>, Option<Vec<u8>>)>>,
    }

    impl BackendSession for StubSession {
        fn init(
            base_url: &str,
            _proxy: Option<&ProxyConfig>,
            _timeout: Option<Duration>,
            _version: HttpVersion,
        ) -> Result<Self, ErrorCode> {
            Ok(StubSession {
                base_url: base_url.to_string(),
                follow_redirects: false,
                automatic_decompression: false,
                basic_auth: None,
                method_reset_count: 0,
                script: RefCell::new(Vec::new()),
                last_request: RefCell::new(None),
            })
        }

        fn set_basic_auth(&mut self, user: &str, pass: &str) {
            self.basic_auth = Some((user.to_string(), pass.to_string()));
        }

        fn set_proxy_auth(&mut self, _user: &str, _pass: &str) {}

        fn set_follow_redirects(&mut self, enabled: bool) {
            self.follow_redirects = enabled;
        }

        fn set_automatic_decompression(&mut self, enabled: bool) {
            self.automatic_decompression = enabled;
        }

        fn reset_method_to_get(&mut self) {
            self.method_reset_count += 1;
        }
    }

    pub struct StubBackend;

    impl Backend for StubBackend {
        type Session = StubSession;

        fn perform(
            session: &mut Self::Session,
            method: HttpMethod,
            url: &str,
            headers: &RequestHeaders,
            body: Option<&[u8]>,
            on_chunk: &mut dyn FnMut(&[u8]),
            on_header_line: &mut dyn FnMut(&str),
        ) -> Result<StatusCode, ErrorCode> {
            *session.last_request.borrow_mut() = Some((
                method,
                url.to_string(),
                headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
                body.map(|b| b.to_vec()),
            ));

            let scripted = session.script.borrow_mut().pop();
            let Some(resp) = scripted else {
                return Err(ErrorCode::new(-2, "no scripted response"));
            };

            for line in &resp.header_lines {
                on_header_line(line);
            }
            on_chunk(&resp.body);

            Ok(StatusCode::new(resp.status))
        }
    }
}
