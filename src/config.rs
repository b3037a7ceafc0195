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

//! Configuration records, toggles, and auth/proxy types.

use std::time::Duration;

use crate::headers::RequestHeaders;

/// HTTP version preference.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum HttpVersion {
    #[default]
    Http1_1,
    Http2,
}

/// Basic-auth scheme selector.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum AuthScheme {
    #[default]
    None,
    Basic,
}

/// Basic-auth credentials. `scheme` other than `None` without
/// credentials is undefined behaviour.
#[derive(Clone, Debug, Default)]
pub struct Auth {
    pub scheme: AuthScheme,
    pub username: String,
    pub password: String,
}

impl Auth {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Auth {
        Auth {
            scheme: AuthScheme::Basic,
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Proxy scheme.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ProxyScheme {
    Http,
    Https,
    Socks4,
    Socks4a,
    Socks5,
    Socks5h,
}

/// Proxy configuration for a request or an agent session.
#[derive(Clone, Debug)]
pub struct ProxyConfig {
    pub scheme: ProxyScheme,
    pub address: String,
    pub auth: Option<Auth>,
}

/// Enable/disable toggle, used for `cookie_management`, `follow_redirects`,
/// and `automatic_decompression`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Toggle {
    Enable,
    Disable,
}

impl Toggle {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Toggle::Enable)
    }
}

/// Query parameters / extra headers / cookies are all represented as
/// ordered name/value pairs (insertion order matters for query string
/// construction and is preserved here, unlike the case-insensitive
/// header maps).
pub type Pairs = Vec<(String, String)>;

/// Configuration for a body-less GET-shaped request.
#[derive(Clone, Debug, Default)]
pub struct RequestConfigForGet {
    pub headers: RequestHeaders,
    pub params: Pairs,
    pub version: HttpVersion,
    pub timeout: Option<Duration>,
    pub auth: Auth,
    pub proxy: Option<ProxyConfig>,
}

/// Configuration for a body-bearing request; adds `content_type` over
/// `RequestConfigForGet`.
#[derive(Clone, Debug, Default)]
pub struct RequestConfig {
    pub headers: RequestHeaders,
    pub params: Pairs,
    pub version: HttpVersion,
    pub timeout: Option<Duration>,
    pub auth: Auth,
    pub proxy: Option<ProxyConfig>,
    pub content_type: Option<String>,
}

/// One-time configuration supplied when constructing an `Agent`.
#[derive(Clone, Debug, Default)]
pub struct AgentInitialConfig {
    pub version: HttpVersion,
    pub timeout: Option<Duration>,
    pub proxy: Option<ProxyConfig>,
}

/// Per-call streaming receiver: invoked with each arriving body chunk in
/// arrival order, in place of the default in-memory body collector.
pub type StreamingReceiver<'a> = &'a mut dyn FnMut(&[u8]);

/// Per-request configuration for an agent call.
#[derive(Default)]
pub struct AgentRequestConfig<'a> {
    pub content_type: Option<String>,
    pub headers: RequestHeaders,
    pub cookies: Pairs,
    pub params: Pairs,
    pub auth: Option<Auth>,
    pub streaming_receiver: Option<StreamingReceiver<'a>>,
}

impl<'a> AgentRequestConfig<'a> {
    pub fn new() -> Self {
        AgentRequestConfig::default()
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn cookie(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((key.into(), value.into()));
        self
    }

    pub fn content_type(mut self, ct: impl Into<String>) -> Self {
        self.content_type = Some(ct.into());
        self
    }

    pub fn streaming_receiver(mut self, f: StreamingReceiver<'a>) -> Self {
        self.streaming_receiver = Some(f);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_request_config_builder_chains() {
        let cfg = AgentRequestConfig::new()
            .header("Accept", "application/json")
            .param("id", "1")
            .cookie("session", "abc");

        assert_eq!(cfg.headers.get("Accept"), Some("application/json"));
        assert_eq!(cfg.params, vec![("id".to_string(), "1".to_string())]);
        assert_eq!(cfg.cookies, vec![("session".to_string(), "abc".to_string())]);
    }

    #[test]
    fn toggle_is_enabled() {
        assert!(Toggle::Enable.is_enabled());
        assert!(!Toggle::Disable.is_enabled());
    }
}
