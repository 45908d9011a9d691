//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The host owns the socket, buffers
//! the body into an `HttpRequest`, hands it to the handler and writes the
//! returned `HttpResponse` back out. The core never touches the network.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::EchoError;

/// Content type of every response produced by the core.
pub const TEXT_PLAIN: &str = "text/plain";

/// HTTP method accepted by the echo route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = EchoError;

    /// Method tokens are case-sensitive, as in HTTP itself.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            other => Err(EchoError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// An inbound request described as plain data.
///
/// Only the pieces the handler looks at are carried: the method and the raw,
/// fully buffered body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method,
            body: body.into(),
        }
    }
}

/// An outbound response described as plain data.
///
/// Produced by the handler and handed to the host, which is responsible for
/// writing the status line, the `Content-Type` header and the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parses_canonical_tokens() {
        assert_eq!("GET".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("POST".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
    }

    #[test]
    fn method_rejects_other_tokens() {
        let err = "PUT".parse::<HttpMethod>().unwrap_err();
        assert!(matches!(err, EchoError::UnsupportedMethod(ref m) if m == "PUT"));

        // lower-case is not a valid method token
        assert!("get".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn method_display_matches_parse() {
        for method in [HttpMethod::Get, HttpMethod::Post] {
            assert_eq!(method.to_string().parse::<HttpMethod>().unwrap(), method);
        }
    }

    #[test]
    fn method_deserializes_from_upper_case() {
        let method: HttpMethod = serde_json::from_str(r#""POST""#).unwrap();
        assert_eq!(method, HttpMethod::Post);
    }
}
