//! The echo handler.
//!
//! # Design
//! `EchoHandler` is a unit struct: it carries no state, so any number of
//! invocations can run concurrently without synchronisation. `handle` is a
//! pure function of the request body. The method is accepted but never
//! inspected, so GET and POST behave identically.
//!
//! Bodies that are not valid UTF-8 are decoded lossily (invalid sequences
//! become U+FFFD) and still answered with `200`.

use std::borrow::Cow;

use crate::http::{HttpRequest, HttpResponse, TEXT_PLAIN};

/// Body returned when the request body is empty.
pub const EMPTY_BODY_PLACEHOLDER: &str = "(empty request body)";

/// Stateless request handler that echoes the request body as plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl EchoHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let text = decode_body(&request.body);
        let body = if text.is_empty() {
            EMPTY_BODY_PLACEHOLDER.to_string()
        } else {
            text.into_owned()
        };

        HttpResponse {
            status: 200,
            content_type: TEXT_PLAIN.to_string(),
            body,
        }
    }
}

/// Free-function form of [`EchoHandler::handle`], usable as a plain `fn`
/// pointer in routing tables.
pub fn echo(request: &HttpRequest) -> HttpResponse {
    EchoHandler.handle(request)
}

/// Decode `body` as UTF-8, replacing invalid sequences with U+FFFD.
///
/// Borrows when the input is already valid.
pub fn decode_body(body: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(body)
}
