//! Stateless echo handler core.
//!
//! # Overview
//! Turns an `HttpRequest` into an `HttpResponse` whose body is the request
//! body decoded as text, or `(empty request body)` when there is no body.
//! The host performs all I/O (host-does-IO pattern), which keeps the core
//! deterministic and testable.
//!
//! # Design
//! - `EchoHandler` holds no state; every call is independent.
//! - The handler never fails and never logs. Status is always `200` and the
//!   content type is always `text/plain`.
//! - Route registration is not part of this crate. Hosts own their routing
//!   table and point it at [`echo`] or [`EchoHandler::handle`].

pub mod error;
pub mod handler;
pub mod http;

pub use error::EchoError;
pub use handler::{echo, EchoHandler, EMPTY_BODY_PLACEHOLDER};
pub use http::{HttpMethod, HttpRequest, HttpResponse, TEXT_PLAIN};
