//! Error types for the echo core.
//!
//! # Design
//! `EchoHandler::handle` has no failure path. The only fallible operation in
//! the core is turning a method token supplied by a host into `HttpMethod`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EchoError {
    /// The method token is neither `GET` nor `POST`.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
}
