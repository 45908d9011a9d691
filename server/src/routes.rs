//! Explicit routing table for the host.
//!
//! # Design
//! Routes are registered once at start-up as `(path, method set, handler)`
//! entries and then frozen into an axum `Router`. Handlers are plain
//! `fn(&HttpRequest) -> HttpResponse` pointers from the core crate, so the
//! table holds no state and is cheap to clone into per-route closures.

use axum::{
    body::Bytes,
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{on, MethodFilter},
    Router,
};
use echo_core::{HttpMethod, HttpRequest, HttpResponse};
use thiserror::Error;
use tracing::warn;

/// Signature of every routable handler.
pub type HandlerFn = fn(&HttpRequest) -> HttpResponse;

#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    pub methods: Vec<HttpMethod>,
    pub handler: HandlerFn,
}

/// Result of [`RouteTable::lookup`].
#[derive(Debug, Clone, Copy)]
pub enum RouteMatch {
    Found(HandlerFn),
    MethodNotAllowed,
    NotFound,
}

/// Registrations that the router could not honour.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route {0} has no methods")]
    EmptyMethodSet(String),

    #[error("{1} {0} is already registered")]
    DuplicateMethod(String, HttpMethod),
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard table: `GET`/`POST` on `/<prefix>/echo`.
    pub fn echo(prefix: &str) -> Self {
        Self {
            routes: vec![Route {
                path: route_path(prefix, "echo"),
                methods: vec![HttpMethod::Get, HttpMethod::Post],
                handler: echo_core::echo,
            }],
        }
    }

    /// Add a route. A path may be registered more than once as long as the
    /// method sets do not overlap; the router merges them like `lookup` does.
    pub fn register(
        &mut self,
        path: &str,
        methods: &[HttpMethod],
        handler: HandlerFn,
    ) -> Result<(), RouteError> {
        if methods.is_empty() {
            return Err(RouteError::EmptyMethodSet(path.to_string()));
        }
        for method in methods {
            if matches!(self.lookup(path, *method), RouteMatch::Found(_)) {
                return Err(RouteError::DuplicateMethod(path.to_string(), *method));
            }
        }

        let mut unique = Vec::with_capacity(methods.len());
        for method in methods {
            if !unique.contains(method) {
                unique.push(*method);
            }
        }
        self.routes.push(Route {
            path: path.to_string(),
            methods: unique,
            handler,
        });
        Ok(())
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn lookup(&self, path: &str, method: HttpMethod) -> RouteMatch {
        let mut path_known = false;
        for route in self.routes.iter().filter(|r| r.path == path) {
            if route.methods.contains(&method) {
                return RouteMatch::Found(route.handler);
            }
            path_known = true;
        }
        if path_known {
            RouteMatch::MethodNotAllowed
        } else {
            RouteMatch::NotFound
        }
    }

    /// Freeze the table into an axum router.
    ///
    /// Routes sharing a path are merged into one method router. Bodies are
    /// buffered whole, with axum's default size limit turned off.
    pub fn into_router(self) -> Router {
        let router = self.routes.into_iter().fold(Router::new(), |router, route| {
            // `register` guarantees at least one method
            let Some(filter) = route
                .methods
                .iter()
                .map(|m| method_filter(*m))
                .reduce(MethodFilter::or)
            else {
                return router;
            };
            let handler = route.handler;
            router.route(
                &route.path,
                on(filter, move |method: Method, body: Bytes| invoke(handler, method, body)),
            )
        });
        router.layer(DefaultBodyLimit::disable())
    }
}

/// Join a route prefix and a route name into an absolute path.
///
/// Surrounding slashes on the prefix are ignored, so `"api"`, `"/api"` and
/// `"/api/"` all give `/api/<name>`.
pub fn route_path(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("/{name}")
    } else {
        format!("/{prefix}/{name}")
    }
}

fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Post => MethodFilter::POST,
    }
}

/// Map an axum method onto the core's method set. `HEAD` is served as `GET`.
fn core_method(method: &Method) -> Option<HttpMethod> {
    match *method {
        Method::GET | Method::HEAD => Some(HttpMethod::Get),
        Method::POST => Some(HttpMethod::Post),
        _ => None,
    }
}

async fn invoke(handler: HandlerFn, method: Method, body: Bytes) -> Response {
    let Some(method) = core_method(&method) else {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    };
    if std::str::from_utf8(&body).is_err() {
        warn!(%method, len = body.len(), "request body is not valid UTF-8, decoding lossily");
    }

    let request = HttpRequest::new(method, body.to_vec());
    into_axum(handler(&request))
}

fn into_axum(response: HttpResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, response.content_type)],
        response.body,
    )
        .into_response()
}
