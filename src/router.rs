//! A small request router with `:name` parameter capture.
//!
//! Routes are searched in the order they were added. A route path may
//! contain `:name` segments which capture the matching segments of the
//! request path. This is deliberately the whole routing vocabulary:
//! anything fancier belongs in the application.

use std::collections::BTreeMap;

use enums::Status;
use header_field::Id;
use request::RxRequest;
use response::TxResponse;
use uri::RequestUri;

/// Route parameters captured from the request path.
pub type Parameters = BTreeMap<String, String>;

/// An HTTP request handler function.
///
/// Receives the request, the captured route parameters and the request
/// body; fills in the response body and returns the response head.
pub type Handler = Box<Fn(&RxRequest, &Parameters, &[u8], &mut Vec<u8>)
    -> TxResponse>;

/// Get the route parameters from `uri_path` given `route_path`.
///
/// Returns an empty map if the route has no parameters or if the paths
/// do not agree.
pub fn get_route_parameters(uri_path: &str, route_path: &str)
    -> Parameters
{
    let mut parameters = Parameters::new();

    let param_start = match route_path.find(':') {
        Some(start) if start <= uri_path.len() => start,
        _ => return parameters,
    };

    // walk the segments of both paths from the first parameter on
    let names = route_path[param_start..].split('/');
    let values: Vec<&str> = uri_path[param_start..].split('/').collect();
    let names: Vec<&str> = names.collect();
    if names.len() != values.len() {
        return parameters;
    }

    for (&name, &value) in names.iter().zip(values.iter()) {
        if name.starts_with(':') {
            parameters.insert(name[1..].to_string(), value.to_string());
        } else if name != value {
            return Parameters::new();
        }
    }
    parameters
}

/// Get the route parameter with the given name, blank if not found.
pub fn get_parameter<'a>(params: &'a Parameters, name: &str) -> &'a str {
    params.get(name).map(|v| &v[..]).unwrap_or("")
}

struct Route {
    /// The route path including `:` parameters, if any.
    path: String,
    /// The route path up to the first `:` parameter, if any.
    search_path: String,
    /// The map of HTTP methods to request handlers.
    method_handlers: BTreeMap<String, Handler>,
}

impl Route {
    fn new(path: &str, method: &str, handler: Handler) -> Route {
        let search_path = match path.find(':') {
            Some(start) => path[..start].to_string(),
            None => path.to_string(),
        };
        let mut method_handlers = BTreeMap::new();
        method_handlers.insert(method.to_string(), handler);
        Route {
            path: path.to_string(),
            search_path: search_path,
            method_handlers: method_handlers,
        }
    }

    /// Whether the route has `:` parameters.
    fn has_parameters(&self) -> bool {
        self.path.len() != self.search_path.len()
    }

    /// The methods registered for this route, for an `Allow` header.
    fn allowed_methods(&self) -> String {
        let mut text = String::new();
        for method in self.method_handlers.keys() {
            if !text.is_empty() {
                text.push_str(", ");
            }
            text.push_str(method);
        }
        text
    }
}

/// The routes to search for an HTTP request.
///
/// ```rust,ignore
/// let mut router = RequestRouter::new();
/// router.add_method("GET", "/hello/:name", Box::new(hello_handler));
/// let response = router.handle_request(&request, body, &mut response_body);
/// ```
pub struct RequestRouter {
    routes: Vec<Route>,
}

impl RequestRouter {
    pub fn new() -> RequestRouter {
        RequestRouter { routes: Vec::new() }
    }

    /// Add a method and its handler to the given path, creating the
    /// route if it does not exist yet.
    ///
    /// The path may contain `:name` segments to capture parameters
    /// from the request path. Returns true if the path is new.
    pub fn add_method<M: AsRef<str>>(&mut self, method: M, path: &str,
        handler: Handler)
        -> bool
    {
        let method = method.as_ref();
        if let Some(route) =
            self.routes.iter_mut().find(|r| r.path == path)
        {
            route.method_handlers.insert(method.to_string(), handler);
            return false;
        }
        self.routes.push(Route::new(path, method, handler));
        true
    }

    fn find_route(&self, uri_path: &str)
        -> Option<(&Route, Parameters)>
    {
        for route in &self.routes {
            if !uri_path.contains(&route.search_path) {
                continue;
            }
            if route.has_parameters() {
                let parameters =
                    get_route_parameters(uri_path, &route.path);
                if !parameters.is_empty() {
                    return Some((route, parameters));
                }
            } else if uri_path.len() == route.search_path.len() {
                return Some((route, Parameters::new()));
            }
        }
        None
    }

    /// Route a request to its registered handler.
    ///
    /// Returns `404 Not Found` when no route matches the path, and
    /// `405 Method Not Allowed` with an `Allow` header when a route
    /// matches but has no handler for the request's method.
    pub fn handle_request(&self, request: &RxRequest, body: &[u8],
        response_body: &mut Vec<u8>)
        -> TxResponse
    {
        let uri = RequestUri::new(request.uri());

        let (route, parameters) = match self.find_route(uri.path()) {
            Some(found) => found,
            None => return TxResponse::new(Status::NotFound),
        };

        match route.method_handlers.get(request.method()) {
            Some(handler) => {
                handler(request, &parameters, body, response_body)
            }
            None => {
                let mut response =
                    TxResponse::new(Status::MethodNotAllowed);
                response.add_header_field(Id::Allow,
                                          &route.allowed_methods());
                response
            }
        }
    }
}
