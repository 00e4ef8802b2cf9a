use axum::http::{Method, Request};

/// Query parameter HTML forms use to ask for a method they cannot send.
pub const METHOD_OVERRIDE_PARAM: &str = "_method";

/// Rewrites `POST ...?_method=PUT|PATCH|DELETE` into the requested method.
///
/// Must wrap the router rather than be layered onto it: axum has already picked
/// the method route by the time route-level middleware runs.
pub fn method_override<B>(mut request: Request<B>) -> Request<B> {
    if request.method() != Method::POST {
        return request;
    }

    let requested = request.uri().query().and_then(|query| {
        query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == METHOD_OVERRIDE_PARAM).then(|| value.to_ascii_uppercase())
        })
    });

    let method = match requested.as_deref() {
        Some("PUT") => Method::PUT,
        Some("PATCH") => Method::PATCH,
        Some("DELETE") => Method::DELETE,
        _ => return request,
    };

    tracing::debug!(%method, uri = %request.uri(), "Method override applied");
    *request.method_mut() = method;
    request
}
