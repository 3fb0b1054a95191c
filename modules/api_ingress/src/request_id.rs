//! `x-request-id` handling: generated when the client sends none, echoed back
//! on every response and recorded on the `http_request` span.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestId, RequestId};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const ID_ALPHABET: [char; 32] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j',
    'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'v', 'w', 'x', 'y', 'z',
];
const ID_LEN: usize = 16;

/// Request id as seen by handlers (`Extension<CorrelationId>`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrelationId(pub String);

pub(crate) fn header_name() -> HeaderName {
    HeaderName::from_static(REQUEST_ID_HEADER)
}

/// Lower-case, unambiguous ids that are safe to paste into log searches.
#[derive(Clone, Copy, Default)]
pub(crate) struct ShortIds;

impl MakeRequestId for ShortIds {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        let id = nanoid::nanoid!(ID_LEN, &ID_ALPHABET);
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Runs inside `SetRequestIdLayer`, so the header is always present by now.
pub(crate) async fn expose_request_id(mut req: Request<Body>, next: Next) -> Response {
    let id = req
        .extensions()
        .get::<RequestId>()
        .and_then(|rid| rid.header_value().to_str().ok())
        .unwrap_or_default()
        .to_owned();

    tracing::Span::current().record("request_id", id.as_str());
    req.extensions_mut().insert(CorrelationId(id));
    next.run(req).await
}
