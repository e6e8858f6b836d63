//! Upstream forwarding.
//!
//! # Responsibilities
//! - Own the outbound HTTP client and its connection pool
//! - Rewrite the request URI to the matched service
//! - Enforce the forwarding deadline
//! - Classify failures into the dispatch error taxonomy
//!
//! # Design Decisions
//! - Exactly one attempt per request; retries belong to the caller
//! - The deadline covers sending the request and reading the whole response,
//!   so a backend that stalls mid-body is still bounded
//! - Dropping the returned future cancels the upstream request

use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{response::Parts, Request, Uri},
    response::Response,
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;

use crate::error::{GatewayError, UnavailableReason};
use crate::http::headers::upstream_request_headers;
use crate::http::response::relay;
use crate::routing::RouteMatch;

/// Failure inside the timed exchange, before classification.
#[derive(Debug)]
enum ExchangeError {
    Send(hyper_util::client::legacy::Error),
    Body(axum::Error),
}

/// Forwards matched requests to their backend.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    deadline: Duration,
}

impl Forwarder {
    pub fn new(connect_timeout: Duration, deadline: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self { client, deadline }
    }

    /// Send `request` to the service in `route` and relay its response.
    pub async fn forward(
        &self,
        route: &RouteMatch<'_>,
        request: Request<Body>,
    ) -> Result<Response, GatewayError> {
        let service = route.service.name();
        let (parts, body) = request.into_parts();
        let target = route.target(parts.uri.query());

        let uri: Uri = target
            .parse()
            .map_err(|e| GatewayError::forwarding(service, &target, e))?;

        let mut upstream = Request::builder()
            .method(parts.method)
            .uri(uri)
            .body(body)
            .map_err(|e| GatewayError::forwarding(service, &target, e))?;
        *upstream.headers_mut() = upstream_request_headers(parts.headers);

        tracing::debug!(service = %service, target = %target, "Forwarding request");

        match time::timeout(self.deadline, self.exchange(upstream)).await {
            Ok(Ok((parts, body))) => Ok(relay(parts, body)),
            Ok(Err(ExchangeError::Send(e))) if e.is_connect() => Err(GatewayError::unavailable(
                service,
                &target,
                UnavailableReason::Connect,
            )),
            Ok(Err(ExchangeError::Send(e))) => Err(GatewayError::forwarding(service, &target, e)),
            Ok(Err(ExchangeError::Body(e))) => Err(GatewayError::forwarding(service, &target, e)),
            Err(_) => Err(GatewayError::unavailable(
                service,
                &target,
                UnavailableReason::Timeout,
            )),
        }
    }

    async fn exchange(&self, request: Request<Body>) -> Result<(Parts, Bytes), ExchangeError> {
        let response = self
            .client
            .request(request)
            .await
            .map_err(ExchangeError::Send)?;

        let (parts, body): (Parts, Incoming) = response.into_parts();
        let bytes = axum::body::to_bytes(Body::new(body), usize::MAX)
            .await
            .map_err(ExchangeError::Body)?;

        Ok((parts, bytes))
    }
}
