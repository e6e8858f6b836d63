//! A stand-in backend service for local gateway runs.
//!
//! `cargo run --example mock_backend -- auth 8001` serves `/health` and echoes
//! every other request as JSON.

use axum::{extract::Request, routing::get, Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let name = args.next().unwrap_or_else(|| "auth".to_string());
    let port: u16 = args.next().as_deref().unwrap_or("8001").parse()?;

    let service = name.clone();
    let app = Router::new()
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .fallback(move |request: Request| {
            let service = service.clone();
            async move { Json(echo(&service, &request)) }
        });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("mock {} backend listening on http://{}", name, addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn echo(service: &str, request: &Request) -> Value {
    json!({
        "service": service,
        "method": request.method().as_str(),
        "path": request.uri().path(),
        "query": request.uri().query(),
    })
}
