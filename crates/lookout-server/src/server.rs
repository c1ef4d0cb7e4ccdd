use crate::response::InvocationResponse;
use crate::{handler, Result};
use http::header::CONTENT_TYPE;
use http::HeaderValue;
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Inbound HTTP trigger for the checker. Any request on any path fires one
/// invocation; the body and query string are ignored.
pub struct TriggerServer {
    port: u16,
}

impl TriggerServer {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = ([0, 0, 0, 0], self.port).into();
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(%addr, "trigger endpoint listening");
        println!("✓ Trigger endpoint listening on http://{addr}");
        println!("  Any HTTP request starts one check invocation.");

        Self::serve(listener, handler::run_invocation).await
    }

    /// Accept loop. Each connection gets its own task; each request runs a
    /// full invocation, so overlapping requests run independently.
    async fn serve<F, Fut>(listener: TcpListener, invoke: F) -> Result<()>
    where
        F: Fn() -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = InvocationResponse> + Send,
    {
        loop {
            let (stream, remote) = listener.accept().await?;
            tracing::debug!(%remote, "inbound trigger connection");

            let invoke = invoke.clone();
            tokio::spawn(async move {
                let service = service_fn(move |_req: Request<Incoming>| {
                    let invoke = invoke.clone();
                    async move { Ok::<_, Infallible>(json_response(invoke().await)) }
                });
                if let Err(e) = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await
                {
                    tracing::debug!("trigger connection error: {}", e);
                }
            });
        }
    }
}

/// The outward HTTP status is always 200; internal failure is communicated
/// through the body, never the status code.
fn json_response(invocation: InvocationResponse) -> Response<Full<Bytes>> {
    let body = serde_json::to_vec(&invocation).unwrap_or_else(|e| {
        tracing::error!("response serialization failed: {}", e);
        b"{}".to_vec()
    });

    let mut response = Response::new(Full::new(Bytes::from(body)));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
