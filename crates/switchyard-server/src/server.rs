//! The accept loop.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use switchyard_core::{boxed, BoxedHandler, Handler, Request, Response, ResponseExt};
use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Serves one handler over HTTP/1.1.
///
/// Each connection runs in its own task. A panic that escapes the handler
/// ends that connection's task and nothing else; install
/// `switchyard_middleware::Recovery` to answer 500 instead.
///
/// # Example
///
/// ```rust,no_run
/// use http::StatusCode;
/// use switchyard_core::{handler_fn, Response, ResponseExt};
/// use switchyard_server::{Server, ServerConfig};
///
/// # async fn run() -> Result<(), switchyard_server::ServerError> {
/// let config = ServerConfig::builder().http_addr("127.0.0.1:8080").build();
/// let handler = handler_fn(|_req| async { Response::text(StatusCode::OK, "ok") });
///
/// Server::new(config, handler).run().await
/// # }
/// ```
pub struct Server {
    config: ServerConfig,
    handler: BoxedHandler,
}

impl Server {
    /// Creates a server for `handler`.
    pub fn new<H: Handler>(config: ServerConfig, handler: H) -> Self {
        Self {
            config,
            handler: boxed(handler),
        }
    }

    /// The server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Runs until SIGTERM or SIGINT.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds the configured address and runs until `shutdown` triggers.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|source| ServerError::InvalidAddress {
                addr: self.config.http_addr().to_string(),
                source,
            })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        accept_loop(
            listener,
            self.handler,
            shutdown,
            self.config.shutdown_timeout(),
        )
        .await
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Serves `handler` on an already bound listener until `shutdown` triggers,
/// draining connections for the default shutdown timeout.
pub async fn serve<H: Handler>(
    listener: TcpListener,
    handler: H,
    shutdown: ShutdownSignal,
) -> Result<(), ServerError> {
    let timeout = ServerConfig::default().shutdown_timeout();
    accept_loop(listener, boxed(handler), shutdown, timeout).await
}

async fn accept_loop(
    listener: TcpListener,
    handler: BoxedHandler,
    shutdown: ShutdownSignal,
    shutdown_timeout: Duration,
) -> Result<(), ServerError> {
    let local_addr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, "Server listening");

    let tracker = ConnectionTracker::new();
    let stop = shutdown.recv();
    tokio::pin!(stop);

    loop {
        tokio::select! {
            result = listener.accept() => match result {
                Ok((stream, remote_addr)) => {
                    let handler = Arc::clone(&handler);
                    let token = tracker.acquire();
                    let shutdown = shutdown.clone();

                    tokio::spawn(async move {
                        if let Err(e) = serve_connection(stream, remote_addr, handler, shutdown).await {
                            tracing::debug!(remote = %remote_addr, error = %e, "Connection error");
                        }
                        drop(token);
                    });
                }
                Err(e) => tracing::error!(error = %e, "Failed to accept connection"),
            },
            () = &mut stop => {
                tracing::info!("Shutdown signal received, stopping server");
                break;
            }
        }
    }

    tracing::info!(
        timeout = ?shutdown_timeout,
        connections = tracker.active_connections(),
        "Waiting for connections to close"
    );
    tokio::select! {
        () = tracker.wait_for_idle() => tracing::info!("All connections closed"),
        () = tokio::time::sleep(shutdown_timeout) => tracing::warn!(
            connections = tracker.active_connections(),
            "Shutdown timeout reached"
        ),
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn serve_connection(
    stream: TcpStream,
    remote_addr: SocketAddr,
    handler: BoxedHandler,
    shutdown: ShutdownSignal,
) -> Result<(), hyper::Error> {
    let io = TokioIo::new(stream);
    let service = service_fn(move |request: hyper::Request<Incoming>| {
        let handler = Arc::clone(&handler);
        async move { Ok::<_, Infallible>(handle(&handler, request).await) }
    });

    let conn = http1::Builder::new().serve_connection(io, service);
    tokio::pin!(conn);

    tokio::select! {
        result = conn.as_mut() => result,
        () = shutdown.recv() => {
            tracing::debug!(remote = %remote_addr, "Closing connection for shutdown");
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    }
}

async fn handle(handler: &BoxedHandler, request: hyper::Request<Incoming>) -> Response {
    let (parts, body) = request.into_parts();
    let body: Bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to read request body");
            return Response::error(StatusCode::BAD_REQUEST, "Bad Request");
        }
    };

    let request: Request = http::Request::from_parts(parts, Full::new(body));
    handler.call(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchyard_core::handler_fn;

    fn ok() -> impl Handler {
        handler_fn(|_req| async { Response::text(StatusCode::OK, "ok") })
    }

    #[test]
    fn test_server_new() {
        let config = ServerConfig::builder().http_addr("127.0.0.1:8080").build();
        let server = Server::new(config, ok());
        assert_eq!(server.config().http_addr(), "127.0.0.1:8080");
        assert!(format!("{server:?}").contains("127.0.0.1:8080"));
    }

    #[tokio::test]
    async fn test_run_invalid_address() {
        let config = ServerConfig::builder().http_addr("not an address").build();
        let result = Server::new(config, ok())
            .run_with_shutdown(ShutdownSignal::new())
            .await;
        assert!(matches!(result, Err(ServerError::InvalidAddress { .. })));
    }

    #[tokio::test]
    async fn test_run_and_shutdown() {
        let config = ServerConfig::builder()
            .http_addr("127.0.0.1:0")
            .shutdown_timeout(Duration::from_secs(1))
            .build();
        let shutdown = ShutdownSignal::new();
        let server = tokio::spawn(Server::new(config, ok()).run_with_shutdown(shutdown.clone()));

        tokio::time::sleep(Duration::from_millis(20)).await;
        shutdown.trigger();

        let result = tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .expect("server should stop")
            .expect("task should not panic");
        assert!(result.is_ok());
    }
}
