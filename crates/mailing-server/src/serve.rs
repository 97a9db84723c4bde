//! Accept loop driving hyper connections directly, so keep-alive idle
//! connections are closed after a fixed timeout.

use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto;
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// How long a connection may sit without sending the next request head.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Upper bound on waiting for in-flight connections after shutdown starts.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(15);

/// Serve `app` on `listener` until `signal` resolves, then drain open
/// connections.
pub async fn serve<F>(listener: TcpListener, app: Router, idle_timeout: Duration, signal: F)
where
    F: Future<Output = ()>,
{
    let mut http = auto::Builder::new(TokioExecutor::new());
    http.http1()
        .timer(TokioTimer::new())
        .header_read_timeout(idle_timeout);

    let graceful = GracefulShutdown::new();
    tokio::pin!(signal);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        continue;
                    }
                };
                debug!("Accepted connection from {}", peer);

                let service = TowerToHyperService::new(app.clone());
                let conn = http
                    .serve_connection_with_upgrades(TokioIo::new(stream), service)
                    .into_owned();
                let conn = graceful.watch(conn);

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        debug!("Connection from {} ended with error: {}", peer, e);
                    }
                });
            }
            _ = &mut signal => {
                info!("Stopped accepting connections");
                break;
            }
        }
    }

    drop(listener);

    tokio::select! {
        _ = graceful.shutdown() => {
            info!("All connections closed");
        }
        _ = tokio::time::sleep(DRAIN_TIMEOUT) => {
            warn!("Timed out waiting for connections to close");
        }
    }
}
