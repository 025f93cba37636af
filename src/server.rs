use std::io::ErrorKind;

use anyhow::{bail, Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

/// Bind `host:port`, moving to the next port when the current one is taken.
///
/// At most `attempts` ports are tried. Errors other than "address in use"
/// fail immediately.
pub async fn bind_with_retry(host: &str, port: u16, attempts: u32) -> Result<TcpListener> {
    let mut port = port;

    for attempt in 1..=attempts.max(1) {
        let addr = format!("{host}:{port}");
        match TcpListener::bind(&addr).await {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == ErrorKind::AddrInUse && attempt < attempts => {
                let next = port
                    .checked_add(1)
                    .with_context(|| format!("port {port} in use and no higher port left"))?;
                warn!(addr = %addr, attempt, next_port = next, "Port in use, trying next port");
                port = next;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to bind {addr} (attempt {attempt})"))
            }
        }
    }

    bail!("no free port found after {attempts} attempts")
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binds_requested_port_when_free() {
        let probe = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = probe.local_addr().unwrap().port();
        drop(probe);

        let listener = bind_with_retry("127.0.0.1", port, 3).await.unwrap();
        assert_eq!(listener.local_addr().unwrap().port(), port);
    }

    #[tokio::test]
    async fn moves_to_next_port_when_taken() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        match bind_with_retry("127.0.0.1", port, 10).await {
            Ok(listener) => assert!(listener.local_addr().unwrap().port() > port),
            // Only possible when the taken port is the very last one.
            Err(e) => assert!(e.to_string().contains("no higher port")),
        }
    }

    #[tokio::test]
    async fn single_attempt_fails_on_conflict() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let err = bind_with_retry("127.0.0.1", port, 1).await.unwrap_err();
        assert!(err.to_string().contains("failed to bind"));
    }
}
