//! Listener lifecycle.

use std::net::SocketAddr;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::TenantManagementConfig;
use crate::web;

struct Running {
    local_addr: SocketAddr,
    cancel: CancellationToken,
    task: JoinHandle<anyhow::Result<()>>,
}

/// Tenant-management HTTP listener.
///
/// `start` binds and spawns the serve loop; `stop` cancels it and waits for
/// in-flight connections to drain. The listener can be restarted after a stop.
pub struct TenantManagementServer {
    cfg: TenantManagementConfig,
    running: Mutex<Option<Running>>,
}

impl TenantManagementServer {
    #[must_use]
    pub fn new(cfg: TenantManagementConfig) -> Self {
        Self {
            cfg,
            running: Mutex::new(None),
        }
    }

    /// Bind the socket and start serving in a background task.
    ///
    /// # Errors
    ///
    /// Fails if the listener is already running, the bind address is invalid
    /// or the socket cannot be bound.
    pub async fn start(&self) -> anyhow::Result<SocketAddr> {
        if self.is_running() {
            anyhow::bail!("tenant-management listener is already running");
        }

        let addr = parse_bind_address(&self.cfg.bind_addr)?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let mut slot = self.running.lock();
        if slot.as_ref().is_some_and(|r| !r.task.is_finished()) {
            // Lost a race with a concurrent `start`; the new socket is dropped.
            anyhow::bail!("tenant-management listener is already running");
        }

        let cancel = CancellationToken::new();
        let shutdown = {
            let cancel = cancel.clone();
            async move {
                cancel.cancelled().await;
                tracing::info!("tenant-management listener shutting down gracefully");
            }
        };
        let task = tokio::spawn(async move {
            axum::serve(listener, web::router())
                .with_graceful_shutdown(shutdown)
                .await
                .map_err(|e| anyhow::anyhow!(e))
        });

        tracing::info!(%local_addr, "tenant-management listener bound");
        *slot = Some(Running {
            local_addr,
            cancel,
            task,
        });
        Ok(local_addr)
    }

    /// Stop serving and wait for the serve loop to finish.
    ///
    /// Connections get `shutdown_timeout_ms` to drain; after that the serve
    /// loop is aborted. Stopping a listener that is not running is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the serve loop's own failure, if it had one.
    pub async fn stop(&self) -> anyhow::Result<()> {
        let Some(running) = self.running.lock().take() else {
            tracing::debug!("tenant-management listener is not running");
            return Ok(());
        };

        running.cancel.cancel();
        let mut task = running.task;
        let drain = Duration::from_millis(self.cfg.shutdown_timeout_ms);

        let Ok(joined) = tokio::time::timeout(drain, &mut task).await else {
            task.abort();
            tracing::warn!(
                local_addr = %running.local_addr,
                timeout_ms = self.cfg.shutdown_timeout_ms,
                "tenant-management connections did not drain in time; serve loop aborted"
            );
            return Ok(());
        };

        let result =
            joined.map_err(|e| anyhow::anyhow!("tenant-management serve task failed: {e}"))?;
        tracing::info!(local_addr = %running.local_addr, "tenant-management listener stopped");
        result
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .as_ref()
            .is_some_and(|r| !r.task.is_finished())
    }

    /// Address actually bound, while running.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running
            .lock()
            .as_ref()
            .filter(|r| !r.task.is_finished())
            .map(|r| r.local_addr)
    }
}

fn parse_bind_address(bind_addr: &str) -> anyhow::Result<SocketAddr> {
    bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{bind_addr}': {e}"))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn bind_address_must_be_socket_addr() {
        assert!(parse_bind_address("127.0.0.1:0").is_ok());
        assert!(parse_bind_address("localhost").is_err());
    }

    #[tokio::test]
    async fn invalid_bind_address_fails_start() {
        let server = TenantManagementServer::new(TenantManagementConfig {
            bind_addr: "not-an-address".to_owned(),
            ..TenantManagementConfig::default()
        });
        assert!(server.start().await.is_err());
        assert!(!server.is_running());
    }
}
