use tracing::{error, warn};

/// 等待 Ctrl+C，Unix 下同时响应 SIGTERM
pub async fn listen_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                wait_ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    wait_ctrl_c().await;

    warn!("Shutdown signal received, stopping server...");
}

async fn wait_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
