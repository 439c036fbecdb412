//! Assessment server lifecycle.
//!
//! bind → spawn background task → return handle with shutdown channel.
//! `serve_until_ctrl_c` wraps that for the CLI.

use std::net::SocketAddr;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::api::router::assessment_router;
use crate::api::types::ApiContext;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to get server address: {0}")]
    LocalAddr(#[source] std::io::Error),

    #[error("Server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Session metadata for a running server.
#[derive(Debug, Clone)]
pub struct ServerSession {
    pub session_id: String,
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a running server.
pub struct AssessmentServer {
    pub session: ServerSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl AssessmentServer {
    /// Ask the server to stop. In-flight requests are allowed to finish.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Server shutdown signal sent");
        }
    }

    /// Wait for the server task to exit.
    pub async fn wait(self) -> Result<(), ServerError> {
        self.handle.await?;
        Ok(())
    }
}

/// Bind `addr` and serve the assessment router in a background task.
///
/// Port 0 picks an ephemeral port; the real one is in `session.port`.
pub async fn start_server(
    ctx: ApiContext,
    addr: SocketAddr,
) -> Result<AssessmentServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let app = assessment_router(ctx);

    let session = ServerSession {
        session_id: Uuid::new_v4().to_string(),
        server_addr: addr.to_string(),
        port: addr.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Server received shutdown signal");
        };

        tracing::info!(%addr, "Server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Server error: {e}");
        }

        tracing::info!("Server stopped");
    });

    Ok(AssessmentServer {
        session,
        shutdown_tx: Some(shutdown_tx),
        handle,
    })
}

/// Serve until Ctrl-C, then shut down gracefully.
pub async fn serve_until_ctrl_c(ctx: ApiContext, addr: SocketAddr) -> Result<(), ServerError> {
    let mut server = start_server(ctx, addr).await?;
    tracing::info!(
        session_id = %server.session.session_id,
        "Listening on http://{}",
        server.session.server_addr
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {e}");
    }
    server.shutdown();
    server.wait().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::test_support::test_context;

    fn localhost() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 0))
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let mut server = start_server(test_context(), localhost())
            .await
            .expect("server should start");

        assert!(!server.session.session_id.is_empty());
        assert!(server.session.port > 0);

        let url = format!("http://127.0.0.1:{}/api/health", server.session.port);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert_eq!(
            resp.headers().get("cache-control").unwrap(),
            "no-store"
        );

        server.shutdown();
        server.wait().await.unwrap();
    }

    #[tokio::test]
    async fn server_session_has_valid_metadata() {
        let mut server = start_server(test_context(), localhost())
            .await
            .expect("server should start");

        assert!(!server.session.started_at.is_empty());
        assert!(server.session.server_addr.starts_with("127.0.0.1:"));

        server.shutdown();
    }

    #[tokio::test]
    async fn server_serves_assessments() {
        let mut server = start_server(test_context(), localhost())
            .await
            .expect("server should start");
        let port = server.session.port;

        let client = reqwest::Client::new();
        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/assess"))
            .json(&serde_json::json!({
                "glucose": 199, "bmi": 28.4, "blood_pressure": 125, "age": 52, "insulin": 90.0
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["category"], "pre_diabetes");

        let resp = reqwest::get(format!("http://127.0.0.1:{port}/nonexistent"))
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.shutdown();
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let mut first = start_server(test_context(), localhost()).await.unwrap();
        let taken = SocketAddr::from(([127, 0, 0, 1], first.session.port));

        let err = start_server(test_context(), taken).await.err().unwrap();
        assert!(matches!(err, ServerError::Bind { .. }));

        first.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_server(test_context(), localhost())
            .await
            .expect("server should start");

        server.shutdown();
        server.shutdown();
        server.wait().await.unwrap();
    }
}
