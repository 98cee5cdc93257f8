// src/test_utils/mock_feed_server.rs
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Local HTTP server serving a single canned response, for exercising the
/// streaming and directory clients without touching the network.
pub struct MockFeedServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl MockFeedServer {
    /// Serve `body` with the given content type at every path.
    pub async fn start(body: &str, content_type: &str) -> Self {
        let body = body.to_string();
        let content_type = content_type.to_string();
        let app = Router::new().route(
            "/",
            get(move || {
                let body = body.clone();
                let content_type = content_type.clone();
                async move { ([(header::CONTENT_TYPE, content_type)], body) }
            }),
        );
        Self::serve(app).await
    }

    /// Serve a JSON document at every path.
    pub async fn start_json(value: serde_json::Value) -> Self {
        let app = Router::new().route(
            "/",
            get(move || {
                let value = value.clone();
                async move { axum::Json(value) }
            }),
        );
        Self::serve(app).await
    }

    /// Respond to every request with `status` and an empty body.
    pub async fn start_with_status(status: StatusCode) -> Self {
        let app = Router::new().route(
            "/",
            get(move || async move { status.into_response() }),
        );
        Self::serve(app).await
    }

    async fn serve(app: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap_or_else(|e| {
            panic!("Failed to bind mock feed server to 127.0.0.1:0. Error: {}", e);
        });
        let addr = listener.local_addr().unwrap();
        log::info!("Mock feed server listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| {
                    log::error!("Mock feed server error: {}", e);
                });
        });

        MockFeedServer { addr, shutdown_tx }
    }

    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            log::warn!("Mock feed server shutdown signal already sent or receiver dropped.");
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    }
}
