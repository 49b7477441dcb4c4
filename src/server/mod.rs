//! Single-page web demo around the detection pipeline.
//!
//! One page, three actions: paste text and Predict, Clear the text area, and
//! Download the most recent prediction as a one-row CSV. State is a loaded
//! pipeline plus at most one pending export record; nothing is persisted.

mod routes;

pub use routes::{create_router, AppState, ErrorResponse, PredictRequest, PredictResponse};

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::detection::{NewsDetectionModel, NewsDetectionPipeline};
use crate::error::{DetectorError, Result};

/// Server bind configuration.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServeConfig {
    /// Creates a configuration for the given host and port.
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// Resolves the bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| DetectorError::Server(format!("invalid address: {e}")))
    }
}

/// The demo web server.
pub struct DemoServer<M: NewsDetectionModel> {
    config: ServeConfig,
    state: AppState<M>,
}

impl<M> DemoServer<M>
where
    M: NewsDetectionModel + Send + Sync + 'static,
{
    /// Creates a server around an already-built pipeline.
    pub fn new(config: ServeConfig, pipeline: NewsDetectionPipeline<M>) -> Self {
        Self {
            config,
            state: AppState::new(pipeline),
        }
    }

    /// Serves the demo until ctrl-c.
    pub async fn run(&self) -> Result<()> {
        let addr = self.config.socket_addr()?;
        let router = create_router(self.state.clone()).layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| DetectorError::Server(format!("failed to bind {addr}: {e}")))?;

        tracing::info!("demo listening on http://{addr}");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DetectorError::Server(e.to_string()))?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::NewsLabel;
    use crate::pipelines::detection::testing::stub_pipeline;

    #[test]
    fn test_serve_config_default() {
        let config = ServeConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_serve_config_socket_addr() {
        let config = ServeConfig::new("127.0.0.1".to_string(), 3000);
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_serve_config_invalid_host() {
        let config = ServeConfig::new("invalid_host".to_string(), 3000);
        assert!(config.socket_addr().is_err());
    }

    #[tokio::test]
    async fn test_router_builds() {
        let router = create_router(AppState::new(stub_pipeline(NewsLabel::Real, 0.9)));
        assert!(format!("{:?}", router).contains("Router"));
    }
}
