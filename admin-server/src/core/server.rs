//! HTTP server startup and lifecycle

use crate::core::{Config, Result, ServerState};
use crate::routes::build_app;
use crate::seed;

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// Serve until Ctrl-C
    ///
    /// Seeds development data, starts background tasks, then serves HTTP with
    /// graceful shutdown.
    pub async fn run(&self) -> Result<()> {
        let state = self.state.clone();

        if self.config.is_development() {
            seed::seed_development_data(&state)
                .await
                .map_err(|e| crate::core::ServerError::Database(e.to_string()))?;
        }

        let tasks = state.start_background_tasks();

        let app = build_app(&state);
        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!(
            "Admin server listening on {} (environment: {}, manage domain: {})",
            addr,
            self.config.environment,
            self.config.manage_domain
        );

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tasks.shutdown().await;
        Ok(())
    }
}
