use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::dns::HickoryChecker;
use crate::infrastructure::store::DomainStore;

use super::Core;
use super::auth::BearerAuth;
use super::recheck::RecheckScheduler;
use super::router::{AppState, create_router};

pub struct Server {
    state: Arc<AppState>,
    bind: std::net::SocketAddr,
}

impl Server {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let store = DomainStore::open(config.store_path.clone())
            .context("Failed to open domain record store")?;

        let targets = config.routing_targets();
        let checker = HickoryChecker::new(targets.clone(), config.dns.lookup_timeout);

        let core = Arc::new(Core {
            store,
            checker: Box::new(checker),
            targets,
            platform_domain: config.platform.domain.clone(),
            reserved: config.reserved_names(),
        });

        let state = Arc::new(AppState {
            core: Arc::clone(&core),
            auth: BearerAuth::from_settings(&config.auth),
            recheck: RecheckScheduler::new(core, config.dns.recheck_interval),
        });

        Ok(Self {
            state,
            bind: config.server.bind,
        })
    }

    pub async fn run(self) -> Result<()> {
        // Pick up claims that were mid-verification when the daemon
        // last stopped.
        self.state.recheck.resume_all();

        let router = create_router(Arc::clone(&self.state)).layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(self.bind).await.context(format!(
            "Failed to bind to {}. Is another service using it?",
            self.bind
        ))?;

        info!("HTTP server listening on {}", self.bind);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
