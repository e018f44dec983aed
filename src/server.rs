use std::{future::Future, sync::Arc, time::Duration};

use axum::Router;
use tokio::{
    net::TcpListener,
    sync::{watch, Mutex},
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

use crate::{
    favicon::{ensure_directory, ensure_favicon},
    http_api::{router, ApiState},
    IoOperation, MetricsSource, ServerConfig, ServerError, StaticFiles, StatsTracker,
    SystemMetrics,
};

/// Owns the stats tracker and the listener for one server instance
pub struct StaticServer {
    config: ServerConfig,
    tracker: Arc<StatsTracker>,
    files: Arc<StaticFiles>,
    shutdown: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl StaticServer {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        Self::with_metrics(config, Box::new(SystemMetrics::new()))
    }

    pub fn with_metrics(
        config: ServerConfig,
        metrics: Box<dyn MetricsSource>,
    ) -> Result<Self, ServerError> {
        // Validate the config first
        config.validate()?;

        let tracker = Arc::new(StatsTracker::new(config.stats.window, metrics));
        let files = Arc::new(StaticFiles::new(&config.files.directory));
        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            config,
            tracker,
            files,
            shutdown,
            tasks: Mutex::new(Vec::new()),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn tracker(&self) -> Arc<StatsTracker> {
        Arc::clone(&self.tracker)
    }

    pub fn router(&self) -> Router {
        router(ApiState {
            tracker: Arc::clone(&self.tracker),
            files: Arc::clone(&self.files),
        })
    }

    async fn spawn_task<F>(&self, name: &str, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let task = tokio::spawn(future);
        debug!("Spawned {} task: {:?}", name, task.id());

        self.tasks.lock().await.push(task);
    }

    /// Create the static directory and fetch the favicon if it is missing
    pub async fn prepare(&self) -> Result<(), ServerError> {
        let dir = self.files.root();
        ensure_directory(dir).await?;

        if let Some(url) = self.config.files.favicon_url() {
            if let Err(e) = ensure_favicon(dir, url).await {
                warn!("Continuing without favicon: {}", e);
            }
        }

        Ok(())
    }

    /// Bind and serve until `signal` resolves, then shut down and wait for
    /// every background task
    pub async fn run_until<F>(self: Arc<Self>, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        self.prepare().await?;

        let addr = self.config.http.listen_addr();
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            ServerError::io(
                IoOperation::Bind,
                format!("Failed to bind to address {}", addr),
                e,
            )
        })?;

        info!(
            "Serving {} on {} (stats window {:?})",
            self.files.root().display(),
            addr,
            self.tracker.window()
        );

        self.serve_until(listener, signal).await
    }

    /// Serve on an already bound listener until `signal` resolves. Returns
    /// once the listener is closed and background tasks have been joined.
    pub async fn serve_until<F>(
        self: Arc<Self>,
        listener: TcpListener,
        signal: F,
    ) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        let mut serving = tokio::spawn(Arc::clone(&self).serve(listener));

        tokio::select! {
            result = &mut serving => return join_result(result),
            _ = signal => {}
        }

        let shutdown = self.shutdown().await;
        let served = join_result(serving.await);
        shutdown.and(served)
    }

    /// Serve on an already bound listener until shutdown is requested
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> Result<(), ServerError> {
        if let Some(every) = self.config.stats.prune_interval {
            let tracker = Arc::clone(&self.tracker);
            let shutdown_rx = self.shutdown.subscribe();
            self.spawn_task("prune", prune_loop(tracker, every, shutdown_rx))
                .await;
        }

        let mut shutdown_rx = self.shutdown.subscribe();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.wait_for(|stop| *stop).await;
                info!("HTTP server shutting down");
            })
            .await
            .map_err(|e| ServerError::io(IoOperation::Serve, "HTTP server failed", e))?;

        Ok(())
    }

    /// Graceful shutdown
    pub async fn shutdown(&self) -> Result<(), ServerError> {
        info!("Initiating graceful shutdown");

        self.shutdown.send_replace(true);

        let tasks = std::mem::take(&mut *self.tasks.lock().await);
        let mut failed = 0;
        for (i, task) in tasks.into_iter().enumerate() {
            if let Err(e) = task.await {
                error!("Task {} failed during shutdown: {}", i, e);
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(ServerError::io(
                IoOperation::Join,
                format!("{} tasks failed during shutdown", failed),
                std::io::Error::other("background task failed"),
            ));
        }

        info!("Shutdown complete");
        Ok(())
    }
}

fn join_result(
    result: Result<Result<(), ServerError>, tokio::task::JoinError>,
) -> Result<(), ServerError> {
    result.map_err(|e| {
        ServerError::io(
            IoOperation::Join,
            "HTTP server task",
            std::io::Error::other(e.to_string()),
        )
    })?
}

async fn prune_loop(
    tracker: Arc<StatsTracker>,
    every: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = tracker.prune();
                debug!(
                    "Pruned {} request timestamps, {} retained",
                    removed,
                    tracker.ledger().len()
                );
            }
            _ = shutdown_rx.wait_for(|stop| *stop) => {
                debug!("Prune task received shutdown signal");
                break;
            }
        }
    }
}
