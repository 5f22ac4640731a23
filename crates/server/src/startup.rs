use std::{future::Future, sync::Arc, time::Duration};

use anyhow::anyhow;
use axum::Router;
use configs::AppConfig;
use service::{new_data_store, RiskService};
use tokio::{net::TcpListener, sync::Notify};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::{routes, state::AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Build the app router over an already-constructed service.
pub fn build_app(risks: RiskService) -> Router {
    routes::build_router(AppState::new(risks), build_cors())
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
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
}

/// Serve `app` until `signal` resolves, then give in-flight requests `grace` to finish.
///
/// If requests are still running when `grace` runs out, the accept loop is aborted and
/// an error is returned. Per-connection tasks are not cancelled here; they end when the
/// runtime is dropped, so callers should treat the error as fatal and exit.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let draining = Arc::new(Notify::new());
    let server = axum::serve(listener, app).with_graceful_shutdown({
        let draining = Arc::clone(&draining);
        async move {
            signal.await;
            info!(event = "shutdown_signal", "server is shutting down");
            draining.notify_one();
        }
    });
    let mut server = tokio::spawn(async move { server.await });

    tokio::select! {
        res = &mut server => res??,
        _ = draining.notified() => {
            match tokio::time::timeout(grace, &mut server).await {
                Ok(res) => res??,
                Err(_) => {
                    warn!(grace_ms = grace.as_millis() as u64, "graceful shutdown timed out; forcing close");
                    server.abort();
                    return Err(anyhow!("graceful shutdown timed out after {grace:?}"));
                }
            }
        }
    }
    Ok(())
}

/// Public entry: build the store and service from `cfg` and run the HTTP server
/// until a shutdown signal arrives.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let store = new_data_store(&cfg.datastore)?;
    store.connect().await?;
    info!(datastore = %cfg.datastore.kind, "data store connected");

    let app = build_app(RiskService::new(Arc::clone(&store)));

    let listener = TcpListener::bind(cfg.server.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "starting risk api");

    let served = serve_with_shutdown(
        listener,
        app,
        shutdown_signal(),
        cfg.server.graceful_shutdown_timeout,
    )
    .await;

    if let Err(e) = store.close().await {
        error!(error = %e, "failed to close data store");
    }
    served?;
    info!("server has been shut down gracefully");
    Ok(())
}
