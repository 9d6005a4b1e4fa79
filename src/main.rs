use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use lingualink_backend_rust::config::Config;
use lingualink_backend_rust::db;
use lingualink_backend_rust::logging;
use lingualink_backend_rust::routes;
use lingualink_backend_rust::state::AppState;
use lingualink_backend_rust::store::postgres::PgStore;
use lingualink_backend_rust::store::ProgressStore;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    let _log_guard = logging::init_tracing(&config.log_level);

    let store: Option<Arc<dyn ProgressStore>> = match db::DatabaseProxy::from_env().await {
        Ok(proxy) => {
            if let Err(err) = db::migrate::run_migrations(proxy.pool()).await {
                tracing::error!(error = %err, "database migrations failed");
            }
            Some(Arc::new(PgStore::new(proxy)))
        }
        Err(err) => {
            tracing::warn!(error = %err, "database not initialized, progress API disabled");
            None
        }
    };

    let state = AppState::new(store);

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr();
    tracing::info!(%addr, "lingualink backend listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("HTTP server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
