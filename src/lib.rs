#![allow(dead_code)]

pub mod calendar;
pub mod config;
pub mod db;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::store::postgres::PgStore;
use crate::store::ProgressStore;

pub async fn create_app() -> axum::Router {
    let store: Option<Arc<dyn ProgressStore>> = match db::DatabaseProxy::from_env().await {
        Ok(proxy) => Some(Arc::new(PgStore::new(proxy))),
        Err(_) => None,
    };

    let state = AppState::new(store);

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
