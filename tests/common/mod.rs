#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;

use lingualink_backend_rust::routes;
use lingualink_backend_rust::state::AppState;
use lingualink_backend_rust::store::memory::MemoryStore;
use lingualink_backend_rust::store::ProgressStore;

pub async fn create_test_app() -> Router {
    std::env::set_var("DATABASE_URL", "");

    lingualink_backend_rust::create_app().await
}

pub fn create_memory_app() -> Router {
    let store: Arc<dyn ProgressStore> = Arc::new(MemoryStore::new());
    routes::router(AppState::new(Some(store)))
}
