pub mod api;
pub mod client;
pub mod pages;

use std::sync::Arc;

use axum::Router;
use meibo::domain::customer::CustomerRepository;

pub use crate::client::RecordClient;

/// JSON API（`/api`）と画面をまとめたアプリケーション
pub fn app(repository: Arc<dyn CustomerRepository>, client: RecordClient) -> Router {
    Router::new()
        .nest("/api", api::router(repository))
        .merge(pages::router(client))
}
