use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{list_questions, submit};
use crate::state::AppState;

/// 构建路由：API 之外的路径都交给静态目录
pub fn build_app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/questions", get(list_questions))
        .route("/submit", post(submit))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
