use crate::{db, errors::ServiceError, AppState};
use axum::{extract::State, routing::get, Router};

/// Liveness check; also pings the database.
async fn health(State(state): State<AppState>) -> Result<&'static str, ServiceError> {
    db::check_connection(&state.db).await?;
    Ok("ok")
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
