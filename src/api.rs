// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::error::{ApiError, ApiResult};
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::time::Instant;

mod direction;
mod extract;
mod ingredient;
mod recipe;
mod recipe_ingredient;
mod schedule;
mod unit;

#[cfg(test)]
mod tests;

pub const API_PREFIX: &str = "/api/v1";

#[derive(Clone)]
pub struct AppState {
    pool: database::Pool,
}

impl AppState {
    pub fn new(pool: database::Pool) -> Self {
        Self { pool }
    }

    /// Runs `body` on a pooled connection inside one transaction, off the async workers. Any
    /// error rolls the whole request back. The write lock is taken on `BEGIN`, so concurrent
    /// writers queue on the busy timeout rather than failing a lock upgrade.
    async fn transaction<T, F>(&self, body: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut database::Connection) -> ApiResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut pooled = pool.get()?;
            let conn: &mut database::Connection = &mut pooled;
            conn.immediate_transaction(body)
        })
        .await?
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict(_) | Self::InUse(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Pool(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let detail = if status.is_server_error() {
            log::error!("{self}");
            "Internal server error".to_owned()
        } else {
            self.to_string()
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

async fn describe() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "version": env!("CARGO_PKG_VERSION"),
        "api": API_PREFIX,
    }))
}

async fn no_route() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "detail": "Not Found" })),
    )
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;
    log::info!(
        "{method} {uri} {} ({:.1?})",
        response.status().as_u16(),
        start.elapsed()
    );
    response
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(recipe::routes())
        .merge(direction::routes())
        .merge(recipe_ingredient::routes())
        .merge(ingredient::routes())
        .merge(unit::routes())
        .merge(schedule::routes());

    Router::new()
        .route("/", get(describe))
        .nest(API_PREFIX, api)
        .fallback(no_route)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
