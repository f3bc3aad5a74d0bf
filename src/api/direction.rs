// Copyright 2023 Remi Bernotavicius

use super::extract::{Id, Payload};
use super::AppState;
use crate::database::models::{Direction, DirectionId, RecipeId};
use crate::error::ApiResult;
use crate::payload::DirectionCreate;
use crate::query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/direction/recipe/:recipe_id",
            post(create).get(list_for_recipe),
        )
        .route("/direction/:id", get(read).put(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    Id(recipe_id): Id<RecipeId>,
    Payload(new_direction): Payload<DirectionCreate>,
) -> ApiResult<(StatusCode, Json<Direction>)> {
    let direction = state
        .transaction(move |conn| query::direction::create(conn, recipe_id, &new_direction))
        .await?;
    Ok((StatusCode::CREATED, Json(direction)))
}

async fn list_for_recipe(
    State(state): State<AppState>,
    Id(recipe_id): Id<RecipeId>,
) -> ApiResult<Json<Vec<Direction>>> {
    let directions = state
        .transaction(move |conn| query::direction::list_for_recipe(conn, recipe_id))
        .await?;
    Ok(Json(directions))
}

async fn read(
    State(state): State<AppState>,
    Id(direction_id): Id<DirectionId>,
) -> ApiResult<Json<Direction>> {
    let direction = state
        .transaction(move |conn| query::direction::get(conn, direction_id))
        .await?;
    Ok(Json(direction))
}

async fn update(
    State(state): State<AppState>,
    Id(direction_id): Id<DirectionId>,
    Payload(changes): Payload<DirectionCreate>,
) -> ApiResult<Json<Direction>> {
    let direction = state
        .transaction(move |conn| query::direction::update(conn, direction_id, &changes))
        .await?;
    Ok(Json(direction))
}

async fn remove(
    State(state): State<AppState>,
    Id(direction_id): Id<DirectionId>,
) -> ApiResult<StatusCode> {
    state
        .transaction(move |conn| query::direction::delete(conn, direction_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
