// Copyright 2023 Remi Bernotavicius

use super::extract::{Id, Payload};
use super::AppState;
use crate::database::models::{RecipeId, RecipeIngredientDetail, RecipeIngredientId};
use crate::error::ApiResult;
use crate::payload::RecipeIngredientCreate;
use crate::query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/recipe_ingredients/recipe/:recipe_id",
            post(create).get(list_for_recipe),
        )
        .route(
            "/recipe_ingredients/:id",
            get(read).put(update).delete(remove),
        )
}

async fn create(
    State(state): State<AppState>,
    Id(recipe_id): Id<RecipeId>,
    Payload(new_usage): Payload<RecipeIngredientCreate>,
) -> ApiResult<(StatusCode, Json<RecipeIngredientDetail>)> {
    let usage = state
        .transaction(move |conn| query::recipe_ingredient::create(conn, recipe_id, &new_usage))
        .await?;
    Ok((StatusCode::CREATED, Json(usage)))
}

async fn list_for_recipe(
    State(state): State<AppState>,
    Id(recipe_id): Id<RecipeId>,
) -> ApiResult<Json<Vec<RecipeIngredientDetail>>> {
    let usages = state
        .transaction(move |conn| query::recipe_ingredient::list_for_recipe(conn, recipe_id))
        .await?;
    Ok(Json(usages))
}

async fn read(
    State(state): State<AppState>,
    Id(usage_id): Id<RecipeIngredientId>,
) -> ApiResult<Json<RecipeIngredientDetail>> {
    let usage = state
        .transaction(move |conn| query::recipe_ingredient::get(conn, usage_id))
        .await?;
    Ok(Json(usage))
}

async fn update(
    State(state): State<AppState>,
    Id(usage_id): Id<RecipeIngredientId>,
    Payload(changes): Payload<RecipeIngredientCreate>,
) -> ApiResult<Json<RecipeIngredientDetail>> {
    let usage = state
        .transaction(move |conn| query::recipe_ingredient::update(conn, usage_id, &changes))
        .await?;
    Ok(Json(usage))
}

async fn remove(
    State(state): State<AppState>,
    Id(usage_id): Id<RecipeIngredientId>,
) -> ApiResult<StatusCode> {
    state
        .transaction(move |conn| query::recipe_ingredient::delete(conn, usage_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
