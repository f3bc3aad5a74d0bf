// Copyright 2023 Remi Bernotavicius

use super::extract::{Id, Params, Payload};
use super::AppState;
use crate::database::models::{IngredientCategory, IngredientDetail, IngredientId};
use crate::error::ApiResult;
use crate::payload::{IngredientCreate, IngredientFilter};
use crate::query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients", get(list).post(create))
        .route("/ingredients/", get(list).post(create))
        .route("/ingredients/categories", get(categories))
        .route("/ingredients/:id", get(read).put(update).delete(remove))
}

async fn categories() -> Json<Vec<IngredientCategory>> {
    Json(IngredientCategory::iter().collect())
}

async fn create(
    State(state): State<AppState>,
    Payload(new_ingredient): Payload<IngredientCreate>,
) -> ApiResult<(StatusCode, Json<IngredientDetail>)> {
    let ingredient = state
        .transaction(move |conn| query::ingredient::create(conn, &new_ingredient))
        .await?;
    log::info!(
        "created ingredient {} '{}'",
        ingredient.ingredient.id,
        ingredient.ingredient.name
    );
    Ok((StatusCode::CREATED, Json(ingredient)))
}

async fn list(
    State(state): State<AppState>,
    Params(filter): Params<IngredientFilter>,
) -> ApiResult<Json<Vec<IngredientDetail>>> {
    let ingredients = state
        .transaction(move |conn| query::ingredient::list(conn, &filter))
        .await?;
    Ok(Json(ingredients))
}

async fn read(
    State(state): State<AppState>,
    Id(ingredient_id): Id<IngredientId>,
) -> ApiResult<Json<IngredientDetail>> {
    let ingredient = state
        .transaction(move |conn| query::ingredient::get(conn, ingredient_id))
        .await?;
    Ok(Json(ingredient))
}

async fn update(
    State(state): State<AppState>,
    Id(ingredient_id): Id<IngredientId>,
    Payload(changes): Payload<IngredientCreate>,
) -> ApiResult<Json<IngredientDetail>> {
    let ingredient = state
        .transaction(move |conn| query::ingredient::update(conn, ingredient_id, &changes))
        .await?;
    Ok(Json(ingredient))
}

async fn remove(
    State(state): State<AppState>,
    Id(ingredient_id): Id<IngredientId>,
) -> ApiResult<StatusCode> {
    state
        .transaction(move |conn| query::ingredient::delete(conn, ingredient_id))
        .await?;
    log::info!("deleted ingredient {ingredient_id}");
    Ok(StatusCode::NO_CONTENT)
}
