// Copyright 2023 Remi Bernotavicius

use super::extract::{Id, Params, Payload};
use super::AppState;
use crate::database::models::{RecipeDetail, RecipeId};
use crate::error::ApiResult;
use crate::payload::{Pagination, RecipeCreate, RecipeUpdate};
use crate::query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipe", get(list).post(create))
        .route("/recipe/", get(list).post(create))
        .route("/recipe/:id", get(read).put(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    Payload(new_recipe): Payload<RecipeCreate>,
) -> ApiResult<(StatusCode, Json<RecipeDetail>)> {
    let recipe = state
        .transaction(move |conn| query::recipe::create(conn, &new_recipe))
        .await?;
    log::info!("created recipe {} '{}'", recipe.recipe.id, recipe.recipe.title);
    Ok((StatusCode::CREATED, Json(recipe)))
}

async fn list(
    State(state): State<AppState>,
    Params(page): Params<Pagination>,
) -> ApiResult<Json<Vec<RecipeDetail>>> {
    let recipes = state
        .transaction(move |conn| query::recipe::list(conn, page))
        .await?;
    Ok(Json(recipes))
}

async fn read(
    State(state): State<AppState>,
    Id(recipe_id): Id<RecipeId>,
) -> ApiResult<Json<RecipeDetail>> {
    let recipe = state
        .transaction(move |conn| query::recipe::get(conn, recipe_id))
        .await?;
    Ok(Json(recipe))
}

async fn update(
    State(state): State<AppState>,
    Id(recipe_id): Id<RecipeId>,
    Payload(changes): Payload<RecipeUpdate>,
) -> ApiResult<Json<RecipeDetail>> {
    let recipe = state
        .transaction(move |conn| query::recipe::update(conn, recipe_id, &changes))
        .await?;
    Ok(Json(recipe))
}

async fn remove(
    State(state): State<AppState>,
    Id(recipe_id): Id<RecipeId>,
) -> ApiResult<StatusCode> {
    state
        .transaction(move |conn| query::recipe::delete(conn, recipe_id))
        .await?;
    log::info!("deleted recipe {recipe_id}");
    Ok(StatusCode::NO_CONTENT)
}
