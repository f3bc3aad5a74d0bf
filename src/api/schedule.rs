// Copyright 2023 Remi Bernotavicius

use super::extract::{Id, Params, Payload};
use super::AppState;
use crate::database::models::{RecipeId, ScheduleDetail, ScheduleId};
use crate::error::ApiResult;
use crate::payload::{DateRange, ScheduleCreate, ScheduleUpdate};
use crate::query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/schedule/recipe/:recipe_id", post(create))
        .route("/schedule/range", get(range))
        .route("/schedule/range/", get(range))
        .route("/schedule/:id", get(read).put(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    Id(recipe_id): Id<RecipeId>,
    Payload(new_schedule): Payload<ScheduleCreate>,
) -> ApiResult<(StatusCode, Json<ScheduleDetail>)> {
    let schedule = state
        .transaction(move |conn| query::schedule::create(conn, recipe_id, &new_schedule))
        .await?;
    log::info!(
        "scheduled recipe {recipe_id} from {} to {}",
        schedule.schedule.start_date,
        schedule.schedule.end_date
    );
    Ok((StatusCode::CREATED, Json(schedule)))
}

async fn range(
    State(state): State<AppState>,
    Params(dates): Params<DateRange>,
) -> ApiResult<Json<Vec<ScheduleDetail>>> {
    let schedules = state
        .transaction(move |conn| query::schedule::range(conn, dates))
        .await?;
    Ok(Json(schedules))
}

async fn read(
    State(state): State<AppState>,
    Id(schedule_id): Id<ScheduleId>,
) -> ApiResult<Json<ScheduleDetail>> {
    let schedule = state
        .transaction(move |conn| query::schedule::get(conn, schedule_id))
        .await?;
    Ok(Json(schedule))
}

async fn update(
    State(state): State<AppState>,
    Id(schedule_id): Id<ScheduleId>,
    Payload(changes): Payload<ScheduleUpdate>,
) -> ApiResult<Json<ScheduleDetail>> {
    let schedule = state
        .transaction(move |conn| query::schedule::update(conn, schedule_id, &changes))
        .await?;
    Ok(Json(schedule))
}

async fn remove(
    State(state): State<AppState>,
    Id(schedule_id): Id<ScheduleId>,
) -> ApiResult<StatusCode> {
    state
        .transaction(move |conn| query::schedule::delete(conn, schedule_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
