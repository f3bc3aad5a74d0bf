// Copyright 2023 Remi Bernotavicius

use super::extract::{Id, Params, Payload};
use super::AppState;
use crate::database::models::{
    Conversion, MeasurementUnit, UnitCategory, UnitConversion, UnitConversionId, UnitId,
};
use crate::error::ApiResult;
use crate::payload::{ConversionFilter, ConvertQuery, UnitConversionCreate, UnitFilter};
use crate::query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/units", get(list))
        .route("/units/", get(list))
        .route("/units/categories", get(categories))
        .route("/units/conversions", get(list_conversions).post(create_conversion))
        .route("/units/conversions/:id", delete(remove_conversion))
        .route("/units/convert", get(convert))
        .route("/units/:id", get(read))
}

async fn categories() -> Json<Vec<UnitCategory>> {
    Json(UnitCategory::iter().collect())
}

async fn list(
    State(state): State<AppState>,
    Params(filter): Params<UnitFilter>,
) -> ApiResult<Json<Vec<MeasurementUnit>>> {
    let units = state
        .transaction(move |conn| query::unit::list(conn, filter))
        .await?;
    Ok(Json(units))
}

async fn read(
    State(state): State<AppState>,
    Id(unit_id): Id<UnitId>,
) -> ApiResult<Json<MeasurementUnit>> {
    let unit = state
        .transaction(move |conn| query::unit::find(conn, unit_id))
        .await?;
    Ok(Json(unit))
}

async fn list_conversions(
    State(state): State<AppState>,
    Params(filter): Params<ConversionFilter>,
) -> ApiResult<Json<Vec<UnitConversion>>> {
    let conversions = state
        .transaction(move |conn| query::unit::list_conversions(conn, filter))
        .await?;
    Ok(Json(conversions))
}

async fn create_conversion(
    State(state): State<AppState>,
    Payload(new_conversion): Payload<UnitConversionCreate>,
) -> ApiResult<(StatusCode, Json<UnitConversion>)> {
    let conversion = state
        .transaction(move |conn| query::unit::create_conversion(conn, &new_conversion))
        .await?;
    Ok((StatusCode::CREATED, Json(conversion)))
}

async fn remove_conversion(
    State(state): State<AppState>,
    Id(conversion_id): Id<UnitConversionId>,
) -> ApiResult<StatusCode> {
    state
        .transaction(move |conn| query::unit::delete_conversion(conn, conversion_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn convert(
    State(state): State<AppState>,
    Params(request): Params<ConvertQuery>,
) -> ApiResult<Json<Conversion>> {
    let conversion = state
        .transaction(move |conn| query::unit::convert(conn, request))
        .await?;
    Ok(Json(conversion))
}
