// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{
    Conversion, MeasurementUnit, UnitConversion, UnitConversionId, UnitId,
};
use crate::error::{ApiError, ApiResult};
use crate::payload::{ConversionFilter, ConvertQuery, UnitConversionCreate, UnitFilter};
use crate::units::ConversionGraph;
use diesel::prelude::OptionalExtension as _;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;

pub fn find(conn: &mut database::Connection, find_id: UnitId) -> ApiResult<MeasurementUnit> {
    use database::schema::measurement_units::dsl::*;

    measurement_units
        .find(find_id)
        .select(MeasurementUnit::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Measurement unit", find_id))
}

pub fn list(
    conn: &mut database::Connection,
    filter: UnitFilter,
) -> ApiResult<Vec<MeasurementUnit>> {
    use database::schema::measurement_units::dsl::*;

    let mut query = measurement_units
        .select(MeasurementUnit::as_select())
        .into_boxed();
    if let Some(wanted) = filter.category {
        query = query.filter(category.eq(wanted));
    }
    if let Some(wanted) = filter.is_metric {
        query = query.filter(is_metric.eq(wanted));
    }
    if let Some(wanted) = filter.is_common {
        query = query.filter(is_common.eq(wanted));
    }
    Ok(query.order(id).load(conn)?)
}

pub fn list_conversions(
    conn: &mut database::Connection,
    filter: ConversionFilter,
) -> ApiResult<Vec<UnitConversion>> {
    use database::schema::unit_conversions::dsl::*;

    let mut query = unit_conversions
        .select(UnitConversion::as_select())
        .into_boxed();
    if let Some(wanted) = filter.from_unit_id {
        query = query.filter(from_unit_id.eq(wanted));
    }
    if let Some(wanted) = filter.to_unit_id {
        query = query.filter(to_unit_id.eq(wanted));
    }
    Ok(query.order(id).load(conn)?)
}

pub fn create_conversion(
    conn: &mut database::Connection,
    new_conversion: &UnitConversionCreate,
) -> ApiResult<UnitConversion> {
    use database::schema::unit_conversions::dsl::*;
    use diesel::insert_into;

    let from = find(conn, new_conversion.from_unit_id)?;
    let to = find(conn, new_conversion.to_unit_id)?;

    let existing: Option<UnitConversionId> = unit_conversions
        .select(id)
        .filter(from_unit_id.eq(from.id))
        .filter(to_unit_id.eq(to.id))
        .first(conn)
        .optional()?;
    if existing.is_some() {
        return Err(ApiError::conflict(format!(
            "Conversion from {} to {} already exists",
            from.name, to.name
        )));
    }

    Ok(insert_into(unit_conversions)
        .values(new_conversion)
        .returning(UnitConversion::as_returning())
        .get_result(conn)?)
}

pub fn delete_conversion(
    conn: &mut database::Connection,
    delete_id: UnitConversionId,
) -> ApiResult<()> {
    use database::schema::unit_conversions::dsl::*;

    let deleted = diesel::delete(unit_conversions.find(delete_id)).execute(conn)?;
    if deleted == 0 {
        return Err(ApiError::not_found("Unit conversion", delete_id));
    }
    Ok(())
}

/// Expresses `query.quantity` of one unit in another unit of the same category.
pub fn convert(conn: &mut database::Connection, query: ConvertQuery) -> ApiResult<Conversion> {
    let from = find(conn, query.from_unit_id)?;
    let to = find(conn, query.to_unit_id)?;
    if from.category != to.category {
        return Err(ApiError::BadRequest(format!(
            "Cannot convert {} ({}) to {} ({})",
            from.name, from.category, to.name, to.category
        )));
    }

    let conversions = list_conversions(conn, ConversionFilter::default())?;
    let ratio = ConversionGraph::new(&conversions)
        .conversion_factor(from.id, to.id)
        .ok_or_else(|| {
            ApiError::BadRequest(format!(
                "No conversion known from {} to {}",
                from.name, to.name
            ))
        })?;

    Ok(Conversion {
        from_unit_id: from.id,
        to_unit_id: to.id,
        quantity: query.quantity,
        ratio,
        converted_quantity: query.quantity * ratio,
    })
}
