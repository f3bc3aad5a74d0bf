// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{
    NewSchedule, Recipe, RecipeId, Schedule, ScheduleDetail, ScheduleId,
};
use crate::error::{ApiError, ApiResult};
use crate::payload::{DateRange, ScheduleCreate, ScheduleUpdate};
use crate::query::recipe;
use diesel::prelude::OptionalExtension as _;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;

fn detail((schedule, recipe): (Schedule, Recipe)) -> ScheduleDetail {
    ScheduleDetail { schedule, recipe }
}

pub fn get(conn: &mut database::Connection, get_id: ScheduleId) -> ApiResult<ScheduleDetail> {
    use database::schema::{recipes, schedules};

    schedules::table
        .inner_join(recipes::table)
        .filter(schedules::id.eq(get_id))
        .select((Schedule::as_select(), Recipe::as_select()))
        .first::<(Schedule, Recipe)>(conn)
        .optional()?
        .map(detail)
        .ok_or_else(|| ApiError::not_found("Schedule", get_id))
}

fn find(conn: &mut database::Connection, find_id: ScheduleId) -> ApiResult<Schedule> {
    use database::schema::schedules::dsl::*;

    schedules
        .find(find_id)
        .select(Schedule::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Schedule", find_id))
}

pub fn create(
    conn: &mut database::Connection,
    owner: RecipeId,
    new_schedule: &ScheduleCreate,
) -> ApiResult<ScheduleDetail> {
    use database::schema::schedules::dsl::*;
    use diesel::insert_into;

    let recipe = recipe::find(conn, owner)?;
    let schedule = insert_into(schedules)
        .values(NewSchedule {
            recipe_id: owner,
            start_date: new_schedule.start_date,
            end_date: new_schedule.end_date,
            meal_type: new_schedule.meal_type,
            notes: new_schedule.notes.as_deref(),
        })
        .returning(Schedule::as_returning())
        .get_result(conn)?;
    Ok(ScheduleDetail { schedule, recipe })
}

/// Schedules sharing at least one day with `range`, earliest first.
pub fn range(conn: &mut database::Connection, range: DateRange) -> ApiResult<Vec<ScheduleDetail>> {
    use database::schema::{recipes, schedules};

    if range.is_inverted() {
        return Ok(vec![]);
    }

    Ok(schedules::table
        .inner_join(recipes::table)
        .filter(schedules::start_date.le(range.end_date))
        .filter(schedules::end_date.ge(range.start_date))
        .select((Schedule::as_select(), Recipe::as_select()))
        .order((schedules::start_date, schedules::id))
        .load::<(Schedule, Recipe)>(conn)?
        .into_iter()
        .map(detail)
        .collect())
}

pub fn update(
    conn: &mut database::Connection,
    edit_id: ScheduleId,
    changes: &ScheduleUpdate,
) -> ApiResult<ScheduleDetail> {
    use database::schema::schedules::dsl::*;

    let existing = find(conn, edit_id)?;
    if changes.is_empty() {
        return get(conn, edit_id);
    }

    let new_start = changes.start_date.unwrap_or(existing.start_date);
    let new_end = changes.end_date.unwrap_or(existing.end_date);
    if new_end < new_start {
        return Err(ApiError::conflict(format!(
            "end_date {new_end} must not be before start_date {new_start}"
        )));
    }

    diesel::update(schedules.find(edit_id))
        .set(changes)
        .execute(conn)?;
    get(conn, edit_id)
}

pub fn delete(conn: &mut database::Connection, delete_id: ScheduleId) -> ApiResult<()> {
    use database::schema::schedules::dsl::*;

    find(conn, delete_id)?;
    diesel::delete(schedules.find(delete_id)).execute(conn)?;
    Ok(())
}
