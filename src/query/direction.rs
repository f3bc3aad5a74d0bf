// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{Direction, DirectionId, NewDirection, RecipeId};
use crate::error::{ApiError, ApiResult};
use crate::payload::DirectionCreate;
use crate::query::recipe;
use diesel::prelude::OptionalExtension as _;
use diesel::BelongingToDsl as _;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;

/// A recipe's direction numbers are unique; `except` lets a direction keep its own number.
fn ensure_number_free(
    conn: &mut database::Connection,
    owner: RecipeId,
    number: i32,
    except: Option<DirectionId>,
) -> ApiResult<()> {
    use database::schema::directions::dsl::*;

    let mut query = directions
        .select(id)
        .filter(recipe_id.eq(owner))
        .filter(direction_number.eq(number))
        .into_boxed();
    if let Some(except) = except {
        query = query.filter(id.ne(except));
    }

    let taken: Option<DirectionId> = query.first(conn).optional()?;
    match taken {
        Some(_) => Err(ApiError::conflict(format!(
            "Direction number {number} already exists for recipe {owner}"
        ))),
        None => Ok(()),
    }
}

pub fn create(
    conn: &mut database::Connection,
    owner: RecipeId,
    new_direction: &DirectionCreate,
) -> ApiResult<Direction> {
    use database::schema::directions::dsl::*;
    use diesel::insert_into;

    recipe::find(conn, owner)?;
    ensure_number_free(conn, owner, new_direction.direction_number, None)?;

    Ok(insert_into(directions)
        .values(NewDirection {
            recipe_id: owner,
            direction_number: new_direction.direction_number,
            instruction: &new_direction.instruction,
        })
        .returning(Direction::as_returning())
        .get_result(conn)?)
}

pub fn list_for_recipe(
    conn: &mut database::Connection,
    owner: RecipeId,
) -> ApiResult<Vec<Direction>> {
    use database::schema::directions::dsl::*;

    let recipe = recipe::find(conn, owner)?;
    Ok(Direction::belonging_to(&recipe)
        .select(Direction::as_select())
        .order(direction_number)
        .load(conn)?)
}

pub fn get(conn: &mut database::Connection, get_id: DirectionId) -> ApiResult<Direction> {
    use database::schema::directions::dsl::*;

    directions
        .find(get_id)
        .select(Direction::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Direction", get_id))
}

pub fn update(
    conn: &mut database::Connection,
    edit_id: DirectionId,
    changes: &DirectionCreate,
) -> ApiResult<Direction> {
    use database::schema::directions::dsl::*;

    let existing = get(conn, edit_id)?;
    ensure_number_free(
        conn,
        existing.recipe_id,
        changes.direction_number,
        Some(edit_id),
    )?;

    Ok(diesel::update(directions.find(edit_id))
        .set(changes)
        .returning(Direction::as_returning())
        .get_result(conn)?)
}

pub fn delete(conn: &mut database::Connection, delete_id: DirectionId) -> ApiResult<()> {
    use database::schema::directions::dsl::*;

    get(conn, delete_id)?;
    diesel::delete(directions.find(delete_id)).execute(conn)?;
    Ok(())
}
