// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{
    Ingredient, MeasurementUnit, NewRecipeIngredient, RecipeId, RecipeIngredient,
    RecipeIngredientDetail, RecipeIngredientId,
};
use crate::error::{ApiError, ApiResult};
use crate::payload::RecipeIngredientCreate;
use crate::query::{ingredient, recipe, unit};
use diesel::prelude::OptionalExtension as _;
use diesel::ExpressionMethods as _;
use diesel::JoinOnDsl as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;

enum Scope {
    Recipes(Vec<RecipeId>),
    One(RecipeIngredientId),
}

fn load_details(
    conn: &mut database::Connection,
    scope: Scope,
) -> ApiResult<Vec<RecipeIngredientDetail>> {
    use database::schema::{ingredients, measurement_units, recipe_ingredients};

    let mut query = recipe_ingredients::table
        .inner_join(ingredients::table)
        .inner_join(
            measurement_units::table.on(measurement_units::id.eq(recipe_ingredients::unit_id)),
        )
        .select((
            RecipeIngredient::as_select(),
            Ingredient::as_select(),
            MeasurementUnit::as_select(),
        ))
        .into_boxed();
    query = match scope {
        Scope::Recipes(recipe_ids) => {
            query.filter(recipe_ingredients::recipe_id.eq_any(recipe_ids))
        }
        Scope::One(usage_id) => query.filter(recipe_ingredients::id.eq(usage_id)),
    };

    Ok(query
        .order(recipe_ingredients::id)
        .load::<(RecipeIngredient, Ingredient, MeasurementUnit)>(conn)?
        .into_iter()
        .map(|(usage, ingredient, unit)| RecipeIngredientDetail {
            usage,
            ingredient,
            unit,
        })
        .collect())
}

/// Every ingredient usage of the given recipes, with the ingredient and unit resolved.
pub fn for_recipes(
    conn: &mut database::Connection,
    recipe_ids: Vec<RecipeId>,
) -> ApiResult<Vec<RecipeIngredientDetail>> {
    if recipe_ids.is_empty() {
        return Ok(vec![]);
    }
    load_details(conn, Scope::Recipes(recipe_ids))
}

pub fn list_for_recipe(
    conn: &mut database::Connection,
    owner: RecipeId,
) -> ApiResult<Vec<RecipeIngredientDetail>> {
    recipe::find(conn, owner)?;
    for_recipes(conn, vec![owner])
}

pub fn get(
    conn: &mut database::Connection,
    get_id: RecipeIngredientId,
) -> ApiResult<RecipeIngredientDetail> {
    load_details(conn, Scope::One(get_id))?
        .pop()
        .ok_or_else(|| ApiError::not_found("Recipe ingredient", get_id))
}

fn find(
    conn: &mut database::Connection,
    find_id: RecipeIngredientId,
) -> ApiResult<RecipeIngredient> {
    use database::schema::recipe_ingredients::dsl::*;

    recipe_ingredients
        .find(find_id)
        .select(RecipeIngredient::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Recipe ingredient", find_id))
}

pub fn create(
    conn: &mut database::Connection,
    owner: RecipeId,
    new_usage: &RecipeIngredientCreate,
) -> ApiResult<RecipeIngredientDetail> {
    use database::schema::recipe_ingredients::dsl::*;
    use diesel::insert_into;

    recipe::find(conn, owner)?;
    ingredient::find(conn, new_usage.ingredient_id)?;
    unit::find(conn, new_usage.unit_id)?;

    let new_id = insert_into(recipe_ingredients)
        .values(NewRecipeIngredient {
            recipe_id: owner,
            ingredient_id: new_usage.ingredient_id,
            quantity: new_usage.quantity,
            unit_id: new_usage.unit_id,
        })
        .returning(id)
        .get_result(conn)?;
    get(conn, new_id)
}

pub fn update(
    conn: &mut database::Connection,
    edit_id: RecipeIngredientId,
    changes: &RecipeIngredientCreate,
) -> ApiResult<RecipeIngredientDetail> {
    use database::schema::recipe_ingredients::dsl::*;

    find(conn, edit_id)?;
    ingredient::find(conn, changes.ingredient_id)?;
    unit::find(conn, changes.unit_id)?;

    diesel::update(recipe_ingredients.find(edit_id))
        .set((
            ingredient_id.eq(changes.ingredient_id),
            quantity.eq(changes.quantity),
            unit_id.eq(changes.unit_id),
        ))
        .execute(conn)?;
    get(conn, edit_id)
}

pub fn delete(conn: &mut database::Connection, delete_id: RecipeIngredientId) -> ApiResult<()> {
    use database::schema::recipe_ingredients::dsl::*;

    find(conn, delete_id)?;
    diesel::delete(recipe_ingredients.find(delete_id)).execute(conn)?;
    Ok(())
}
