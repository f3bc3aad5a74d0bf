// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{Direction, Recipe, RecipeDetail, RecipeId, RecipeIngredientDetail};
use crate::error::{ApiError, ApiResult};
use crate::payload::{Pagination, RecipeCreate, RecipeUpdate};
use crate::query::recipe_ingredient;
use diesel::prelude::OptionalExtension as _;
use diesel::BelongingToDsl as _;
use diesel::ExpressionMethods as _;
use diesel::GroupedBy as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use std::collections::HashMap;

pub fn find(conn: &mut database::Connection, find_id: RecipeId) -> ApiResult<Recipe> {
    use database::schema::recipes::dsl::*;

    recipes
        .find(find_id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Recipe", find_id))
}

fn with_children(conn: &mut database::Connection, recipe: Recipe) -> ApiResult<RecipeDetail> {
    use database::schema::directions::dsl::*;

    let recipe_directions = Direction::belonging_to(&recipe)
        .select(Direction::as_select())
        .order(direction_number)
        .load(conn)?;
    let recipe_ingredients = recipe_ingredient::for_recipes(conn, vec![recipe.id])?;
    Ok(RecipeDetail {
        recipe,
        directions: recipe_directions,
        recipe_ingredients,
    })
}

pub fn get(conn: &mut database::Connection, get_id: RecipeId) -> ApiResult<RecipeDetail> {
    let recipe = find(conn, get_id)?;
    with_children(conn, recipe)
}

pub fn list(conn: &mut database::Connection, page: Pagination) -> ApiResult<Vec<RecipeDetail>> {
    let page_of_recipes: Vec<Recipe> = {
        use database::schema::recipes::dsl::*;

        recipes
            .select(Recipe::as_select())
            .order(id)
            .offset(page.offset)
            .limit(page.limit)
            .load(conn)?
    };

    let grouped_directions = {
        use database::schema::directions::dsl::*;

        Direction::belonging_to(&page_of_recipes)
            .select(Direction::as_select())
            .order(direction_number)
            .load(conn)?
            .grouped_by(&page_of_recipes)
    };

    let ids = page_of_recipes.iter().map(|r| r.id).collect();
    let mut usages: HashMap<RecipeId, Vec<RecipeIngredientDetail>> = HashMap::new();
    for usage in recipe_ingredient::for_recipes(conn, ids)? {
        usages.entry(usage.usage.recipe_id).or_default().push(usage);
    }

    Ok(page_of_recipes
        .into_iter()
        .zip(grouped_directions)
        .map(|(recipe, directions)| RecipeDetail {
            recipe_ingredients: usages.remove(&recipe.id).unwrap_or_default(),
            recipe,
            directions,
        })
        .collect())
}

pub fn create(
    conn: &mut database::Connection,
    new_recipe: &RecipeCreate,
) -> ApiResult<RecipeDetail> {
    use database::schema::recipes::dsl::*;
    use diesel::insert_into;

    let recipe = insert_into(recipes)
        .values(new_recipe)
        .returning(Recipe::as_returning())
        .get_result(conn)?;
    with_children(conn, recipe)
}

pub fn update(
    conn: &mut database::Connection,
    edit_id: RecipeId,
    changes: &RecipeUpdate,
) -> ApiResult<RecipeDetail> {
    use database::schema::recipes::dsl::*;

    let recipe = find(conn, edit_id)?;
    if changes.is_empty() {
        return with_children(conn, recipe);
    }

    let recipe = diesel::update(recipes.find(edit_id))
        .set(changes)
        .returning(Recipe::as_returning())
        .get_result(conn)?;
    with_children(conn, recipe)
}

/// Removes the recipe with its directions, ingredient usages and schedules.
pub fn delete(conn: &mut database::Connection, delete_id: RecipeId) -> ApiResult<()> {
    use database::schema::{directions, recipe_ingredients, recipes, schedules};
    use diesel::delete as delete_from;

    find(conn, delete_id)?;

    // Owned rows first; the schema cascades as well.
    delete_from(directions::table.filter(directions::recipe_id.eq(delete_id))).execute(conn)?;
    delete_from(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(delete_id)))
        .execute(conn)?;
    delete_from(schedules::table.filter(schedules::recipe_id.eq(delete_id))).execute(conn)?;
    delete_from(recipes::table.find(delete_id)).execute(conn)?;
    Ok(())
}
