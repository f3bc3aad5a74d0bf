// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{Ingredient, IngredientDetail, IngredientId, MeasurementUnit};
use crate::error::{ApiError, ApiResult};
use crate::payload::{IngredientCreate, IngredientFilter};
use crate::query::unit;
use diesel::expression_methods::EscapeExpressionMethods as _;
use diesel::prelude::OptionalExtension as _;
use diesel::BoolExpressionMethods as _;
use diesel::ExpressionMethods as _;
use diesel::NullableExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use diesel::TextExpressionMethods as _;

pub fn find(conn: &mut database::Connection, find_id: IngredientId) -> ApiResult<Ingredient> {
    use database::schema::ingredients::dsl::*;

    ingredients
        .find(find_id)
        .select(Ingredient::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Ingredient", find_id))
}

pub fn get(conn: &mut database::Connection, get_id: IngredientId) -> ApiResult<IngredientDetail> {
    use database::schema::{ingredients, measurement_units};

    ingredients::table
        .inner_join(measurement_units::table)
        .filter(ingredients::id.eq(get_id))
        .select((Ingredient::as_select(), MeasurementUnit::as_select()))
        .first::<(Ingredient, MeasurementUnit)>(conn)
        .optional()?
        .map(|(ingredient, preferred_unit)| IngredientDetail {
            ingredient,
            preferred_unit,
        })
        .ok_or_else(|| ApiError::not_found("Ingredient", get_id))
}

/// `LIKE` pattern matching `term` anywhere, with the wildcard characters taken literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub fn list(
    conn: &mut database::Connection,
    filter: &IngredientFilter,
) -> ApiResult<Vec<IngredientDetail>> {
    use database::schema::{ingredients, measurement_units};

    let mut query = ingredients::table
        .inner_join(measurement_units::table)
        .select((Ingredient::as_select(), MeasurementUnit::as_select()))
        .into_boxed();
    if let Some(wanted) = filter.category {
        query = query.filter(ingredients::category.eq(wanted));
    }
    if let Some(term) = &filter.search {
        // SQLite's LIKE already ignores ASCII case.
        let pattern = contains_pattern(term);
        query = query.filter(
            ingredients::name.like(pattern.clone()).escape('\\').or(ingredients::description
                .assume_not_null()
                .like(pattern)
                .escape('\\')),
        );
    }

    let page = filter.page();
    Ok(query
        .order(ingredients::id)
        .offset(page.offset)
        .limit(page.limit)
        .load::<(Ingredient, MeasurementUnit)>(conn)?
        .into_iter()
        .map(|(ingredient, preferred_unit)| IngredientDetail {
            ingredient,
            preferred_unit,
        })
        .collect())
}

fn ensure_name_free(
    conn: &mut database::Connection,
    wanted: &str,
    except: Option<IngredientId>,
) -> ApiResult<()> {
    use database::schema::ingredients::dsl::*;

    let mut query = ingredients.select(id).filter(name.eq(wanted)).into_boxed();
    if let Some(except) = except {
        query = query.filter(id.ne(except));
    }

    let taken: Option<IngredientId> = query.first(conn).optional()?;
    match taken {
        Some(_) => Err(ApiError::conflict(format!(
            "Ingredient with name '{wanted}' already exists"
        ))),
        None => Ok(()),
    }
}

pub fn create(
    conn: &mut database::Connection,
    new_ingredient: &IngredientCreate,
) -> ApiResult<IngredientDetail> {
    use database::schema::ingredients::dsl::*;
    use diesel::insert_into;

    unit::find(conn, new_ingredient.preferred_unit_id)?;
    ensure_name_free(conn, &new_ingredient.name, None)?;

    let new_id = insert_into(ingredients)
        .values(new_ingredient)
        .returning(id)
        .get_result(conn)?;
    get(conn, new_id)
}

/// Replaces every field of the ingredient.
pub fn update(
    conn: &mut database::Connection,
    edit_id: IngredientId,
    changes: &IngredientCreate,
) -> ApiResult<IngredientDetail> {
    use database::schema::ingredients::dsl::*;

    find(conn, edit_id)?;
    unit::find(conn, changes.preferred_unit_id)?;
    ensure_name_free(conn, &changes.name, Some(edit_id))?;

    diesel::update(ingredients.find(edit_id))
        .set(changes)
        .execute(conn)?;
    get(conn, edit_id)
}

/// Refuses while any recipe still uses the ingredient.
pub fn delete(conn: &mut database::Connection, delete_id: IngredientId) -> ApiResult<()> {
    use database::schema::{ingredients, recipe_ingredients};
    use diesel::dsl::count_distinct;

    find(conn, delete_id)?;

    let using_recipes: i64 = recipe_ingredients::table
        .filter(recipe_ingredients::ingredient_id.eq(delete_id))
        .select(count_distinct(recipe_ingredients::recipe_id))
        .get_result(conn)?;
    if using_recipes > 0 {
        return Err(ApiError::InUse(format!(
            "Cannot delete ingredient as it is used in {using_recipes} recipes"
        )));
    }

    diesel::delete(ingredients::table.find(delete_id)).execute(conn)?;
    Ok(())
}

#[test]
fn search_pattern_escapes_wildcards() {
    assert_eq!(contains_pattern("salt"), "%salt%");
    assert_eq!(contains_pattern("100%_rye"), "%100\\%\\_rye%");
    assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
}
