// Copyright 2023 Remi Bernotavicius

use derive_more::Display;
use diesel::associations::{Associations, Identifiable};
use diesel::deserialize::Queryable;
use diesel::expression::Selectable;
use diesel::prelude::Insertable;
use diesel_derive_enum::DbEnum;
use diesel_derive_newtype::DieselNewType;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

#[derive(
    DieselNewType, Debug, Display, Hash, PartialEq, Eq, Copy, Clone, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnitId(pub i32);

#[derive(
    DieselNewType, Debug, Display, Hash, PartialEq, Eq, Copy, Clone, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnitConversionId(pub i32);

#[derive(
    DieselNewType, Debug, Display, Hash, PartialEq, Eq, Copy, Clone, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct IngredientId(pub i32);

#[derive(
    DieselNewType, Debug, Display, Hash, PartialEq, Eq, Copy, Clone, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecipeId(pub i32);

#[derive(
    DieselNewType, Debug, Display, Hash, PartialEq, Eq, Copy, Clone, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DirectionId(pub i32);

#[derive(
    DieselNewType, Debug, Display, Hash, PartialEq, Eq, Copy, Clone, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecipeIngredientId(pub i32);

#[derive(
    DieselNewType, Debug, Display, Hash, PartialEq, Eq, Copy, Clone, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ScheduleId(pub i32);

#[derive(
    Debug, Display, EnumIter, Hash, Copy, Clone, PartialEq, Eq, DbEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    #[display("volume")]
    Volume,
    #[display("weight")]
    Weight,
    #[display("quantity")]
    Quantity,
    #[display("length")]
    Length,
}

impl UnitCategory {
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

#[derive(
    Debug, Display, EnumIter, Hash, Copy, Clone, PartialEq, Eq, DbEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IngredientCategory {
    #[display("produce")]
    Produce,
    #[display("meat")]
    Meat,
    #[display("dairy")]
    Dairy,
    #[display("grains")]
    Grains,
    #[display("spices")]
    Spices,
    #[display("pantry")]
    Pantry,
    #[display("other")]
    Other,
}

impl IngredientCategory {
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

#[derive(
    Debug, Display, EnumIter, Hash, Copy, Clone, PartialEq, Eq, DbEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    #[display("breakfast")]
    Breakfast,
    #[display("lunch")]
    Lunch,
    #[display("dinner")]
    Dinner,
    #[display("snacks")]
    Snacks,
}

#[derive(Queryable, Selectable, Identifiable, Clone, Debug, PartialEq, Serialize)]
#[diesel(table_name = crate::database::schema::measurement_units)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MeasurementUnit {
    pub id: UnitId,
    pub name: String,
    pub abbreviation: String,
    pub category: UnitCategory,
    pub is_metric: bool,
    pub is_common: bool,
}

/// Multiply a quantity expressed in `from_unit_id` by `ratio` to get `to_unit_id`.
#[derive(Queryable, Selectable, Identifiable, Clone, Debug, PartialEq, Serialize)]
#[diesel(table_name = crate::database::schema::unit_conversions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UnitConversion {
    pub id: UnitConversionId,
    pub from_unit_id: UnitId,
    pub to_unit_id: UnitId,
    pub ratio: f64,
}

#[derive(Associations, Queryable, Selectable, Identifiable, Clone, Debug, Serialize)]
#[diesel(belongs_to(MeasurementUnit, foreign_key = preferred_unit_id))]
#[diesel(table_name = crate::database::schema::ingredients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub preferred_unit_id: UnitId,
    pub category: IngredientCategory,
    pub description: Option<String>,
}

#[derive(Queryable, Selectable, Identifiable, Clone, Debug, PartialEq, Serialize)]
#[diesel(table_name = crate::database::schema::recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub description: String,
    pub cooking_time: i32,
    pub servings: i32,
}

#[derive(Associations, Queryable, Selectable, Identifiable, Clone, Debug, Serialize)]
#[diesel(belongs_to(Recipe))]
#[diesel(table_name = crate::database::schema::directions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Direction {
    pub id: DirectionId,
    pub recipe_id: RecipeId,
    pub direction_number: i32,
    pub instruction: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::directions)]
pub struct NewDirection<'a> {
    pub recipe_id: RecipeId,
    pub direction_number: i32,
    pub instruction: &'a str,
}

#[derive(Associations, Queryable, Selectable, Identifiable, Clone, Debug, Serialize)]
#[diesel(belongs_to(Recipe))]
#[diesel(belongs_to(Ingredient))]
#[diesel(belongs_to(MeasurementUnit, foreign_key = unit_id))]
#[diesel(table_name = crate::database::schema::recipe_ingredients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecipeIngredient {
    pub id: RecipeIngredientId,
    pub recipe_id: RecipeId,
    pub ingredient_id: IngredientId,
    pub quantity: f64,
    pub unit_id: UnitId,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::recipe_ingredients)]
pub struct NewRecipeIngredient {
    pub recipe_id: RecipeId,
    pub ingredient_id: IngredientId,
    pub quantity: f64,
    pub unit_id: UnitId,
}

#[derive(Associations, Queryable, Selectable, Identifiable, Clone, Debug, Serialize)]
#[diesel(belongs_to(Recipe))]
#[diesel(table_name = crate::database::schema::schedules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Schedule {
    pub id: ScheduleId,
    pub recipe_id: RecipeId,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub meal_type: Option<MealType>,
    pub notes: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::schedules)]
pub struct NewSchedule<'a> {
    pub recipe_id: RecipeId,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub meal_type: Option<MealType>,
    pub notes: Option<&'a str>,
}

#[derive(Clone, Debug, Serialize)]
pub struct IngredientDetail {
    #[serde(flatten)]
    pub ingredient: Ingredient,
    pub preferred_unit: MeasurementUnit,
}

#[derive(Clone, Debug, Serialize)]
pub struct RecipeIngredientDetail {
    #[serde(flatten)]
    pub usage: RecipeIngredient,
    pub ingredient: Ingredient,
    pub unit: MeasurementUnit,
}

#[derive(Clone, Debug, Serialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub directions: Vec<Direction>,
    pub recipe_ingredients: Vec<RecipeIngredientDetail>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScheduleDetail {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub recipe: Recipe,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Conversion {
    pub from_unit_id: UnitId,
    pub to_unit_id: UnitId,
    pub quantity: f64,
    pub ratio: f64,
    pub converted_quantity: f64,
}
