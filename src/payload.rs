// Copyright 2023 Remi Bernotavicius

//! Request bodies and query strings accepted by the API, with their field contracts.

use crate::database::models::{IngredientCategory, MealType, UnitCategory, UnitId};
use crate::database::schema;
use crate::validation::{FieldErrors, Validate};
use diesel::prelude::{AsChangeset, Insertable};
use serde::{Deserialize, Deserializer};

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    fn check(&self, errors: &mut FieldErrors) {
        if self.offset < 0 {
            errors.add("offset", "must not be negative");
        }
        if !(1..=MAX_LIMIT).contains(&self.limit) {
            errors.add("limit", format!("must be between 1 and {MAX_LIMIT}"));
        }
    }
}

impl Validate for Pagination {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        self.check(&mut errors);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize, Insertable)]
#[diesel(table_name = schema::recipes)]
pub struct RecipeCreate {
    pub title: String,
    pub description: String,
    pub cooking_time: i32,
    pub servings: i32,
}

impl Validate for RecipeCreate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.not_blank("title", &self.title);
        errors.at_least_one("cooking_time", self.cooking_time);
        errors.at_least_one("servings", self.servings);
        errors.into_result()
    }
}

/// Omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize, AsChangeset)]
#[diesel(table_name = schema::recipes)]
pub struct RecipeUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cooking_time: Option<i32>,
    pub servings: Option<i32>,
}

impl RecipeUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.cooking_time.is_none()
            && self.servings.is_none()
    }
}

impl Validate for RecipeUpdate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(title) = &self.title {
            errors.not_blank("title", title);
        }
        if let Some(cooking_time) = self.cooking_time {
            errors.at_least_one("cooking_time", cooking_time);
        }
        if let Some(servings) = self.servings {
            errors.at_least_one("servings", servings);
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize, AsChangeset)]
#[diesel(table_name = schema::directions)]
pub struct DirectionCreate {
    pub direction_number: i32,
    pub instruction: String,
}

impl Validate for DirectionCreate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.at_least_one("direction_number", self.direction_number);
        errors.not_blank("instruction", &self.instruction);
        errors.into_result()
    }
}

/// Used for both creation and full replacement; a missing description clears it.
#[derive(Debug, Clone, Deserialize, Insertable, AsChangeset)]
#[diesel(table_name = schema::ingredients)]
#[diesel(treat_none_as_null = true)]
pub struct IngredientCreate {
    pub name: String,
    pub preferred_unit_id: UnitId,
    pub category: IngredientCategory,
    pub description: Option<String>,
}

impl Validate for IngredientCreate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.not_blank("name", &self.name);
        errors.into_result()
    }
}

// Query strings cannot use `#[serde(flatten)]` for numbers, so the page fields are repeated.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientFilter {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub category: Option<IngredientCategory>,
    pub search: Option<String>,
}

impl IngredientFilter {
    pub fn page(&self) -> Pagination {
        Pagination {
            offset: self.offset,
            limit: self.limit,
        }
    }
}

impl Validate for IngredientFilter {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        self.page().check(&mut errors);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecipeIngredientCreate {
    pub ingredient_id: crate::database::models::IngredientId,
    pub quantity: f64,
    pub unit_id: UnitId,
}

impl Validate for RecipeIngredientCreate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.positive("quantity", self.quantity);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct UnitFilter {
    pub category: Option<UnitCategory>,
    pub is_metric: Option<bool>,
    pub is_common: Option<bool>,
}

impl Validate for UnitFilter {
    fn validate(&self) -> Result<(), FieldErrors> {
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Insertable)]
#[diesel(table_name = schema::unit_conversions)]
pub struct UnitConversionCreate {
    pub from_unit_id: UnitId,
    pub to_unit_id: UnitId,
    pub ratio: f64,
}

impl Validate for UnitConversionCreate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.positive("ratio", self.ratio);
        if self.from_unit_id == self.to_unit_id {
            errors.add("to_unit_id", "must differ from from_unit_id");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ConversionFilter {
    pub from_unit_id: Option<UnitId>,
    pub to_unit_id: Option<UnitId>,
}

impl Validate for ConversionFilter {
    fn validate(&self) -> Result<(), FieldErrors> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ConvertQuery {
    pub from_unit_id: UnitId,
    pub to_unit_id: UnitId,
    pub quantity: f64,
}

impl Validate for ConvertQuery {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            errors.add("quantity", "must be a finite number not less than 0");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleCreate {
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub meal_type: Option<MealType>,
    pub notes: Option<String>,
}

impl Validate for ScheduleCreate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.date_range(self.start_date, self.end_date);
        errors.into_result()
    }
}

/// Tells an absent field (`None`) apart from an explicit `null` (`Some(None)`).
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Omitted fields keep their stored values; `meal_type` and `notes` are cleared by `null`.
#[derive(Debug, Clone, Default, Deserialize, AsChangeset)]
#[diesel(table_name = schema::schedules)]
pub struct ScheduleUpdate {
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    #[serde(default, deserialize_with = "present")]
    pub meal_type: Option<Option<MealType>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

impl ScheduleUpdate {
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.meal_type.is_none()
            && self.notes.is_none()
    }
}

impl Validate for ScheduleUpdate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            errors.date_range(start, end);
        }
        errors.into_result()
    }
}

/// Both bounds are inclusive. An inverted range is accepted and matches nothing.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DateRange {
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
}

impl DateRange {
    pub fn is_inverted(&self) -> bool {
        self.end_date < self.start_date
    }
}

impl Validate for DateRange {
    fn validate(&self) -> Result<(), FieldErrors> {
        Ok(())
    }
}
