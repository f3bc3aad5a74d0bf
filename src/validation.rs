// Copyright 2023 Remi Bernotavicius

use std::fmt;

/// Field-level contract violations found in a request, in the order they were checked.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(&'static str, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|(field, _)| *field)
    }

    pub fn not_blank(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "must not be blank");
        }
    }

    pub fn at_least_one(&mut self, field: &'static str, value: i32) {
        if value < 1 {
            self.add(field, "must be greater than 0");
        }
    }

    pub fn positive(&mut self, field: &'static str, value: f64) {
        if !value.is_finite() || value <= 0.0 {
            self.add(field, "must be a finite number greater than 0");
        }
    }

    pub fn date_range(&mut self, start: chrono::NaiveDate, end: chrono::NaiveDate) {
        if end < start {
            self.add("end_date", "must not be before start_date");
        }
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Request payloads check their own field contracts before anything touches the database.
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

#[test]
fn collects_every_failing_field() {
    let mut errors = FieldErrors::new();
    errors.not_blank("title", "  ");
    errors.at_least_one("servings", 0);
    errors.positive("quantity", f64::NAN);
    errors.at_least_one("cooking_time", 5);

    assert_eq!(
        errors.fields().collect::<Vec<_>>(),
        ["title", "servings", "quantity"]
    );
    assert_eq!(
        errors.to_string(),
        "title: must not be blank; servings: must be greater than 0; \
         quantity: must be a finite number greater than 0"
    );
}

#[test]
fn date_range_allows_single_day() {
    let day = chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
    let mut errors = FieldErrors::new();
    errors.date_range(day, day);
    assert!(errors.into_result().is_ok());

    let mut errors = FieldErrors::new();
    errors.date_range(day, day.pred_opt().unwrap());
    assert_eq!(errors.fields().collect::<Vec<_>>(), ["end_date"]);
}
