// Copyright 2023 Remi Bernotavicius

//! Reads and writes for each resource. Every function expects to run inside the caller's
//! transaction, so a failure part-way through leaves nothing behind.

pub mod direction;
pub mod ingredient;
pub mod recipe;
pub mod recipe_ingredient;
pub mod schedule;
pub mod unit;
