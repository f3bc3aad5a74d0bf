// Copyright 2023 Remi Bernotavicius

use super::{router, AppState, API_PREFIX};
use crate::database;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use maplit::hashset;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt as _;

const CUP: i64 = 6;
const TBSP: i64 = 4;
const GRAM: i64 = 11;
const KILOGRAM: i64 = 12;
const PIECE: i64 = 15;

struct TestApp {
    _dir: TempDir,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        Self::with_pool_size(2)
    }

    fn with_pool_size(pool_size: u32) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let pool = database::establish_pool(dir.path().join("test.sqlite"), pool_size).unwrap();
        Self {
            router: router(AppState::new(pool)),
            _dir: dir,
        }
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let uri = if path.starts_with('/') && path != "/" {
            format!("{API_PREFIX}{path}")
        } else {
            path.to_owned()
        };
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, path, None).await
    }

    async fn create_recipe(&self, title: &str) -> i64 {
        let (status, recipe) = self
            .post(
                "/recipe/",
                json!({
                    "title": title,
                    "description": "A test recipe",
                    "cooking_time": 30,
                    "servings": 4,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{recipe}");
        recipe["id"].as_i64().unwrap()
    }

    async fn create_ingredient(&self, name: &str, category: &str, unit_id: i64) -> i64 {
        let (status, ingredient) = self
            .post(
                "/ingredients/",
                json!({
                    "name": name,
                    "preferred_unit_id": unit_id,
                    "category": category,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{ingredient}");
        ingredient["id"].as_i64().unwrap()
    }

    async fn create_schedule(&self, recipe_id: i64, start: &str, end: &str) -> i64 {
        let (status, schedule) = self
            .post(
                &format!("/schedule/recipe/{recipe_id}"),
                json!({ "start_date": start, "end_date": end, "meal_type": "dinner" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{schedule}");
        schedule["id"].as_i64().unwrap()
    }
}

fn ids(values: &Value) -> HashSet<i64> {
    values
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn service_descriptor() {
    let app = TestApp::new();
    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["api"], API_PREFIX);
    assert_eq!(body["name"], "recipe-server");
}

#[tokio::test]
async fn created_recipe_reads_back() {
    let app = TestApp::new();
    let (status, created) = app
        .post(
            "/recipe/",
            json!({
                "title": "Pain pudding",
                "description": "It definitely hurts",
                "cooking_time": 45,
                "servings": 6,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_i64().unwrap();
    let (status, recipe) = app.get(&format!("/recipe/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recipe["title"], "Pain pudding");
    assert_eq!(recipe["description"], "It definitely hurts");
    assert_eq!(recipe["cooking_time"], 45);
    assert_eq!(recipe["servings"], 6);
    assert_eq!(recipe["directions"], json!([]));
    assert_eq!(recipe["recipe_ingredients"], json!([]));

    let (status, body) = app.get("/recipe/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Recipe with id 999 not found");
}

#[tokio::test]
async fn recipe_list_pages() {
    let app = TestApp::new();
    for title in ["Soup", "Salad", "Stew"] {
        app.create_recipe(title).await;
    }

    let (status, page) = app.get("/recipe/?offset=1&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page[0]["title"], "Salad");
    assert_eq!(page.as_array().unwrap().len(), 1);

    let (status, _) = app.get("/recipe/?limit=0").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = app.get("/recipe/?offset=abc").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn recipe_rejects_invalid_fields() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/recipe/",
            json!({ "title": " ", "description": "", "cooking_time": 0, "servings": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("title"), "{detail}");
    assert!(detail.contains("cooking_time"), "{detail}");

    let (status, _) = app.post("/recipe/", json!({ "title": "Soup" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, recipes) = app.get("/recipe/").await;
    assert_eq!(recipes, json!([]));
}

#[tokio::test]
async fn recipe_full_and_partial_update() {
    let app = TestApp::new();
    let id = app.create_recipe("Soup").await;

    let (status, replaced) = app
        .put(
            &format!("/recipe/{id}"),
            json!({
                "title": "Stew",
                "description": "Thicker",
                "cooking_time": 90,
                "servings": 8,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["title"], "Stew");
    assert_eq!(replaced["description"], "Thicker");
    assert_eq!(replaced["cooking_time"], 90);
    assert_eq!(replaced["servings"], 8);

    let (status, patched) = app
        .put(&format!("/recipe/{id}"), json!({ "servings": 2 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["title"], "Stew");
    assert_eq!(patched["description"], "Thicker");
    assert_eq!(patched["cooking_time"], 90);
    assert_eq!(patched["servings"], 2);

    let (status, _) = app.put("/recipe/999", json!({ "servings": 2 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_direction_number_is_rejected() {
    let app = TestApp::new();
    let recipe_id = app.create_recipe("Soup").await;
    let path = format!("/direction/recipe/{recipe_id}");

    let (status, first) = app
        .post(&path, json!({ "direction_number": 1, "instruction": "Boil water" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post(&path, json!({ "direction_number": 1, "instruction": "Chop onions" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("already exists"));

    let (status, directions) = app.get(&path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(directions.as_array().unwrap().len(), 1);
    assert_eq!(directions[0]["id"], first["id"]);
    assert_eq!(directions[0]["instruction"], "Boil water");

    let (status, _) = app
        .post(
            "/direction/recipe/999",
            json!({ "direction_number": 1, "instruction": "Boil water" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn direction_update_keeps_numbers_unique() {
    let app = TestApp::new();
    let recipe_id = app.create_recipe("Soup").await;
    let path = format!("/direction/recipe/{recipe_id}");
    app.post(&path, json!({ "direction_number": 1, "instruction": "Boil" }))
        .await;
    let (_, second) = app
        .post(&path, json!({ "direction_number": 2, "instruction": "Simmer" }))
        .await;
    let second_id = second["id"].as_i64().unwrap();

    let (status, _) = app
        .put(
            &format!("/direction/{second_id}"),
            json!({ "direction_number": 1, "instruction": "Simmer" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = app
        .put(
            &format!("/direction/{second_id}"),
            json!({ "direction_number": 2, "instruction": "Simmer gently" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["instruction"], "Simmer gently");

    let (_, recipe) = app.get(&format!("/recipe/{recipe_id}")).await;
    let numbers: Vec<_> = recipe["directions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["direction_number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, [1, 2]);
}

#[tokio::test]
async fn deleting_recipe_removes_children() {
    let app = TestApp::new();
    let recipe_id = app.create_recipe("Soup").await;
    let flour = app.create_ingredient("Flour", "grains", GRAM).await;

    let (_, direction) = app
        .post(
            &format!("/direction/recipe/{recipe_id}"),
            json!({ "direction_number": 1, "instruction": "Mix" }),
        )
        .await;
    let (_, usage) = app
        .post(
            &format!("/recipe_ingredients/recipe/{recipe_id}"),
            json!({ "ingredient_id": flour, "quantity": 250.0, "unit_id": GRAM }),
        )
        .await;
    let schedule_id = app
        .create_schedule(recipe_id, "2025-01-10", "2025-01-12")
        .await;

    let (status, body) = app.delete(&format!("/recipe/{recipe_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    for path in [
        format!("/recipe/{recipe_id}"),
        format!("/direction/{}", direction["id"]),
        format!("/recipe_ingredients/{}", usage["id"]),
        format!("/schedule/{schedule_id}"),
    ] {
        let (status, _) = app.get(&path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
    }

    let (status, _) = app.delete(&format!("/recipe/{recipe_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recipe_ingredient_resolves_references() {
    let app = TestApp::new();
    let recipe_id = app.create_recipe("Pancakes").await;
    let flour = app.create_ingredient("Flour", "grains", GRAM).await;
    let path = format!("/recipe_ingredients/recipe/{recipe_id}");

    let (status, usage) = app
        .post(
            &path,
            json!({ "ingredient_id": flour, "quantity": 2.5, "unit_id": CUP }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(usage["ingredient"]["name"], "Flour");
    assert_eq!(usage["unit"]["abbreviation"], "cup");
    assert_eq!(usage["quantity"], 2.5);

    let (status, body) = app
        .post(&path, json!({ "ingredient_id": 999, "quantity": 1.0, "unit_id": CUP }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Ingredient with id 999 not found");

    let (status, body) = app
        .post(&path, json!({ "ingredient_id": flour, "quantity": 1.0, "unit_id": 999 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Measurement unit with id 999 not found");

    let (status, _) = app
        .post(&path, json!({ "ingredient_id": flour, "quantity": 0.0, "unit_id": CUP }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let usage_id = usage["id"].as_i64().unwrap();
    let (status, updated) = app
        .put(
            &format!("/recipe_ingredients/{usage_id}"),
            json!({ "ingredient_id": flour, "quantity": 300.0, "unit_id": GRAM }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["unit"]["abbreviation"], "g");

    let (_, recipe) = app.get(&format!("/recipe/{recipe_id}")).await;
    assert_eq!(recipe["recipe_ingredients"][0]["quantity"], 300.0);

    let (status, _) = app.delete(&format!("/recipe_ingredients/{usage_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, usages) = app.get(&path).await;
    assert_eq!(usages, json!([]));
}

#[tokio::test]
async fn ingredient_names_are_unique() {
    let app = TestApp::new();
    let salt = app.create_ingredient("Salt", "spices", GRAM).await;
    let pepper = app.create_ingredient("Pepper", "spices", GRAM).await;

    let (status, body) = app
        .post(
            "/ingredients/",
            json!({ "name": "Salt", "preferred_unit_id": GRAM, "category": "pantry" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Ingredient with name 'Salt' already exists");

    let (status, _) = app
        .put(
            &format!("/ingredients/{pepper}"),
            json!({ "name": "Salt", "preferred_unit_id": GRAM, "category": "spices" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = app
        .put(
            &format!("/ingredients/{salt}"),
            json!({
                "name": "Salt",
                "preferred_unit_id": KILOGRAM,
                "category": "pantry",
                "description": "Sea salt",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["preferred_unit"]["abbreviation"], "kg");
    assert_eq!(updated["category"], "pantry");
    assert_eq!(updated["description"], "Sea salt");

    let (status, _) = app
        .post(
            "/ingredients/",
            json!({ "name": "Sugar", "preferred_unit_id": 999, "category": "pantry" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            "/ingredients/",
            json!({ "name": "Sugar", "preferred_unit_id": GRAM, "category": "candy" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn ingredient_search_and_category_compose() {
    let app = TestApp::new();
    let basil = app.create_ingredient("Basil", "produce", GRAM).await;
    let rice = app.create_ingredient("Rice", "grains", CUP).await;
    let (_, thai) = app
        .post(
            "/ingredients/",
            json!({
                "name": "Thai basil",
                "preferred_unit_id": GRAM,
                "category": "spices",
            }),
        )
        .await;
    let thai = thai["id"].as_i64().unwrap();
    let (_, oil) = app
        .post(
            "/ingredients/",
            json!({
                "name": "Pesto oil",
                "preferred_unit_id": TBSP,
                "category": "pantry",
                "description": "Infused with BASIL leaves",
            }),
        )
        .await;
    let oil = oil["id"].as_i64().unwrap();

    let (_, found) = app.get("/ingredients/?search=basil").await;
    assert_eq!(ids(&found), hashset! {basil, thai, oil});

    let (_, found) = app.get("/ingredients/?search=basil&category=produce").await;
    assert_eq!(ids(&found), hashset! {basil});

    let (_, found) = app.get("/ingredients/?category=grains").await;
    assert_eq!(ids(&found), hashset! {rice});

    let (_, found) = app.get("/ingredients/?search=%25").await;
    assert_eq!(found, json!([]));

    let (status, _) = app.get("/ingredients/?category=candy").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, categories) = app.get("/ingredients/categories").await;
    assert_eq!(
        categories,
        json!(["produce", "meat", "dairy", "grains", "spices", "pantry", "other"])
    );
}

#[tokio::test]
async fn ingredient_in_use_cannot_be_deleted() {
    let app = TestApp::new();
    let recipe_id = app.create_recipe("Bread").await;
    let flour = app.create_ingredient("Flour", "grains", GRAM).await;
    let yeast = app.create_ingredient("Yeast", "pantry", GRAM).await;
    app.post(
        &format!("/recipe_ingredients/recipe/{recipe_id}"),
        json!({ "ingredient_id": flour, "quantity": 500.0, "unit_id": GRAM }),
    )
    .await;

    let (status, body) = app.delete(&format!("/ingredients/{flour}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["detail"],
        "Cannot delete ingredient as it is used in 1 recipes"
    );
    let (status, _) = app.get(&format!("/ingredients/{flour}")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(
            &format!("/recipe_ingredients/recipe/{recipe_id}"),
            json!({ "ingredient_id": flour, "quantity": 2.0, "unit_id": CUP }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = app.delete(&format!("/ingredients/{flour}")).await;
    assert_eq!(
        body["detail"],
        "Cannot delete ingredient as it is used in 1 recipes"
    );

    let (status, _) = app.delete(&format!("/ingredients/{yeast}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&format!("/ingredients/{yeast}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unit_catalog_filters() {
    let app = TestApp::new();
    let (status, all) = app.get("/units/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 20);

    let (_, weights) = app.get("/units/?category=weight&is_metric=true").await;
    let names: HashSet<_> = weights
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["abbreviation"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, hashset! {"mg".to_owned(), "g".to_owned(), "kg".to_owned()});

    let (_, rare) = app.get("/units/?is_common=false").await;
    assert_eq!(ids(&rare), hashset! {16, 17, 19, 20});

    let (status, cup) = app.get(&format!("/units/{CUP}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cup["name"], "Cup");
    assert_eq!(cup["category"], "volume");

    let (status, _) = app.get("/units/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get("/units/?category=speed").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, categories) = app.get("/units/categories").await;
    assert_eq!(categories, json!(["volume", "weight", "quantity", "length"]));
}

#[tokio::test]
async fn unit_conversion_lookups() {
    let app = TestApp::new();

    let (status, conversion) = app
        .get(&format!(
            "/units/convert?from_unit_id={CUP}&to_unit_id={TBSP}&quantity=2"
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!((conversion["converted_quantity"].as_f64().unwrap() - 32.0).abs() < 1e-9);

    let (_, conversion) = app
        .get(&format!(
            "/units/convert?from_unit_id={GRAM}&to_unit_id={KILOGRAM}&quantity=1500"
        ))
        .await;
    assert!((conversion["converted_quantity"].as_f64().unwrap() - 1.5).abs() < 1e-9);

    let (_, conversion) = app
        .get(&format!(
            "/units/convert?from_unit_id={PIECE}&to_unit_id={PIECE}&quantity=3"
        ))
        .await;
    assert_eq!(conversion["ratio"], 1.0);

    let (status, _) = app
        .get(&format!(
            "/units/convert?from_unit_id={CUP}&to_unit_id={GRAM}&quantity=1"
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Clove has no stored conversions.
    let (status, _) = app
        .get(&format!(
            "/units/convert?from_unit_id={PIECE}&to_unit_id=18&quantity=1"
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .get(&format!("/units/convert?from_unit_id={CUP}&to_unit_id={TBSP}"))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unit_conversions_can_be_added_and_removed() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/units/conversions",
            json!({ "from_unit_id": 18, "to_unit_id": PIECE, "ratio": 1.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let conversion_id = body["id"].as_i64().unwrap();

    let (_, listed) = app.get("/units/conversions?from_unit_id=18").await;
    assert_eq!(ids(&listed), hashset! {conversion_id});

    let (_, conversion) = app
        .get(&format!(
            "/units/convert?from_unit_id=18&to_unit_id={PIECE}&quantity=4"
        ))
        .await;
    assert_eq!(conversion["converted_quantity"], 4.0);

    let (status, _) = app
        .post(
            "/units/conversions",
            json!({ "from_unit_id": 18, "to_unit_id": PIECE, "ratio": 2.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/units/conversions",
            json!({ "from_unit_id": PIECE, "to_unit_id": PIECE, "ratio": 1.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .post(
            "/units/conversions",
            json!({ "from_unit_id": 999, "to_unit_id": PIECE, "ratio": 1.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let path = format!("/units/conversions/{conversion_id}");
    let (status, _) = app.delete(&path).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.delete(&path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn schedule_range_returns_overlaps() {
    let app = TestApp::new();
    let recipe_id = app.create_recipe("Chili").await;
    let inside = app
        .create_schedule(recipe_id, "2025-01-10", "2025-01-15")
        .await;
    app.create_schedule(recipe_id, "2025-01-01", "2025-01-05")
        .await;
    let straddling = app
        .create_schedule(recipe_id, "2025-01-05", "2025-01-08")
        .await;
    let touching = app
        .create_schedule(recipe_id, "2025-01-18", "2025-01-20")
        .await;

    let (status, found) = app
        .get("/schedule/range?start_date=2025-01-08&end_date=2025-01-18")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&found), hashset! {inside, straddling, touching});
    assert_eq!(found[0]["id"].as_i64(), Some(straddling));
    assert_eq!(found[0]["recipe"]["title"], "Chili");

    let (status, same) = app
        .get("/schedule/range/?start_date=2025-01-08&end_date=2025-01-18")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(same, found);
}

#[tokio::test]
async fn inverted_range_is_empty_not_an_error() {
    let app = TestApp::new();
    let recipe_id = app.create_recipe("Chili").await;
    app.create_schedule(recipe_id, "2025-01-10", "2025-01-15")
        .await;

    let (status, found) = app
        .get("/schedule/range?start_date=2025-01-18&end_date=2025-01-08")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, json!([]));

    let (status, _) = app.get("/schedule/range?start_date=2025-01-18").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn schedule_end_before_start_is_not_stored() {
    let app = TestApp::new();
    let recipe_id = app.create_recipe("Chili").await;

    let (status, body) = app
        .post(
            &format!("/schedule/recipe/{recipe_id}"),
            json!({ "start_date": "2025-01-10", "end_date": "2025-01-09" }),
        )
        .await;
    assert!(status.is_client_error(), "{status}");
    assert!(body["detail"].as_str().unwrap().contains("end_date"));

    let (_, found) = app
        .get("/schedule/range?start_date=2000-01-01&end_date=2100-01-01")
        .await;
    assert_eq!(found, json!([]));

    let (status, _) = app
        .post(
            "/schedule/recipe/999",
            json!({ "start_date": "2025-01-10", "end_date": "2025-01-11" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            &format!("/schedule/recipe/{recipe_id}"),
            json!({ "start_date": "2025-01-10", "end_date": "2025-01-11", "meal_type": "brunch" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn schedule_partial_update_rechecks_dates() {
    let app = TestApp::new();
    let recipe_id = app.create_recipe("Chili").await;
    let schedule_id = app
        .create_schedule(recipe_id, "2025-01-10", "2025-01-15")
        .await;
    let path = format!("/schedule/{schedule_id}");

    let (status, _) = app.put(&path, json!({ "end_date": "2025-01-09" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = app
        .put(&path, json!({ "end_date": "2025-01-12", "notes": "Leftovers" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["start_date"], "2025-01-10");
    assert_eq!(updated["end_date"], "2025-01-12");
    assert_eq!(updated["meal_type"], "dinner");
    assert_eq!(updated["notes"], "Leftovers");

    let (status, _) = app.delete(&path).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn schedule_update_clears_optional_fields() {
    let app = TestApp::new();
    let recipe_id = app.create_recipe("Chili").await;
    let schedule_id = app
        .create_schedule(recipe_id, "2025-01-10", "2025-01-15")
        .await;
    let path = format!("/schedule/{schedule_id}");
    app.put(&path, json!({ "notes": "Leftovers" })).await;

    let (status, kept) = app.put(&path, json!({ "end_date": "2025-01-14" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(kept["notes"], "Leftovers");
    assert_eq!(kept["meal_type"], "dinner");

    let (status, cleared) = app
        .put(&path, json!({ "notes": null, "meal_type": null }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["notes"], Value::Null);
    assert_eq!(cleared["meal_type"], Value::Null);
    assert_eq!(cleared["end_date"], "2025-01-14");

    let (_, stored) = app.get(&path).await;
    assert_eq!(stored["notes"], Value::Null);
    assert_eq!(stored["meal_type"], Value::Null);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writes_all_succeed() {
    let app = Arc::new(TestApp::with_pool_size(8));

    let tasks: Vec<_> = (0..64)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                app.post(
                    "/ingredients/",
                    json!({
                        "name": format!("Spice {i}"),
                        "preferred_unit_id": GRAM,
                        "category": "spices",
                    }),
                )
                .await
            })
        })
        .collect();

    for task in tasks {
        let (status, body) = task.await.unwrap();
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }

    let (_, all) = app.get("/ingredients/?limit=1000").await;
    assert_eq!(all.as_array().unwrap().len(), 64);
}

#[tokio::test]
async fn malformed_ids_and_unknown_routes() {
    let app = TestApp::new();
    let (status, body) = app.get("/recipe/abc").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, body) = app.get("/nothing/here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Not Found");
}
