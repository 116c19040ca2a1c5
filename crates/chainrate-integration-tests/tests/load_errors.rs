//! Malformed data files fail with an error naming the problem.

use chainrate_data::{DataLoadError, LoadOptions, ValidationError, load_game_data_str};

/// A one-recipe data file with each section substitutable.
fn source(items: &str, recipes: &str, facilities: &str, starting: &str) -> String {
    format!(
        "gameData = {{\n\
         game_items = {{ {items} }},\n\
         game_recipes = {{ {recipes} }},\n\
         game_facilities = {{ {facilities} }},\n\
         starting_recipes = {{ {starting} }},\n\
         }}\n"
    )
}

const ITEMS: &str = r#"[1] = { name = "ore", type = "RESOURCE" },
    [2] = { name = "ingot", type = "MATERIAL" },
    [3] = { name = "furnace", type = "PRODUCTION" }"#;
const RECIPE: &str =
    r#"{ id = 7, type = "SMELT", inputs = { 1, 1 }, outputs = { 2, 1 }, seconds = 1 }"#;
const FACILITIES: &str = "SMELT = { buildings = { 3 } }";

fn load(source: &str) -> Result<chainrate_core::GameData, DataLoadError> {
    load_game_data_str(source, "broken.lua", &LoadOptions::default())
}

fn validation_error(source: &str) -> ValidationError {
    match load(source) {
        Err(DataLoadError::Validation(err)) => err,
        other => panic!("expected a validation error, got: {other:?}"),
    }
}

#[test]
fn baseline_loads() {
    let data = load(&source(ITEMS, RECIPE, FACILITIES, "7")).unwrap();
    assert_eq!(data.recipe_count(), 1);
}

#[test]
fn empty_sections_load() {
    let data = load(&source("", "", "", "")).unwrap();
    assert_eq!(data.item_count(), 0);
    assert_eq!(data.recipe_count(), 0);
}

#[test]
fn invalid_item_type() {
    let items = ITEMS.replace("MATERIAL", "LIQUID");
    let err = validation_error(&source(&items, RECIPE, FACILITIES, "7"));
    assert_eq!(
        err,
        ValidationError::InvalidItemType {
            item: "2".to_string(),
            value: "LIQUID".to_string()
        }
    );
}

#[test]
fn invalid_facility_key() {
    let err = validation_error(&source(ITEMS, RECIPE, "MELT = { buildings = { 3 } }", "7"));
    assert_eq!(err.to_string(), "invalid production type \"MELT\" for facility item 3");
}

#[test]
fn recipe_without_facility() {
    let err = validation_error(&source(ITEMS, RECIPE, "", "7"));
    assert_eq!(err, ValidationError::NoFacility { recipe: 7 });
}

#[test]
fn odd_entry_list() {
    let recipe = RECIPE.replace("inputs = { 1, 1 }", "inputs = { 1, 1, 2 }");
    let err = validation_error(&source(ITEMS, &recipe, FACILITIES, "7"));
    assert_eq!(err, ValidationError::OddEntryList { recipe: 7, len: 3 });
}

#[test]
fn unknown_item_in_recipe() {
    let recipe = RECIPE.replace("outputs = { 2, 1 }", "outputs = { 99, 1 }");
    let err = validation_error(&source(ITEMS, &recipe, FACILITIES, "7"));
    assert_eq!(err, ValidationError::UnknownItem { recipe: 7, item: 99 });
}

#[test]
fn unknown_recipe_type() {
    let recipe = RECIPE.replace("SMELT", "BAKE");
    let err = validation_error(&source(ITEMS, &recipe, FACILITIES, "7"));
    assert!(matches!(err, ValidationError::InvalidRecipeType { recipe: 7, .. }));
}

#[test]
fn none_recipe_type() {
    let recipe = RECIPE.replace("SMELT", "NONE");
    let err = validation_error(&source(ITEMS, &recipe, FACILITIES, "7"));
    assert_eq!(err, ValidationError::NoneRecipeType { recipe: 7 });
}

#[test]
fn zero_production_time() {
    let recipe = RECIPE.replace("seconds = 1", "seconds = 0");
    let err = validation_error(&source(ITEMS, &recipe, FACILITIES, "7"));
    assert!(matches!(err, ValidationError::InvalidTime { recipe: 7, .. }));
}

#[test]
fn unknown_starting_recipe() {
    let err = validation_error(&source(ITEMS, RECIPE, FACILITIES, "7, 8"));
    assert_eq!(err.to_string(), "no recipe object for recipe id 8");
}

#[test]
fn missing_section_is_a_shape_error() {
    let err = validation_error("gameData = { game_items = {}, game_recipes = {} }");
    assert!(matches!(err, ValidationError::Shape(_)));
}

#[test]
fn computed_values_are_rejected() {
    let recipe = RECIPE.replace("seconds = 1", "seconds = 60 / 2");
    match load(&source(ITEMS, &recipe, FACILITIES, "7")) {
        Err(DataLoadError::Syntax(err)) => {
            assert!(err.to_string().contains("BinaryExpression"), "got: {err}");
            assert!(err.to_string().contains("broken.lua"), "got: {err}");
        }
        other => panic!("expected a syntax error, got: {other:?}"),
    }
}

#[test]
fn function_definitions_are_rejected() {
    let err = load("function f() end\ngameData = {}").unwrap_err();
    assert!(matches!(err, DataLoadError::Parse { .. }), "got: {err:?}");
}
