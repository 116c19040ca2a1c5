//! Shared test helpers for unit and integration tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests and, via the `test-utils` feature, in other
//! crates' tests.

use crate::id::*;
use crate::item::{Item, ItemKind, ProductionType};
use crate::recipe::{Recipe, RecipeEntry};
use crate::registry::{GameData, GameDataBuilder};

// ===========================================================================
// Entry helpers
// ===========================================================================

pub fn entry(item: ItemId, count: u32) -> RecipeEntry {
    RecipeEntry::new(item, count)
}

pub fn smelter() -> Item {
    Item::facility("smelter", ProductionType::Smelt, 1.0)
}

pub fn assembler() -> Item {
    Item::facility("assembler", ProductionType::Assemble, 1.0)
}

// ===========================================================================
// Game data fixtures
// ===========================================================================

/// water (resource), iron, smelter. One recipe: 3 water -> 1 iron every 5s.
pub fn water_iron_data() -> GameData {
    let mut b = GameDataBuilder::new();
    let water = b.register_item(Item::new("water", ItemKind::Resource));
    let iron = b.register_item(Item::new("iron", ItemKind::Component));
    let smelter = b.register_item(smelter());
    let recipe = b.register_recipe(Recipe::new(
        vec![entry(water, 3)],
        vec![entry(iron, 1)],
        smelter,
        5.0,
    ));
    b.add_starting_recipe(recipe);
    build(b)
}

/// Two ores smelted into copper and iron, and two circuit recipes:
///
/// - recipe 2: 1 iron + 1 copper -> 2 circuit, 1s
/// - recipe 3: 2 iron -> 1 circuit + 1 copper, 2s
pub fn circuit_data() -> GameData {
    let mut b = GameDataBuilder::new();
    let copper_ore = b.register_item(Item::new("copper_ore", ItemKind::Resource));
    let iron_ore = b.register_item(Item::new("iron_ore", ItemKind::Resource));
    let copper = b.register_item(Item::new("copper", ItemKind::Material));
    let iron = b.register_item(Item::new("iron", ItemKind::Material));
    let circuit = b.register_item(Item::new("circuit", ItemKind::Component));
    let smelter = b.register_item(smelter());
    let assembler = b.register_item(assembler());

    let smelt_copper = b.register_recipe(Recipe::new(
        vec![entry(copper_ore, 1)],
        vec![entry(copper, 1)],
        smelter,
        1.0,
    ));
    let smelt_iron = b.register_recipe(Recipe::new(
        vec![entry(iron_ore, 1)],
        vec![entry(iron, 1)],
        smelter,
        1.0,
    ));
    b.register_recipe(Recipe::new(
        vec![entry(iron, 1), entry(copper, 1)],
        vec![entry(circuit, 2)],
        assembler,
        1.0,
    ));
    b.register_recipe(Recipe::new(
        vec![entry(iron, 2)],
        vec![entry(circuit, 1), entry(copper, 1)],
        assembler,
        2.0,
    ));
    b.add_starting_recipe(smelt_copper);
    b.add_starting_recipe(smelt_iron);
    build(b)
}

/// `alpha` is made from `beta` and `beta` from `alpha`; `gamma` is made from
/// `alpha`.
pub fn cyclic_data() -> GameData {
    let mut b = GameDataBuilder::new();
    let alpha = b.register_item(Item::new("alpha", ItemKind::Material));
    let beta = b.register_item(Item::new("beta", ItemKind::Material));
    let gamma = b.register_item(Item::new("gamma", ItemKind::Product));
    let plant = b.register_item(Item::facility("plant", ProductionType::Chemical, 1.0));
    b.register_recipe(Recipe::new(vec![entry(beta, 1)], vec![entry(alpha, 1)], plant, 1.0));
    b.register_recipe(Recipe::new(vec![entry(alpha, 1)], vec![entry(beta, 1)], plant, 1.0));
    b.register_recipe(Recipe::new(vec![entry(alpha, 1)], vec![entry(gamma, 1)], plant, 1.0));
    build(b)
}

fn build(builder: GameDataBuilder) -> GameData {
    builder.build().expect("fixture game data is valid")
}
