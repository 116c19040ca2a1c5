//! Maps the raw `gameData` table onto the core model.
//!
//! Resolution runs in three steps, each consuming the id index of the one
//! before: items (raw id -> [`ItemId`]), recipes (raw id -> [`RecipeId`]),
//! then starting recipes. All collections keep declaration order, which
//! decides the "first match" rules for facilities and producers.

use crate::loader::LoadOptions;
use crate::schema::{RawFacility, RawGameData, RawItem, RawRecipe};
use chainrate_core::{
    BuildError, GameData, GameDataBuilder, Item, ItemId, ItemKind, ProductionType, Recipe,
    RecipeEntry, RecipeId,
};
use chainrate_lua::Value;
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, warn};

// ===========================================================================
// Errors
// ===========================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("malformed game data: {0}")]
    Shape(String),
    #[error("invalid item type: {value} (item id {item})")]
    InvalidItemType { item: String, value: String },
    #[error("invalid production type \"{value}\" for facility item {item}")]
    InvalidFacilityType { item: String, value: String },
    #[error("invalid production type \"{value}\" for recipe id {recipe}")]
    InvalidRecipeType { recipe: i64, value: String },
    #[error("unexpected recipe production type NONE for recipe id {recipe}")]
    NoneRecipeType { recipe: i64 },
    #[error("could not find a facility that recipe id {recipe} is produced in")]
    NoFacility { recipe: i64 },
    #[error("expected even number of elements in lua recipe items, but got {len} (recipe id {recipe})")]
    OddEntryList { recipe: i64, len: usize },
    #[error("could not find item for id: {item} (recipe id {recipe})")]
    UnknownItem { recipe: i64, item: i64 },
    #[error("invalid count {count} for item {item} in recipe id {recipe}")]
    InvalidCount { recipe: i64, item: i64, count: i64 },
    #[error("recipe id {recipe} has production time {seconds}, expected a positive number of seconds")]
    InvalidTime { recipe: i64, seconds: f64 },
    #[error("no recipe object for recipe id {0}")]
    UnknownStartingRecipe(i64),
    #[error(transparent)]
    Build(#[from] BuildError),
}

// ===========================================================================
// Items
// ===========================================================================

/// Items in declaration order; an item's position is its [`ItemId`].
#[derive(Debug, Clone, PartialEq)]
pub struct MappedItems {
    pub items: Vec<Item>,
    pub id_index: HashMap<String, ItemId>,
}

impl MappedItems {
    /// Resolve a raw numeric id as used in recipe entry lists.
    pub fn resolve(&self, raw_id: i64) -> Option<ItemId> {
        self.id_index.get(&raw_id.to_string()).copied()
    }
}

pub fn map_items(
    raw_items: &IndexMap<String, RawItem>,
    raw_facilities: &IndexMap<String, RawFacility>,
    options: &LoadOptions,
) -> Result<MappedItems, ValidationError> {
    let mut items = Vec::with_capacity(raw_items.len());
    let mut id_index = HashMap::with_capacity(raw_items.len());

    for (raw_id, raw) in raw_items {
        let kind: ItemKind = raw
            .kind
            .parse()
            .map_err(|_| ValidationError::InvalidItemType {
                item: raw_id.clone(),
                value: raw.kind.clone(),
            })?;

        let item = if kind == ItemKind::Production {
            let production_type = facility_type(raw_id, raw_facilities)?;
            Item::facility(&raw.name, production_type, options.production_speed)
        } else {
            Item::new(&raw.name, kind)
        };

        id_index.insert(raw_id.clone(), ItemId(items.len() as u32));
        items.push(item);
    }

    Ok(MappedItems { items, id_index })
}

/// The production type of a building: the key of the first facility listing
/// it, or `NONE`.
fn facility_type(
    raw_id: &str,
    raw_facilities: &IndexMap<String, RawFacility>,
) -> Result<ProductionType, ValidationError> {
    let mut claims = raw_facilities
        .iter()
        .filter(|(_, facility)| {
            facility
                .buildings
                .iter()
                .any(|building| building.to_string() == raw_id)
        })
        .map(|(key, _)| key.as_str());

    let Some(first) = claims.next() else {
        return Ok(ProductionType::None);
    };
    let others: Vec<&str> = claims.collect();
    if !others.is_empty() {
        warn!(
            item = raw_id,
            chosen = first,
            ignored = ?others,
            "building listed by several facilities, using the first"
        );
    }

    first.parse().map_err(|_| ValidationError::InvalidFacilityType {
        item: raw_id.to_string(),
        value: first.to_string(),
    })
}

// ===========================================================================
// Recipes
// ===========================================================================

/// Recipes in declaration order; a recipe's position is its [`RecipeId`].
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRecipes {
    pub recipes: Vec<Recipe>,
    /// Raw recipe id -> handle. A repeated raw id refers to the last recipe
    /// declared with it.
    pub id_index: HashMap<i64, RecipeId>,
}

pub fn map_recipes(
    raw_recipes: &[RawRecipe],
    items: &MappedItems,
) -> Result<MappedRecipes, ValidationError> {
    let mut producers: HashMap<ProductionType, Vec<ItemId>> = HashMap::new();
    for (index, item) in items.items.iter().enumerate() {
        match item.production_type {
            Some(ty) if item.is_facility() => {
                producers.entry(ty).or_default().push(ItemId(index as u32));
            }
            _ => {}
        }
    }

    let mut recipes = Vec::with_capacity(raw_recipes.len());
    let mut id_index = HashMap::with_capacity(raw_recipes.len());

    for raw in raw_recipes {
        let inputs = map_entries(raw.id, &raw.inputs, items)?;
        let outputs = map_entries(raw.id, &raw.outputs, items)?;

        let production_type: ProductionType =
            raw.kind
                .parse()
                .map_err(|_| ValidationError::InvalidRecipeType {
                    recipe: raw.id,
                    value: raw.kind.clone(),
                })?;
        if production_type == ProductionType::None {
            return Err(ValidationError::NoneRecipeType { recipe: raw.id });
        }

        let candidates = producers
            .get(&production_type)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let Some(&produced_in) = candidates.first() else {
            return Err(ValidationError::NoFacility { recipe: raw.id });
        };
        if candidates.len() > 1 {
            debug!(
                recipe = raw.id,
                production_type = %production_type,
                candidates = candidates.len(),
                "several facilities can produce recipe, using the first"
            );
        }

        if !(raw.seconds.is_finite() && raw.seconds > 0.0) {
            return Err(ValidationError::InvalidTime {
                recipe: raw.id,
                seconds: raw.seconds,
            });
        }

        id_index.insert(raw.id, RecipeId(recipes.len() as u32));
        recipes.push(Recipe::new(inputs, outputs, produced_in, raw.seconds));
    }

    Ok(MappedRecipes { recipes, id_index })
}

/// Decode a flat `[id, count, id, count, ...]` list.
fn map_entries(
    recipe: i64,
    flat: &[i64],
    items: &MappedItems,
) -> Result<Vec<RecipeEntry>, ValidationError> {
    if flat.len() % 2 != 0 {
        return Err(ValidationError::OddEntryList {
            recipe,
            len: flat.len(),
        });
    }
    flat.chunks_exact(2)
        .map(|pair| -> Result<RecipeEntry, ValidationError> {
            let (raw_item, count) = (pair[0], pair[1]);
            let item = items
                .resolve(raw_item)
                .ok_or(ValidationError::UnknownItem {
                    recipe,
                    item: raw_item,
                })?;
            let count = u32::try_from(count).map_err(|_| ValidationError::InvalidCount {
                recipe,
                item: raw_item,
                count,
            })?;
            Ok(RecipeEntry::new(item, count))
        })
        .collect()
}

// ===========================================================================
// Starting recipes
// ===========================================================================

pub fn map_starting_recipes(
    raw_ids: &[i64],
    recipes: &MappedRecipes,
) -> Result<Vec<RecipeId>, ValidationError> {
    raw_ids
        .iter()
        .map(|&raw_id| {
            recipes
                .id_index
                .get(&raw_id)
                .copied()
                .ok_or(ValidationError::UnknownStartingRecipe(raw_id))
        })
        .collect()
}

// ===========================================================================
// Whole table
// ===========================================================================

/// Map an evaluated `gameData` table into [`GameData`].
pub fn map_game_data(value: &Value, options: &LoadOptions) -> Result<GameData, ValidationError> {
    let json = value
        .to_json()
        .map_err(|e| ValidationError::Shape(e.to_string()))?;
    let raw: RawGameData = serde_json::from_value(json)
        .map_err(|e| ValidationError::Shape(e.to_string()))?;

    let items = map_items(&raw.game_items, &raw.game_facilities, options)?;
    let recipes = map_recipes(&raw.game_recipes, &items)?;
    let starting = map_starting_recipes(&raw.starting_recipes, &recipes)?;

    let mut builder = GameDataBuilder::new();
    for item in items.items {
        builder.register_item(item);
    }
    for recipe in recipes.recipes {
        builder.register_recipe(recipe);
    }
    for id in starting {
        builder.add_starting_recipe(id);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RawFacility;

    fn raw_item(name: &str, kind: &str) -> RawItem {
        RawItem {
            name: name.to_string(),
            kind: kind.to_string(),
        }
    }

    fn raw_items(entries: &[(&str, &str, &str)]) -> IndexMap<String, RawItem> {
        entries
            .iter()
            .map(|&(id, name, kind)| (id.to_string(), raw_item(name, kind)))
            .collect()
    }

    fn facilities(entries: &[(&str, &[i64])]) -> IndexMap<String, RawFacility> {
        entries
            .iter()
            .map(|&(key, buildings)| {
                (
                    key.to_string(),
                    RawFacility {
                        name: None,
                        buildings: buildings.to_vec(),
                    },
                )
            })
            .collect()
    }

    fn raw_recipe(id: i64, kind: &str, inputs: &[i64], outputs: &[i64], seconds: f64) -> RawRecipe {
        RawRecipe {
            id,
            name: None,
            kind: kind.to_string(),
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
            seconds,
        }
    }

    /// water (1), iron (2), smelter (3).
    fn water_iron_items() -> MappedItems {
        map_items(
            &raw_items(&[
                ("1", "water", "RESOURCE"),
                ("2", "iron", "COMPONENT"),
                ("3", "smelter", "PRODUCTION"),
            ]),
            &facilities(&[("SMELT", &[3])]),
            &LoadOptions::default(),
        )
        .unwrap()
    }

    // -----------------------------------------------------------------------
    // map_entries
    // -----------------------------------------------------------------------

    #[test]
    fn empty_entry_list_maps_to_nothing() {
        assert!(map_entries(1, &[], &water_iron_items()).unwrap().is_empty());
    }

    #[test]
    fn odd_entry_lists_fail() {
        let items = water_iron_items();
        for flat in [&[0][..], &[0, 1, 2], &[0, 1, 2, 3, 4]] {
            let err = map_entries(7, flat, &items).unwrap_err();
            assert_eq!(
                err,
                ValidationError::OddEntryList {
                    recipe: 7,
                    len: flat.len()
                }
            );
            assert!(err
                .to_string()
                .starts_with("expected even number of elements in lua recipe items, but got"));
        }
    }

    #[test]
    fn unknown_entry_item_fails() {
        let err = map_entries(7, &[1001, 3], &water_iron_items()).unwrap_err();
        assert_eq!(err, ValidationError::UnknownItem { recipe: 7, item: 1001 });
        assert!(err.to_string().contains("could not find item for id: 1001"));
    }

    #[test]
    fn negative_counts_fail() {
        let err = map_entries(7, &[1, -3], &water_iron_items()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCount { count: -3, .. }));
    }

    #[test]
    fn entries_resolve_in_order() {
        let entries = map_entries(7, &[2, 1, 1, 3], &water_iron_items()).unwrap();
        assert_eq!(
            entries,
            [RecipeEntry::new(ItemId(1), 1), RecipeEntry::new(ItemId(0), 3)]
        );
    }

    // -----------------------------------------------------------------------
    // map_items
    // -----------------------------------------------------------------------

    #[test]
    fn empty_items_map_to_nothing() {
        let mapped = map_items(&IndexMap::new(), &IndexMap::new(), &LoadOptions::default()).unwrap();
        assert!(mapped.items.is_empty());
        assert!(mapped.id_index.is_empty());
    }

    #[test]
    fn invalid_item_type_fails() {
        let err = map_items(
            &raw_items(&[("0", "", "fake")]),
            &IndexMap::new(),
            &LoadOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("invalid item type: fake"), "got: {err}");
    }

    #[test]
    fn non_production_item() {
        let mapped = map_items(
            &raw_items(&[("0", "", "RESOURCE")]),
            &IndexMap::new(),
            &LoadOptions::default(),
        )
        .unwrap();
        assert_eq!(mapped.items, [Item::new("", ItemKind::Resource)]);
        assert_eq!(mapped.id_index["0"], ItemId(0));
    }

    #[test]
    fn production_item_with_facility() {
        let options = LoadOptions {
            production_speed: 2.5,
            ..LoadOptions::default()
        };
        let mapped = map_items(
            &raw_items(&[("0", "foo", "PRODUCTION")]),
            &facilities(&[("SMELT", &[0])]),
            &options,
        )
        .unwrap();
        assert_eq!(
            mapped.items,
            [Item::facility("foo", ProductionType::Smelt, 2.5)]
        );
    }

    #[test]
    fn production_item_with_invalid_facility_key() {
        let err = map_items(
            &raw_items(&[("0", "foo", "PRODUCTION")]),
            &facilities(&[("FAKE", &[0])]),
            &LoadOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid production type \"FAKE\" for facility item 0");
    }

    #[test]
    fn production_item_without_facility() {
        let mapped = map_items(
            &raw_items(&[("0", "foo", "PRODUCTION")]),
            &facilities(&[("SMELT", &[1])]),
            &LoadOptions::default(),
        )
        .unwrap();
        assert_eq!(mapped.items, [Item::new("foo", ItemKind::Production)]);
        assert!(!mapped.items[0].is_facility());
    }

    #[test]
    fn first_facility_claim_wins() {
        let mapped = map_items(
            &raw_items(&[("0", "foo", "PRODUCTION")]),
            &facilities(&[("ASSEMBLE", &[0]), ("SMELT", &[0])]),
            &LoadOptions::default(),
        )
        .unwrap();
        assert_eq!(mapped.items[0].production_type, Some(ProductionType::Assemble));
    }

    #[test]
    fn mixed_items_keep_declaration_order() {
        let mapped = map_items(
            &raw_items(&[("0", "foo", "PRODUCTION"), ("1", "bar", "RESOURCE")]),
            &facilities(&[("SMELT", &[0])]),
            &LoadOptions::default(),
        )
        .unwrap();
        assert_eq!(mapped.items[0].name, "foo");
        assert_eq!(mapped.items[1], Item::new("bar", ItemKind::Resource));
        assert_eq!(mapped.resolve(1), Some(ItemId(1)));
    }

    // -----------------------------------------------------------------------
    // map_recipes
    // -----------------------------------------------------------------------

    #[test]
    fn recipe_maps_to_facility() {
        let items = water_iron_items();
        let mapped = map_recipes(&[raw_recipe(10, "SMELT", &[1, 3], &[2, 1], 5.0)], &items).unwrap();
        assert_eq!(
            mapped.recipes,
            [Recipe::new(
                vec![RecipeEntry::new(ItemId(0), 3)],
                vec![RecipeEntry::new(ItemId(1), 1)],
                ItemId(2),
                5.0
            )]
        );
        assert_eq!(mapped.id_index[&10], RecipeId(0));
    }

    #[test]
    fn invalid_recipe_type_fails() {
        let err = map_recipes(&[raw_recipe(4, "BAKE", &[], &[2, 1], 1.0)], &water_iron_items())
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid production type \"BAKE\" for recipe id 4");
    }

    #[test]
    fn none_recipe_type_fails() {
        let err = map_recipes(&[raw_recipe(4, "NONE", &[], &[2, 1], 1.0)], &water_iron_items())
            .unwrap_err();
        assert_eq!(err, ValidationError::NoneRecipeType { recipe: 4 });
    }

    #[test]
    fn recipe_without_facility_fails() {
        let err = map_recipes(&[raw_recipe(4, "CHEMICAL", &[], &[2, 1], 1.0)], &water_iron_items())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "could not find a facility that recipe id 4 is produced in"
        );
    }

    #[test]
    fn first_matching_facility_produces() {
        let items = map_items(
            &raw_items(&[
                ("1", "iron", "COMPONENT"),
                ("2", "stone furnace", "PRODUCTION"),
                ("3", "arc furnace", "PRODUCTION"),
            ]),
            &facilities(&[("SMELT", &[2, 3])]),
            &LoadOptions::default(),
        )
        .unwrap();
        let mapped = map_recipes(&[raw_recipe(1, "SMELT", &[], &[1, 1], 1.0)], &items).unwrap();
        assert_eq!(mapped.recipes[0].produced_in, ItemId(1));
    }

    #[test]
    fn non_positive_time_fails() {
        for seconds in [0.0, -2.0] {
            let err = map_recipes(&[raw_recipe(4, "SMELT", &[], &[2, 1], seconds)], &water_iron_items())
                .unwrap_err();
            assert!(matches!(err, ValidationError::InvalidTime { recipe: 4, .. }));
        }
    }

    #[test]
    fn repeated_recipe_id_refers_to_the_last() {
        let mapped = map_recipes(
            &[
                raw_recipe(4, "SMELT", &[], &[2, 1], 1.0),
                raw_recipe(4, "SMELT", &[], &[2, 2], 1.0),
            ],
            &water_iron_items(),
        )
        .unwrap();
        assert_eq!(mapped.recipes.len(), 2);
        assert_eq!(mapped.id_index[&4], RecipeId(1));
    }

    // -----------------------------------------------------------------------
    // map_starting_recipes
    // -----------------------------------------------------------------------

    #[test]
    fn starting_recipes_resolve() {
        let recipes = map_recipes(
            &[
                raw_recipe(4, "SMELT", &[], &[2, 1], 1.0),
                raw_recipe(9, "SMELT", &[1, 1], &[2, 1], 1.0),
            ],
            &water_iron_items(),
        )
        .unwrap();
        assert_eq!(
            map_starting_recipes(&[9, 4], &recipes).unwrap(),
            [RecipeId(1), RecipeId(0)]
        );
        assert!(map_starting_recipes(&[], &recipes).unwrap().is_empty());
    }

    #[test]
    fn unknown_starting_recipe_fails() {
        let recipes = map_recipes(&[], &water_iron_items()).unwrap();
        let err = map_starting_recipes(&[12], &recipes).unwrap_err();
        assert_eq!(err.to_string(), "no recipe object for recipe id 12");
    }
}
