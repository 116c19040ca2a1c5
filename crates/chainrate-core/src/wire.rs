//! JSON wire format for [`GameData`].
//!
//! Items are written in order and referenced by position:
//!
//! ```json
//! {
//!   "items": [{ "name": "water", "type": "RESOURCE" }, ...],
//!   "recipes": [{
//!     "inputs": [{ "itemIndex": 0, "count": 3 }],
//!     "outputs": [{ "itemIndex": 1, "count": 1 }],
//!     "producedInItemIndex": 2,
//!     "productionTimeInSeconds": 5.0
//!   }],
//!   "startingRecipeIndices": [0]
//! }
//! ```

use crate::id::{ItemId, RecipeId};
use crate::item::Item;
use crate::recipe::{Recipe, RecipeEntry};
use crate::registry::{BuildError, GameData, GameDataBuilder};
use serde::{Deserialize, Serialize};

// ===========================================================================
// Error types
// ===========================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WireError {
    #[error("JSON encoding failed: {0}")]
    Encode(String),
    #[error("JSON decoding failed: {0}")]
    Decode(String),
    #[error("recipe {recipe} references item index {index}, but there are {count} items")]
    ItemIndex {
        recipe: usize,
        index: usize,
        count: usize,
    },
    #[error("starting recipe index {index} out of range ({count} recipes)")]
    RecipeIndex { index: usize, count: usize },
    #[error(transparent)]
    Build(#[from] BuildError),
}

// ===========================================================================
// Wire types
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGameData {
    pub items: Vec<Item>,
    pub recipes: Vec<WireRecipe>,
    pub starting_recipe_indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRecipe {
    pub inputs: Vec<WireEntry>,
    pub outputs: Vec<WireEntry>,
    pub produced_in_item_index: usize,
    pub production_time_in_seconds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEntry {
    pub item_index: usize,
    pub count: u32,
}

// ===========================================================================
// Conversion
// ===========================================================================

pub fn to_wire(data: &GameData) -> WireGameData {
    let entries = |entries: &[RecipeEntry]| -> Vec<WireEntry> {
        entries
            .iter()
            .map(|entry| WireEntry {
                item_index: entry.item.index(),
                count: entry.count,
            })
            .collect()
    };
    WireGameData {
        items: data.items().to_vec(),
        recipes: data
            .recipes()
            .iter()
            .map(|recipe| WireRecipe {
                inputs: entries(&recipe.inputs),
                outputs: entries(&recipe.outputs),
                produced_in_item_index: recipe.produced_in.index(),
                production_time_in_seconds: recipe.production_time_seconds,
            })
            .collect(),
        starting_recipe_indices: data.starting_recipes().iter().map(|id| id.index()).collect(),
    }
}

/// Rebuild game data from its wire form, re-validating every invariant the
/// builder enforces.
pub fn from_wire(wire: WireGameData) -> Result<GameData, WireError> {
    let item_count = wire.items.len();
    let recipe_count = wire.recipes.len();
    let item_id = |recipe: usize, index: usize| -> Result<ItemId, WireError> {
        if index < item_count {
            Ok(ItemId(index as u32))
        } else {
            Err(WireError::ItemIndex {
                recipe,
                index,
                count: item_count,
            })
        }
    };
    let entries = |recipe: usize, entries: &[WireEntry]| -> Result<Vec<RecipeEntry>, WireError> {
        entries
            .iter()
            .map(|entry| {
                item_id(recipe, entry.item_index).map(|item| RecipeEntry::new(item, entry.count))
            })
            .collect()
    };

    let mut builder = GameDataBuilder::new();
    for item in wire.items {
        builder.register_item(item);
    }
    for (index, recipe) in wire.recipes.iter().enumerate() {
        builder.register_recipe(Recipe::new(
            entries(index, &recipe.inputs)?,
            entries(index, &recipe.outputs)?,
            item_id(index, recipe.produced_in_item_index)?,
            recipe.production_time_in_seconds,
        ));
    }
    for &index in &wire.starting_recipe_indices {
        if index >= recipe_count {
            return Err(WireError::RecipeIndex {
                index,
                count: recipe_count,
            });
        }
        builder.add_starting_recipe(RecipeId(index as u32));
    }
    Ok(builder.build()?)
}

pub fn to_json(data: &GameData) -> Result<String, WireError> {
    serde_json::to_string(&to_wire(data)).map_err(|e| WireError::Encode(e.to_string()))
}

pub fn to_json_pretty(data: &GameData) -> Result<String, WireError> {
    serde_json::to_string_pretty(&to_wire(data)).map_err(|e| WireError::Encode(e.to_string()))
}

pub fn from_json(json: &str) -> Result<GameData, WireError> {
    let wire: WireGameData =
        serde_json::from_str(json).map_err(|e| WireError::Decode(e.to_string()))?;
    from_wire(wire)
}
