use crate::id::*;
use crate::item::{Item, ItemError};
use crate::recipe::Recipe;
use std::collections::HashMap;

/// Builder for constructing an immutable [`GameData`].
/// Two-phase lifecycle: registration -> finalization.
#[derive(Debug, Default)]
pub struct GameDataBuilder {
    items: Vec<Item>,
    item_name_to_id: HashMap<String, ItemId>,
    recipes: Vec<Recipe>,
    starting_recipes: Vec<RecipeId>,
}

impl GameDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item. Returns its ID. On duplicate names the first
    /// registration keeps the name lookup.
    pub fn register_item(&mut self, item: Item) -> ItemId {
        let id = ItemId(self.items.len() as u32);
        self.item_name_to_id.entry(item.name.clone()).or_insert(id);
        self.items.push(item);
        id
    }

    /// Register a recipe. Returns its ID.
    pub fn register_recipe(&mut self, recipe: Recipe) -> RecipeId {
        let id = RecipeId(self.recipes.len() as u32);
        self.recipes.push(recipe);
        id
    }

    /// Mark a registered recipe as available from the start.
    pub fn add_starting_recipe(&mut self, id: RecipeId) {
        self.starting_recipes.push(id);
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.item_name_to_id.get(name).copied()
    }

    pub fn get_item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.index())
    }

    pub fn get_recipe(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.get(id.index())
    }

    /// Finalize and build the immutable game data.
    pub fn build(self) -> Result<GameData, BuildError> {
        for (index, item) in self.items.iter().enumerate() {
            item.validate().map_err(|source| BuildError::InvalidItem {
                item: ItemId(index as u32),
                source,
            })?;
        }

        for (index, recipe) in self.recipes.iter().enumerate() {
            let id = RecipeId(index as u32);
            for entry in recipe.inputs.iter().chain(recipe.outputs.iter()) {
                if entry.item.index() >= self.items.len() {
                    return Err(BuildError::InvalidItemRef {
                        recipe: id,
                        item: entry.item,
                    });
                }
            }
            match self.items.get(recipe.produced_in.index()) {
                None => {
                    return Err(BuildError::InvalidItemRef {
                        recipe: id,
                        item: recipe.produced_in,
                    });
                }
                Some(facility) if !facility.is_facility() => {
                    return Err(BuildError::NotAFacility {
                        recipe: id,
                        item: recipe.produced_in,
                    });
                }
                Some(_) => {}
            }
            if let Some(empty) = recipe.outputs.iter().find(|entry| entry.count == 0) {
                return Err(BuildError::ZeroOutputCount {
                    recipe: id,
                    item: empty.item,
                });
            }
            let seconds = recipe.production_time_seconds;
            if !(seconds.is_finite() && seconds > 0.0) {
                return Err(BuildError::InvalidProductionTime { recipe: id, seconds });
            }
        }

        if let Some(&bad) = self
            .starting_recipes
            .iter()
            .find(|id| id.index() >= self.recipes.len())
        {
            return Err(BuildError::InvalidRecipeRef(bad));
        }

        Ok(GameData {
            items: self.items,
            item_name_to_id: self.item_name_to_id,
            recipes: self.recipes,
            starting_recipes: self.starting_recipes,
        })
    }
}

/// Immutable game data. Frozen after build(); every id it hands out
/// resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct GameData {
    items: Vec<Item>,
    item_name_to_id: HashMap<String, ItemId>,
    recipes: Vec<Recipe>,
    starting_recipes: Vec<RecipeId>,
}

impl GameData {
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn starting_recipes(&self) -> &[RecipeId] {
        &self.starting_recipes
    }

    pub fn get_item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.index())
    }

    pub fn get_recipe(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.get(id.index())
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.item_name_to_id.get(name).copied()
    }

    pub fn item_by_name(&self, name: &str) -> Option<&Item> {
        self.item_id(name).and_then(|id| self.get_item(id))
    }

    /// Name of an item; empty for ids from another `GameData`.
    pub fn item_name(&self, id: ItemId) -> &str {
        self.get_item(id).map_or("", |item| item.name.as_str())
    }

    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        (0..self.items.len()).map(|i| ItemId(i as u32))
    }

    pub fn recipe_ids(&self) -> impl Iterator<Item = RecipeId> + '_ {
        (0..self.recipes.len()).map(|i| RecipeId(i as u32))
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("invalid {item}: {source}")]
    InvalidItem {
        item: ItemId,
        #[source]
        source: ItemError,
    },
    #[error("{recipe} references unknown {item}")]
    InvalidItemRef { recipe: RecipeId, item: ItemId },
    #[error("{recipe} is produced in {item}, which is not a facility")]
    NotAFacility { recipe: RecipeId, item: ItemId },
    #[error("{recipe} produces zero of {item}")]
    ZeroOutputCount { recipe: RecipeId, item: ItemId },
    #[error("{recipe} has production time {seconds}, expected a positive number of seconds")]
    InvalidProductionTime { recipe: RecipeId, seconds: f64 },
    #[error("invalid recipe reference: {0}")]
    InvalidRecipeRef(RecipeId),
}
