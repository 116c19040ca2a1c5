use crate::id::RecipeId;
use crate::recipe::Recipe;
use crate::registry::GameData;
use std::collections::HashMap;

/// Lookup of recipes by the name of an item they produce.
///
/// A read-only view over a [`GameData`]; matches are kept in recipe
/// declaration order.
#[derive(Debug, Clone)]
pub struct RecipeIndex<'a> {
    data: &'a GameData,
    by_output: HashMap<&'a str, Vec<RecipeId>>,
}

impl<'a> RecipeIndex<'a> {
    pub fn new(data: &'a GameData) -> Self {
        let mut by_output: HashMap<&'a str, Vec<RecipeId>> = HashMap::new();
        for (id, recipe) in data.recipe_ids().zip(data.recipes()) {
            for entry in &recipe.outputs {
                let matches = by_output.entry(data.item_name(entry.item)).or_default();
                // A recipe listing the same output twice is still one match.
                if matches.last() != Some(&id) {
                    matches.push(id);
                }
            }
        }
        Self { data, by_output }
    }

    pub fn data(&self) -> &'a GameData {
        self.data
    }

    /// Ids of every recipe with an output named `item_name`. Empty when
    /// nothing produces it.
    pub fn by_output(&self, item_name: &str) -> &[RecipeId] {
        self.by_output.get(item_name).map_or(&[], Vec::as_slice)
    }

    /// The recipes behind [`by_output`](Self::by_output).
    pub fn recipes_for(&self, item_name: &str) -> Vec<&'a Recipe> {
        self.by_output(item_name)
            .iter()
            .filter_map(|&id| self.data.get_recipe(id))
            .collect()
    }
}
