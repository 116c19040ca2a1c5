use crate::id::ItemId;

/// A recipe input/output entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeEntry {
    pub item: ItemId,
    pub count: u32,
}

impl RecipeEntry {
    pub fn new(item: ItemId, count: u32) -> Self {
        Self { item, count }
    }
}

/// A recipe: consumes `inputs` and yields `outputs` once per
/// `production_time_seconds` in the `produced_in` facility.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub inputs: Vec<RecipeEntry>,
    pub outputs: Vec<RecipeEntry>,
    pub produced_in: ItemId,
    pub production_time_seconds: f64,
}

impl Recipe {
    pub fn new(
        inputs: Vec<RecipeEntry>,
        outputs: Vec<RecipeEntry>,
        produced_in: ItemId,
        production_time_seconds: f64,
    ) -> Self {
        Self {
            inputs,
            outputs,
            produced_in,
            production_time_seconds,
        }
    }

    /// The first output entry for `item`, if the recipe produces it.
    pub fn output(&self, item: ItemId) -> Option<&RecipeEntry> {
        self.outputs.iter().find(|entry| entry.item == item)
    }

    /// Items per minute of `count` units made every cycle.
    pub fn per_minute(&self, count: u32) -> f64 {
        count as f64 / self.production_time_seconds * 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iron_from_water() -> Recipe {
        Recipe::new(
            vec![RecipeEntry::new(ItemId(0), 3)],
            vec![RecipeEntry::new(ItemId(1), 1)],
            ItemId(2),
            5.0,
        )
    }

    #[test]
    fn output_lookup() {
        let recipe = iron_from_water();
        assert_eq!(recipe.output(ItemId(1)), Some(&RecipeEntry::new(ItemId(1), 1)));
        assert_eq!(recipe.output(ItemId(0)), None);
    }

    #[test]
    fn per_minute_rates() {
        let recipe = iron_from_water();
        assert_eq!(recipe.per_minute(1), 12.0);
        assert_eq!(recipe.per_minute(3), 36.0);
        assert_eq!(recipe.per_minute(0), 0.0);
    }
}
