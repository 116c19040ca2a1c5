//! Serde structs for the `gameData` table of a Lua data file.
//!
//! The evaluated Lua value is bridged to JSON and deserialized into these
//! structs; the mapper then resolves raw ids into interned handles. Fields
//! not listed here are ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::hash::Hash;

// ===========================================================================
// Top level
// ===========================================================================

/// The `gameData` global.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGameData {
    /// Items keyed by raw id, in declaration order. Ids are kept as the
    /// table key text (`1001`), which is how recipes and facilities are
    /// matched against them.
    #[serde(deserialize_with = "keyed_table")]
    pub game_items: IndexMap<String, RawItem>,
    pub game_recipes: Vec<RawRecipe>,
    /// Facilities keyed by production type name, in declaration order.
    #[serde(deserialize_with = "keyed_table")]
    pub game_facilities: IndexMap<String, RawFacility>,
    pub starting_recipes: Vec<i64>,
}

// ===========================================================================
// Entries
// ===========================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RawItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRecipe {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    /// Flat `[item id, count, item id, count, ...]`.
    pub inputs: Vec<i64>,
    /// Same layout as `inputs`.
    pub outputs: Vec<i64>,
    pub seconds: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFacility {
    #[serde(default)]
    pub name: Option<String>,
    /// Raw ids of the buildings of this production type.
    #[serde(default)]
    pub buildings: Vec<i64>,
}

// ===========================================================================
// Helpers
// ===========================================================================

/// A Lua table with explicit keys, or `{}`. An empty constructor has no
/// keyed fields and so evaluates to an empty sequence.
#[derive(Deserialize)]
#[serde(untagged)]
enum KeyedTable<K: Eq + Hash, V> {
    Map(IndexMap<K, V>),
    Empty([(); 0]),
}

fn keyed_table<'de, D, K, V>(deserializer: D) -> Result<IndexMap<K, V>, D::Error>
where
    D: Deserializer<'de>,
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
{
    Ok(match KeyedTable::deserialize(deserializer)? {
        KeyedTable::Map(map) => map,
        KeyedTable::Empty(_) => IndexMap::new(),
    })
}
