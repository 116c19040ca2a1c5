//! Chainrate Core -- production-chain requirement calculation.
//!
//! This crate holds the game's item and recipe model and answers the
//! question "to make N of X per minute, how much of every input is needed
//! per minute?".
//!
//! ```rust,ignore
//! let calc = RateCalculator::new(&data);
//! let iron = calc.expand("iron", 12.0)?;
//! for water in iron.children() {
//!     let water = water?;
//!     println!("{} {}/min", water.item_name(), water.amount_per_minute());
//! }
//! ```
//!
//! # Key Types
//!
//! - [`registry::GameData`] -- Immutable items, recipes and starting
//!   recipes, built once through [`registry::GameDataBuilder`].
//! - [`item::Item`] -- An item with its kind, and for facilities the
//!   production type and speed.
//! - [`index::RecipeIndex`] -- Recipes by the name of an item they produce.
//! - [`calculator::RateCalculator`] -- Expands a demand into a lazy
//!   [`calculator::RequirementNode`] tree, using a
//!   [`calculator::RecipeSelector`] when several recipes match.
//! - [`wire`] -- JSON form of `GameData` with items referenced by index.

pub mod calculator;
pub mod id;
pub mod index;
pub mod item;
pub mod recipe;
pub mod registry;
pub mod wire;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use calculator::{
    CalcError, FirstRecipe, RateCalculator, RecipeSelector, RequirementNode, RequirementTree,
};
pub use id::{ItemId, RecipeId};
pub use item::{Item, ItemKind, ProductionType};
pub use recipe::{Recipe, RecipeEntry};
pub use registry::{BuildError, GameData, GameDataBuilder};
