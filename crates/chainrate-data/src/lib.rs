//! Chainrate Data -- loads game data from Lua data-definition files.
//!
//! ```rust,ignore
//! let data = chainrate_data::load_game_data(Path::new("game.lua"), &LoadOptions::default())?;
//! ```
//!
//! The pipeline is parse -> evaluate -> decode ([`schema`]) -> map
//! ([`mapper`]). Raw numeric ids from the file are replaced by interned
//! handles while mapping.

pub mod loader;
pub mod mapper;
pub mod schema;

pub use loader::{DataLoadError, LoadOptions, load_game_data, load_game_data_str};
pub use mapper::{ValidationError, map_game_data};
