//! Loading pipeline: reads a Lua data file, evaluates it, and maps the
//! `gameData` global into [`GameData`].
//!
//! Options come from [`LoadOptions`], which can be written as TOML:
//!
//! ```toml
//! global_name = "gameData"
//! production_speed = 1.0
//! ```

use crate::mapper::{ValidationError, map_game_data};
use chainrate_core::GameData;
use chainrate_lua::{Evaluator, ParseError, SyntaxError, Value};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The data file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The source is not valid Lua, or uses syntax outside the data subset.
    #[error("parse error in {source_name}: {error}")]
    Parse {
        source_name: String,
        #[source]
        error: ParseError,
    },

    /// The source parsed, but evaluating it hit an unsupported construct.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The configured global was never assigned.
    #[error("did not find variable \"{name}\"")]
    MissingGlobal { name: String },

    /// The configured global is not a keyed table.
    #[error("expected \"{name}\" to be a dictionary, but instead is {found}")]
    NotATable { name: String, found: &'static str },

    /// The table does not describe consistent game data.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An options file could not be parsed.
    #[error("invalid load options in {file}: {detail}")]
    Options { file: PathBuf, detail: String },
}

// ===========================================================================
// Options
// ===========================================================================

/// Knobs for turning a Lua data file into game data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
    /// Name of the global holding the game data table.
    pub global_name: String,
    /// Production speed given to every facility. Data files carry no speed,
    /// so this is a placeholder carried through unchanged.
    pub production_speed: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            global_name: "gameData".to_string(),
            production_speed: 1.0,
        }
    }
}

impl LoadOptions {
    pub fn from_toml_str(content: &str) -> Result<Self, DataLoadError> {
        toml::from_str(content).map_err(|e| DataLoadError::Options {
            file: PathBuf::from("<memory>"),
            detail: e.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, DataLoadError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| DataLoadError::Options {
            file: path.to_path_buf(),
            detail: e.to_string(),
        })
    }
}

// ===========================================================================
// Loading
// ===========================================================================

/// Parse and evaluate Lua `source`, then map its game data global.
/// `source_name` appears in error locations.
pub fn load_game_data_str(
    source: &str,
    source_name: &str,
    options: &LoadOptions,
) -> Result<GameData, DataLoadError> {
    let chunk = chainrate_lua::parse(source).map_err(|error| DataLoadError::Parse {
        source_name: source_name.to_string(),
        error,
    })?;
    let globals = Evaluator::new(source_name).evaluate(&chunk)?;

    let table = game_data_table(&globals, &options.global_name)?;
    let data = map_game_data(table, options)?;
    info!(
        source = source_name,
        items = data.item_count(),
        recipes = data.recipe_count(),
        starting_recipes = data.starting_recipes().len(),
        "loaded game data"
    );
    Ok(data)
}

/// Read and load a Lua data file.
pub fn load_game_data(path: &Path, options: &LoadOptions) -> Result<GameData, DataLoadError> {
    let source = std::fs::read_to_string(path)?;
    load_game_data_str(&source, &path.display().to_string(), options)
}

fn game_data_table<'v>(globals: &'v Value, name: &str) -> Result<&'v Value, DataLoadError> {
    match globals.get(name) {
        None | Some(Value::Nil) => Err(DataLoadError::MissingGlobal {
            name: name.to_string(),
        }),
        Some(table @ Value::Map(_)) => Ok(table),
        Some(other) => Err(DataLoadError::NotATable {
            name: name.to_string(),
            found: other.type_name(),
        }),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
