//! Item classification.
//!
//! Every item has a [`ItemKind`]. Items of kind `PRODUCTION` are buildings
//! and also carry a [`ProductionType`]; those whose type is not `NONE` are
//! *facilities* that recipes run in, and carry a production speed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A string that is not a member of one of the fixed enumerations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {enumeration} '{value}'")]
pub struct UnknownVariant {
    pub enumeration: &'static str,
    pub value: String,
}

// ===========================================================================
// Item kind
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Resource,
    Material,
    Component,
    Product,
    Logistics,
    Production,
    Matrix,
}

impl ItemKind {
    pub const ALL: [ItemKind; 7] = [
        ItemKind::Resource,
        ItemKind::Material,
        ItemKind::Component,
        ItemKind::Product,
        ItemKind::Logistics,
        ItemKind::Production,
        ItemKind::Matrix,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Resource => "RESOURCE",
            ItemKind::Material => "MATERIAL",
            ItemKind::Component => "COMPONENT",
            ItemKind::Product => "PRODUCT",
            ItemKind::Logistics => "LOGISTICS",
            ItemKind::Production => "PRODUCTION",
            ItemKind::Matrix => "MATRIX",
        }
    }
}

impl FromStr for ItemKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                enumeration: "item type",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===========================================================================
// Production type
// ===========================================================================

/// The category of facility a recipe runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionType {
    /// A building that runs no recipes (belts, storage, ...).
    None,
    Smelt,
    Chemical,
    Refine,
    Assemble,
    Particle,
    Exchange,
    PhotonStore,
    Fractionate,
    Research,
}

impl ProductionType {
    pub const ALL: [ProductionType; 10] = [
        ProductionType::None,
        ProductionType::Smelt,
        ProductionType::Chemical,
        ProductionType::Refine,
        ProductionType::Assemble,
        ProductionType::Particle,
        ProductionType::Exchange,
        ProductionType::PhotonStore,
        ProductionType::Fractionate,
        ProductionType::Research,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProductionType::None => "NONE",
            ProductionType::Smelt => "SMELT",
            ProductionType::Chemical => "CHEMICAL",
            ProductionType::Refine => "REFINE",
            ProductionType::Assemble => "ASSEMBLE",
            ProductionType::Particle => "PARTICLE",
            ProductionType::Exchange => "EXCHANGE",
            ProductionType::PhotonStore => "PHOTON_STORE",
            ProductionType::Fractionate => "FRACTIONATE",
            ProductionType::Research => "RESEARCH",
        }
    }
}

impl FromStr for ProductionType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductionType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                enumeration: "production type",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for ProductionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===========================================================================
// Item
// ===========================================================================

/// Ways an [`Item`] can violate the production-field rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("production item '{name}' has no production type")]
    MissingProductionType { name: String },
    #[error("{kind} item '{name}' must not have a production type")]
    UnexpectedProductionType { name: String, kind: ItemKind },
    #[error("facility '{name}' has no production speed")]
    MissingProductionSpeed { name: String },
    #[error("item '{name}' has a production speed but is not a facility")]
    UnexpectedProductionSpeed { name: String },
}

/// An item definition. Serializes as
/// `{ name, type, productionType?, productionSpeed? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Present iff `kind` is `PRODUCTION`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_type: Option<ProductionType>,
    /// Present iff `production_type` is present and not `NONE`. The value is
    /// a placeholder multiplier carried through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_speed: Option<f64>,
}

impl Item {
    /// An item of the given kind. `PRODUCTION` items get type `NONE`; use
    /// [`Item::facility`] for buildings that run recipes.
    pub fn new(name: &str, kind: ItemKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            production_type: (kind == ItemKind::Production).then_some(ProductionType::None),
            production_speed: None,
        }
    }

    /// A `PRODUCTION` item of the given production type. The speed is kept
    /// only when the type is not `NONE`.
    pub fn facility(name: &str, production_type: ProductionType, speed: f64) -> Self {
        Self {
            name: name.to_string(),
            kind: ItemKind::Production,
            production_type: Some(production_type),
            production_speed: (production_type != ProductionType::None).then_some(speed),
        }
    }

    pub fn is_resource(&self) -> bool {
        self.kind == ItemKind::Resource
    }

    /// A production item that recipes can be produced in.
    pub fn is_facility(&self) -> bool {
        self.kind == ItemKind::Production
            && matches!(self.production_type, Some(ty) if ty != ProductionType::None)
    }

    /// Check the production-field rules.
    pub fn validate(&self) -> Result<(), ItemError> {
        let name = || self.name.clone();
        match (self.kind, self.production_type) {
            (ItemKind::Production, None) => {
                return Err(ItemError::MissingProductionType { name: name() });
            }
            (kind, Some(_)) if kind != ItemKind::Production => {
                return Err(ItemError::UnexpectedProductionType { name: name(), kind });
            }
            _ => {}
        }
        match (self.is_facility(), self.production_speed) {
            (true, None) => Err(ItemError::MissingProductionSpeed { name: name() }),
            (false, Some(_)) => Err(ItemError::UnexpectedProductionSpeed { name: name() }),
            _ => Ok(()),
        }
    }
}
