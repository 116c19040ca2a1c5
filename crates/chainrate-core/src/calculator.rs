//! Requirement expansion.
//!
//! [`RateCalculator::expand`] turns "N items of X per minute" into a
//! [`RequirementNode`] whose children are the per-minute demands of the
//! chosen recipe's inputs. Children are computed lazily on every call to
//! [`RequirementNode::children`], so nothing is cached between walks.
//!
//! For a recipe making `out` units of the target every `t` seconds:
//!
//! ```text
//! standard = out / t * 60
//! scale    = target / standard
//! child    = count / t * 60 * scale
//! ```

use crate::id::{ItemId, RecipeId};
use crate::index::RecipeIndex;
use crate::recipe::{Recipe, RecipeEntry};
use crate::registry::GameData;
use serde::{Deserialize, Serialize};
use std::fmt;

// ===========================================================================
// Recipe selection
// ===========================================================================

/// Picks one recipe when several produce the same item.
///
/// Only consulted for two or more matches. Returns an index into `matches`,
/// which are in recipe declaration order.
pub trait RecipeSelector {
    fn select(&self, item_name: &str, matches: &[&Recipe]) -> usize;
}

impl<F> RecipeSelector for F
where
    F: Fn(&str, &[&Recipe]) -> usize,
{
    fn select(&self, item_name: &str, matches: &[&Recipe]) -> usize {
        self(item_name, matches)
    }
}

/// Always picks the first declared recipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstRecipe;

impl RecipeSelector for FirstRecipe {
    fn select(&self, _item_name: &str, _matches: &[&Recipe]) -> usize {
        0
    }
}

// ===========================================================================
// Errors
// ===========================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("{0} is not a registered item")]
    NotFound(String),
    #[error("no recipe for {0}")]
    NoRecipe(String),
    #[error("recipe cycle through {item}: {}", .path.join(" -> "))]
    CyclicRecipe { item: String, path: Vec<String> },
    #[error("{recipe} was indexed as producing {item} but has no such output")]
    MissingOutput { item: String, recipe: RecipeId },
    #[error("selector chose recipe {choice} of {candidates} for {item}")]
    InvalidSelection {
        item: String,
        choice: usize,
        candidates: usize,
    },
}

// ===========================================================================
// Calculator
// ===========================================================================

/// Expands item demands into requirement trees over one [`GameData`].
pub struct RateCalculator<'a, S = FirstRecipe> {
    data: &'a GameData,
    index: RecipeIndex<'a>,
    selector: S,
}

impl<'a> RateCalculator<'a> {
    /// A calculator that resolves ambiguity with [`FirstRecipe`].
    pub fn new(data: &'a GameData) -> Self {
        Self::with_selector(data, FirstRecipe)
    }
}

impl<'a, S: RecipeSelector> RateCalculator<'a, S> {
    pub fn with_selector(data: &'a GameData, selector: S) -> Self {
        Self {
            data,
            index: RecipeIndex::new(data),
            selector,
        }
    }

    pub fn data(&self) -> &'a GameData {
        self.data
    }

    pub fn index(&self) -> &RecipeIndex<'a> {
        &self.index
    }

    /// Requirements for producing `amount_per_minute` of `item_name`.
    ///
    /// Resources become leaves. Anything else is matched to a recipe here;
    /// the inputs are expanded when [`RequirementNode::children`] is walked.
    pub fn expand(
        &self,
        item_name: &str,
        amount_per_minute: f64,
    ) -> Result<RequirementNode<'_, S>, CalcError> {
        self.node(item_name, amount_per_minute, &[])
    }

    fn node<'c>(
        &'c self,
        item_name: &str,
        amount_per_minute: f64,
        ancestors: &[ItemId],
    ) -> Result<RequirementNode<'c, S>, CalcError> {
        let data: &'c GameData = self.data;
        let (item_id, item) = data
            .item_id(item_name)
            .and_then(|id| data.get_item(id).map(|item| (id, item)))
            .ok_or_else(|| CalcError::NotFound(item_name.to_string()))?;

        let mut path = ancestors.to_vec();
        path.push(item_id);

        let production = if item.is_resource() {
            None
        } else {
            if ancestors.contains(&item_id) {
                return Err(CalcError::CyclicRecipe {
                    item: item.name.clone(),
                    path: path.iter().map(|&id| data.item_name(id).to_string()).collect(),
                });
            }
            Some(self.production(item_name, amount_per_minute)?)
        };

        Ok(RequirementNode {
            calculator: self,
            item_name: item.name.as_str(),
            amount_per_minute,
            production,
            path,
        })
    }

    fn production<'c>(
        &'c self,
        item_name: &str,
        amount_per_minute: f64,
    ) -> Result<Production<'c>, CalcError> {
        let data: &'c GameData = self.data;
        let candidates: Vec<(RecipeId, &'c Recipe)> = self
            .index
            .by_output(item_name)
            .iter()
            .filter_map(|&id| data.get_recipe(id).map(|recipe| (id, recipe)))
            .collect();

        let choice = match candidates.len() {
            0 => return Err(CalcError::NoRecipe(item_name.to_string())),
            1 => 0,
            count => {
                tracing::info!(
                    item = item_name,
                    candidates = count,
                    "several recipes produce item, asking selector"
                );
                let recipes: Vec<&Recipe> = candidates.iter().map(|&(_, recipe)| recipe).collect();
                self.selector.select(item_name, &recipes)
            }
        };
        let &(recipe_id, recipe) =
            candidates
                .get(choice)
                .ok_or_else(|| CalcError::InvalidSelection {
                    item: item_name.to_string(),
                    choice,
                    candidates: candidates.len(),
                })?;

        let output = recipe
            .outputs
            .iter()
            .find(|entry| data.item_name(entry.item) == item_name)
            .ok_or_else(|| CalcError::MissingOutput {
                item: item_name.to_string(),
                recipe: recipe_id,
            })?;

        let standard = recipe.per_minute(output.count);
        Ok(Production {
            recipe_id,
            recipe,
            scale: amount_per_minute / standard,
        })
    }
}

impl<S> fmt::Debug for RateCalculator<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateCalculator")
            .field("items", &self.data.item_count())
            .field("recipes", &self.data.recipe_count())
            .finish_non_exhaustive()
    }
}

// ===========================================================================
// Requirement nodes
// ===========================================================================

#[derive(Clone, Copy)]
struct Production<'c> {
    recipe_id: RecipeId,
    recipe: &'c Recipe,
    scale: f64,
}

/// One item demand in a requirement tree.
pub struct RequirementNode<'c, S = FirstRecipe> {
    calculator: &'c RateCalculator<'c, S>,
    item_name: &'c str,
    amount_per_minute: f64,
    production: Option<Production<'c>>,
    /// Items from the root down to and including this one.
    path: Vec<ItemId>,
}

impl<'c, S: RecipeSelector> RequirementNode<'c, S> {
    pub fn item_name(&self) -> &'c str {
        self.item_name
    }

    pub fn amount_per_minute(&self) -> f64 {
        self.amount_per_minute
    }

    /// The recipe used to make this item; `None` for resources.
    pub fn recipe(&self) -> Option<RecipeId> {
        self.production.map(|p| p.recipe_id)
    }

    pub fn is_leaf(&self) -> bool {
        self.production.is_none()
    }

    /// Input demands, one per recipe input entry in declaration order. Each
    /// call starts a fresh expansion.
    pub fn children(&self) -> Children<'c, S> {
        let (inputs, recipe, scale): (&'c [RecipeEntry], _, _) = match self.production {
            Some(p) => (&p.recipe.inputs, Some(p.recipe), p.scale),
            None => (&[], None, 0.0),
        };
        Children {
            calculator: self.calculator,
            inputs: inputs.iter(),
            recipe,
            scale,
            path: self.path.clone(),
        }
    }

    /// Walk the whole subtree into an owned [`RequirementTree`], stopping at
    /// the first error.
    pub fn resolve(&self) -> Result<RequirementTree, CalcError> {
        let children = self
            .children()
            .map(|child| child.and_then(|node| node.resolve()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RequirementTree {
            item_name: self.item_name.to_string(),
            amount_per_minute: self.amount_per_minute,
            children,
        })
    }
}

impl<S> Clone for RequirementNode<'_, S> {
    fn clone(&self) -> Self {
        Self {
            calculator: self.calculator,
            item_name: self.item_name,
            amount_per_minute: self.amount_per_minute,
            production: self.production,
            path: self.path.clone(),
        }
    }
}

impl<S> fmt::Debug for RequirementNode<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequirementNode")
            .field("item_name", &self.item_name)
            .field("amount_per_minute", &self.amount_per_minute)
            .field("recipe", &self.production.map(|p| p.recipe_id))
            .finish()
    }
}

/// Lazy iterator over a node's input demands.
pub struct Children<'c, S = FirstRecipe> {
    calculator: &'c RateCalculator<'c, S>,
    inputs: std::slice::Iter<'c, RecipeEntry>,
    recipe: Option<&'c Recipe>,
    scale: f64,
    path: Vec<ItemId>,
}

impl<'c, S: RecipeSelector> Iterator for Children<'c, S> {
    type Item = Result<RequirementNode<'c, S>, CalcError>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inputs.next()?;
        let recipe = self.recipe?;
        let name = self.calculator.data.item_name(entry.item);
        let amount = recipe.per_minute(entry.count) * self.scale;
        Some(self.calculator.node(name, amount, &self.path))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inputs.size_hint()
    }
}

impl<S: RecipeSelector> ExactSizeIterator for Children<'_, S> {}

// ===========================================================================
// Resolved trees
// ===========================================================================

/// An owned, fully expanded requirement tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementTree {
    pub item_name: String,
    pub amount_per_minute: f64,
    #[serde(default)]
    pub children: Vec<RequirementTree>,
}

impl RequirementTree {
    /// Per-minute totals of the leaf items, summed by name in first-seen
    /// order.
    pub fn leaf_totals(&self) -> Vec<(String, f64)> {
        let mut totals: Vec<(String, f64)> = Vec::new();
        self.collect_leaves(&mut totals);
        totals
    }

    fn collect_leaves(&self, totals: &mut Vec<(String, f64)>) {
        if self.children.is_empty() {
            match totals.iter_mut().find(|(name, _)| *name == self.item_name) {
                Some((_, amount)) => *amount += self.amount_per_minute,
                None => totals.push((self.item_name.clone(), self.amount_per_minute)),
            }
            return;
        }
        for child in &self.children {
            child.collect_leaves(totals);
        }
    }
}
