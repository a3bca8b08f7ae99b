use serde::{Deserialize, Serialize};

pub use supplygen_core::{Card, Catalog, CompoundRule, ConstraintSpec, RandomizerRule, SortKey};

/// Top-level shape of `cards.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDoc {
    pub cards: Vec<Card>,
}
