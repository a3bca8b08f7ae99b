use crate::Card;

/// The full card list for a game setup. Snapshot source for the selection
/// engine: callers take filtered copies out, the catalog itself stays put.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub cards: Vec<Card>,
}

impl Catalog {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn card_by_id(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.card_by_id(id).is_some()
    }

    pub fn in_expansions(&self, names: &[String]) -> Vec<Card> {
        self.cards
            .iter()
            .filter(|card| names.iter().any(|name| *name == card.expansion))
            .cloned()
            .collect()
    }

    /// Distinct expansion labels in first-seen catalog order.
    pub fn expansions(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for card in &self.cards {
            if !out.contains(&card.expansion) {
                out.push(card.expansion.clone());
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
