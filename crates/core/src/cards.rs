use serde::{Deserialize, Serialize};

/// One kingdom card as it exists in the catalog. The selection engine treats
/// cards as immutable snapshots and never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub expansion: String,
    pub cost: u32,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub functions: Vec<String>,
}

impl Card {
    pub fn has_category(&self, tag: &str) -> bool {
        self.categories.iter().any(|value| value == tag)
    }

    pub fn has_function(&self, tag: &str) -> bool {
        self.functions.iter().any(|value| value == tag)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortKey {
    Cost,
    Name,
}

/// Display ordering: cost ascending with name as tiebreak, or name alone.
pub fn sort_cards(cards: &mut [Card], key: SortKey) {
    match key {
        SortKey::Cost => cards.sort_by(|a, b| a.cost.cmp(&b.cost).then_with(|| a.name.cmp(&b.name))),
        SortKey::Name => cards.sort_by(|a, b| a.name.cmp(&b.name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, name: &str, cost: u32) -> Card {
        Card {
            id: id.to_string(),
            name: name.to_string(),
            expansion: "Base".to_string(),
            cost,
            categories: vec!["action".to_string()],
            functions: Vec::new(),
        }
    }

    #[test]
    fn tag_membership() {
        let mut sample = card("witch", "Witch", 5);
        sample.categories = vec!["action".to_string(), "attack".to_string()];
        sample.functions = vec!["draw".to_string()];
        assert!(sample.has_category("attack"));
        assert!(!sample.has_category("reaction"));
        assert!(sample.has_function("draw"));
        assert!(!sample.has_function("trash"));
    }

    #[test]
    fn cost_sort_breaks_ties_by_name() {
        let mut cards = vec![
            card("smithy", "Smithy", 4),
            card("village", "Village", 3),
            card("militia", "Militia", 4),
        ];
        sort_cards(&mut cards, SortKey::Cost);
        let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Village", "Militia", "Smithy"]);
    }

    #[test]
    fn name_sort_ignores_cost() {
        let mut cards = vec![card("witch", "Witch", 5), card("cellar", "Cellar", 2)];
        sort_cards(&mut cards, SortKey::Name);
        assert_eq!(cards[0].name, "Cellar");
    }
}
