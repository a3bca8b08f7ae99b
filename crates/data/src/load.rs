use crate::schema::CatalogDoc;
use anyhow::{bail, Context};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use supplygen_core::{Card, Catalog, RandomizerRule};

pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_catalog(&raw).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_catalog(raw: &str) -> anyhow::Result<Catalog> {
    let doc: CatalogDoc = serde_json::from_str(raw)?;
    validate_cards(&doc.cards)?;
    Ok(Catalog::new(doc.cards))
}

pub fn load_rule(path: &Path) -> anyhow::Result<RandomizerRule> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_rule(&raw).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_rule(raw: &str) -> anyhow::Result<RandomizerRule> {
    let rule: RandomizerRule = serde_json::from_str(raw)?;
    validate_rule(&rule)?;
    Ok(rule)
}

pub fn load_expansion_order(path: &Path) -> anyhow::Result<Vec<String>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_expansion_order(&raw).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_expansion_order(raw: &str) -> anyhow::Result<Vec<String>> {
    let order: Vec<String> = serde_json::from_str(raw)?;
    let mut seen = HashSet::new();
    for name in &order {
        if name.trim().is_empty() {
            bail!("expansion name cannot be empty");
        }
        if !seen.insert(name.as_str()) {
            bail!("duplicate expansion {}", name);
        }
    }
    Ok(order)
}

/// Sort catalog expansion labels by the display order list; labels the list
/// does not know come after the known ones, in first-seen catalog order.
pub fn order_expansions(known: &[String], order: &[String]) -> Vec<String> {
    let mut out: Vec<String> = order.iter().filter(|name| known.contains(name)).cloned().collect();
    for name in known {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

fn validate_cards(cards: &[Card]) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for card in cards {
        if card.id.trim().is_empty() {
            bail!("card id cannot be empty");
        }
        if card.name.trim().is_empty() {
            bail!("card {} has an empty name", card.id);
        }
        if card.expansion.trim().is_empty() {
            bail!("card {} has an empty expansion", card.id);
        }
        if !seen.insert(card.id.as_str()) {
            bail!("duplicate card id {}", card.id);
        }
        for tag in card.categories.iter().chain(card.functions.iter()) {
            if tag.trim().is_empty() {
                bail!("card {} has an empty tag", card.id);
            }
        }
    }
    Ok(())
}

fn validate_rule(rule: &RandomizerRule) -> anyhow::Result<()> {
    if rule.target_count == 0 {
        bail!("target_count must be at least 1");
    }
    let mut seen = HashSet::new();
    for tag in &rule.required_functions {
        if tag.trim().is_empty() {
            bail!("required function cannot be empty");
        }
        if !seen.insert(tag.as_str()) {
            bail!("duplicate required function {}", tag);
        }
    }
    if let Some(category) = &rule.forbidden_category {
        if category.trim().is_empty() {
            bail!("forbidden category cannot be empty");
        }
    }
    if let Some(compound) = &rule.compound {
        if compound.if_present.trim().is_empty() || compound.then_required.trim().is_empty() {
            bail!("compound rule categories cannot be empty");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_parses_and_defaults_tags() {
        let raw = r#"{"cards":[
            {"id":"village","name":"Village","expansion":"Base","cost":3},
            {"id":"witch","name":"Witch","expansion":"Base","cost":5,
             "categories":["action","attack"],"functions":["draw"]}
        ]}"#;
        let catalog = parse_catalog(raw).expect("parse");
        assert_eq!(catalog.len(), 2);
        let village = catalog.card_by_id("village").expect("village");
        assert!(village.categories.is_empty());
        let witch = catalog.card_by_id("witch").expect("witch");
        assert!(witch.has_category("attack"));
        assert!(witch.has_function("draw"));
    }

    #[test]
    fn duplicate_card_id_is_rejected() {
        let raw = r#"{"cards":[
            {"id":"village","name":"Village","expansion":"Base","cost":3},
            {"id":"village","name":"Village","expansion":"Intrigue","cost":3}
        ]}"#;
        let err = parse_catalog(raw).expect_err("duplicate must fail");
        assert!(err.to_string().contains("duplicate card id"));
    }

    #[test]
    fn empty_card_id_is_rejected() {
        let raw = r#"{"cards":[{"id":" ","name":"Village","expansion":"Base","cost":3}]}"#;
        let err = parse_catalog(raw).expect_err("empty id must fail");
        assert!(err.to_string().contains("id cannot be empty"));
    }

    #[test]
    fn rule_defaults_apply() {
        let rule = parse_rule("{}").expect("parse");
        assert_eq!(rule.target_count, 10);
        assert!(rule.required_functions.is_empty());
        assert!(rule.compound.is_none());
    }

    #[test]
    fn rule_rejects_zero_target() {
        let err = parse_rule(r#"{"target_count":0}"#).expect_err("zero target must fail");
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn rule_rejects_duplicate_required_functions() {
        let err = parse_rule(r#"{"required_functions":["draw","draw"]}"#)
            .expect_err("duplicate must fail");
        assert!(err.to_string().contains("duplicate required function"));
    }

    #[test]
    fn expansion_order_rejects_duplicates() {
        let err = parse_expansion_order(r#"["Base","Base"]"#).expect_err("duplicate must fail");
        assert!(err.to_string().contains("duplicate expansion"));
    }

    #[test]
    fn unknown_expansions_sort_after_known_ones() {
        let known = vec![
            "Menagerie".to_string(),
            "Base".to_string(),
            "Homebrew".to_string(),
            "Intrigue".to_string(),
        ];
        let order = vec![
            "Base".to_string(),
            "Intrigue".to_string(),
            "Menagerie".to_string(),
        ];
        let sorted = order_expansions(&known, &order);
        assert_eq!(sorted, ["Base", "Intrigue", "Menagerie", "Homebrew"]);
    }
}
