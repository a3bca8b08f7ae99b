use supplygen_data::{parse_catalog, parse_rule};

const SAMPLE_CATALOG: &str = r#"{
  "cards": [
    {"id": "cellar", "name": "Cellar", "expansion": "Base", "cost": 2,
     "categories": ["action"], "functions": ["draw"]},
    {"id": "moat", "name": "Moat", "expansion": "Base", "cost": 2,
     "categories": ["action", "reaction"], "functions": ["draw"]},
    {"id": "witch", "name": "Witch", "expansion": "Base", "cost": 5,
     "categories": ["action", "attack"], "functions": ["draw"]},
    {"id": "baron", "name": "Baron", "expansion": "Intrigue", "cost": 4,
     "categories": ["action"], "functions": ["buy", "gain"]}
  ]
}"#;

#[test]
fn sample_catalog_loads_with_expansions_in_catalog_order() {
    let catalog = parse_catalog(SAMPLE_CATALOG).expect("parse");
    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.expansions(), ["Base", "Intrigue"]);
    let base = catalog.in_expansions(&["Base".to_string()]);
    assert_eq!(base.len(), 3);
}

#[test]
fn rule_document_converts_into_a_spec() {
    let raw = r#"{
      "target_count": 10,
      "required_functions": ["draw", "trash"],
      "forbidden_category": "curse",
      "compound": {"if_present": "attack", "then_required": "reaction"}
    }"#;
    let rule = parse_rule(raw).expect("parse");
    assert_eq!(rule.target_count, 10);
    let spec = rule.spec();
    assert_eq!(spec.required_functions, ["draw", "trash"]);
    assert_eq!(spec.forbidden_category.as_deref(), Some("curse"));
    let compound = spec.compound.expect("compound");
    assert_eq!(compound.if_present, "attack");
    assert_eq!(compound.then_required, "reaction");
}

#[test]
fn malformed_documents_are_rejected_with_context() {
    assert!(parse_catalog("{").is_err());
    assert!(parse_rule(r#"{"compound": {"if_present": "", "then_required": "reaction"}}"#).is_err());
    let dup = r#"{"cards": [
        {"id": "moat", "name": "Moat", "expansion": "Base", "cost": 2},
        {"id": "moat", "name": "Moat", "expansion": "Base", "cost": 2}
    ]}"#;
    let err = parse_catalog(dup).expect_err("duplicate id");
    assert!(err.to_string().contains("moat"));
}
