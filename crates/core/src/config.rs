use crate::{CompoundRule, ConstraintSpec};
use serde::{Deserialize, Serialize};

fn default_target_count() -> usize {
    10
}

/// Randomizer rule document (`randomizer.json`): the constraint spec plus
/// the supply size it applies to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RandomizerRule {
    #[serde(default = "default_target_count")]
    pub target_count: usize,
    #[serde(default)]
    pub required_functions: Vec<String>,
    #[serde(default)]
    pub forbidden_category: Option<String>,
    #[serde(default)]
    pub compound: Option<CompoundRule>,
}

impl Default for RandomizerRule {
    fn default() -> Self {
        Self {
            target_count: default_target_count(),
            required_functions: Vec::new(),
            forbidden_category: None,
            compound: None,
        }
    }
}

impl RandomizerRule {
    pub fn spec(&self) -> ConstraintSpec {
        ConstraintSpec {
            required_functions: self.required_functions.clone(),
            forbidden_category: self.forbidden_category.clone(),
            compound: self.compound.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rule_is_unconstrained_ten() {
        let rule = RandomizerRule::default();
        assert_eq!(rule.target_count, 10);
        assert_eq!(rule.spec(), ConstraintSpec::default());
    }
}
