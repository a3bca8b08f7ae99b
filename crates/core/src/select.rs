use crate::{Card, RngState};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Attempt budget for one `select_supply` invocation. Within the budget only
/// the random draws differ between attempts; the pool is fixed.
pub const MAX_ATTEMPTS: u32 = 20;

/// Declarative constraints over one supply draw.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConstraintSpec {
    /// Function tags that must each be represented in the final supply,
    /// unless a kept card already carries them. Enumerated in order.
    #[serde(default)]
    pub required_functions: Vec<String>,
    /// Category excluded from the candidate pool entirely.
    #[serde(default)]
    pub forbidden_category: Option<String>,
    #[serde(default)]
    pub compound: Option<CompoundRule>,
}

/// "If `if_present` shows up in the supply, `then_required` must too."
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompoundRule {
    pub if_present: String,
    pub then_required: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// No pool candidate carries a required function tag. Fatal to the
    /// invocation: the miss is attempt-invariant, so retrying cannot cure it.
    #[error("no candidate carries required function '{0}'")]
    InsufficientCandidates(String),
    /// Not enough candidates left to fill every slot in one attempt.
    #[error("not enough candidates to fill the supply")]
    PoolExhausted,
    /// Every attempt in the budget failed.
    #[error("no valid supply found within the attempt budget")]
    ConstraintUnsatisfiable,
}

/// Failure of a single attempt. `MissingFunction` aborts the invocation;
/// the rest send the retry controller around again.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AttemptError {
    MissingFunction(String),
    PoolExhausted,
    CompoundUnsatisfied,
}

#[derive(Debug)]
enum RetryState {
    Attempting { attempt: u32 },
    Retrying { attempt: u32 },
    Success(Vec<String>),
    ExhaustedRetries,
}

/// Draw a full supply: the kept cards plus enough newly selected candidates
/// to reach `target_count`, honoring `spec`. Returns the final card ids,
/// kept ids first, or a typed failure. Inputs are never mutated; the only
/// state consumed is the caller's `rng`.
pub fn select_supply(
    candidates: &[Card],
    kept: &[Card],
    replaced: &HashSet<String>,
    spec: &ConstraintSpec,
    target_count: usize,
    rng: &mut RngState,
) -> Result<Vec<String>, SelectError> {
    let pool = eligible_pool(candidates, kept, replaced, spec.forbidden_category.as_deref());

    let mut state = RetryState::Attempting { attempt: 1 };
    loop {
        state = match state {
            RetryState::Attempting { attempt } => {
                match run_attempt(&pool, kept, spec, target_count, rng) {
                    Ok(ids) => RetryState::Success(ids),
                    Err(AttemptError::MissingFunction(tag)) => {
                        return Err(SelectError::InsufficientCandidates(tag));
                    }
                    Err(_) if attempt < MAX_ATTEMPTS => RetryState::Retrying { attempt },
                    Err(_) => RetryState::ExhaustedRetries,
                }
            }
            RetryState::Retrying { attempt } => RetryState::Attempting { attempt: attempt + 1 },
            RetryState::Success(ids) => return Ok(ids),
            RetryState::ExhaustedRetries => return Err(SelectError::ConstraintUnsatisfiable),
        };
    }
}

/// Working set for one invocation: candidates minus kept ids, minus the ids
/// being replaced, minus any card in the forbidden category. An empty result
/// is not an error here; downstream steps decide what it means.
pub fn eligible_pool(
    candidates: &[Card],
    kept: &[Card],
    replaced: &HashSet<String>,
    forbidden_category: Option<&str>,
) -> Vec<Card> {
    let kept_ids: HashSet<&str> = kept.iter().map(|card| card.id.as_str()).collect();
    candidates
        .iter()
        .filter(|card| !kept_ids.contains(card.id.as_str()))
        .filter(|card| !replaced.contains(card.id.as_str()))
        .filter(|card| match forbidden_category {
            Some(tag) => !card.has_category(tag),
            None => true,
        })
        .cloned()
        .collect()
}

fn run_attempt(
    pool: &[Card],
    kept: &[Card],
    spec: &ConstraintSpec,
    target_count: usize,
    rng: &mut RngState,
) -> Result<Vec<String>, AttemptError> {
    let mut remaining = pool.to_vec();
    let mandatory = draw_mandatory(&mut remaining, kept, &spec.required_functions, rng)?;
    let mut fill = draw_fill(&mut remaining, kept.len() + mandatory.len(), target_count, rng)?;

    if let Some(rule) = &spec.compound {
        if !satisfies_compound(kept, &mandatory, &fill, rule) {
            repair_fill(pool, kept, &mandatory, &mut fill, rule, rng)?;
        }
    }

    let mut ids = Vec::with_capacity(target_count);
    ids.extend(kept.iter().map(|card| card.id.clone()));
    ids.extend(mandatory.into_iter().map(|card| card.id));
    ids.extend(fill.into_iter().map(|card| card.id));
    Ok(ids)
}

/// One uniform draw per required function not already covered by a kept
/// card. Picked cards leave `remaining` so later tags and the fill step
/// cannot reuse them.
fn draw_mandatory(
    remaining: &mut Vec<Card>,
    kept: &[Card],
    required: &[String],
    rng: &mut RngState,
) -> Result<Vec<Card>, AttemptError> {
    let mut mandatory = Vec::new();
    for tag in required {
        if kept.iter().any(|card| card.has_function(tag)) {
            continue;
        }
        let indices: Vec<usize> = remaining
            .iter()
            .enumerate()
            .filter(|(_, card)| card.has_function(tag))
            .map(|(idx, _)| idx)
            .collect();
        let Some(slot) = rng.pick_index(indices.len()) else {
            return Err(AttemptError::MissingFunction(tag.clone()));
        };
        mandatory.push(remaining.swap_remove(indices[slot]));
    }
    Ok(mandatory)
}

/// Uniform without-replacement draw for the slots that are neither kept nor
/// mandatory. Overshoot (kept + mandatory past the target) counts as
/// exhaustion as well.
fn draw_fill(
    remaining: &mut Vec<Card>,
    already_picked: usize,
    target_count: usize,
    rng: &mut RngState,
) -> Result<Vec<Card>, AttemptError> {
    let Some(slots) = target_count.checked_sub(already_picked) else {
        return Err(AttemptError::PoolExhausted);
    };
    if remaining.len() < slots {
        return Err(AttemptError::PoolExhausted);
    }
    rng.shuffle(remaining);
    Ok(remaining.drain(..slots).collect())
}

fn satisfies_compound(kept: &[Card], mandatory: &[Card], fill: &[Card], rule: &CompoundRule) -> bool {
    let has_category = |tag: &str| {
        kept.iter()
            .chain(mandatory.iter())
            .chain(fill.iter())
            .any(|card| card.has_category(tag))
    };
    !has_category(&rule.if_present) || has_category(&rule.then_required)
}

/// Single corrective substitution: one freely chosen fill card out, one pool
/// card carrying the required category in. The swapped-out card cannot carry
/// that category (validation would have passed), so the result satisfies the
/// rule without a second validation pass.
fn repair_fill(
    pool: &[Card],
    kept: &[Card],
    mandatory: &[Card],
    fill: &mut [Card],
    rule: &CompoundRule,
    rng: &mut RngState,
) -> Result<(), AttemptError> {
    let Some(out) = rng.pick_index(fill.len()) else {
        return Err(AttemptError::CompoundUnsatisfied);
    };
    let selected: HashSet<String> = kept
        .iter()
        .chain(mandatory.iter())
        .chain(fill.iter())
        .map(|card| card.id.clone())
        .collect();
    let insertable: Vec<&Card> = pool
        .iter()
        .filter(|card| card.has_category(&rule.then_required))
        .filter(|card| !selected.contains(card.id.as_str()))
        .collect();
    let Some(pick) = rng.pick_index(insertable.len()) else {
        return Err(AttemptError::CompoundUnsatisfied);
    };
    fill[out] = insertable[pick].clone();
    Ok(())
}
