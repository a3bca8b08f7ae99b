use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One supply position: a card, or a slot the players blanked on purpose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Slot {
    Card(String),
    Empty,
}

/// The current supply of a session. Slot positions are stable: rerolls and
/// blanking substitute in place rather than reordering.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Supply {
    pub slots: Vec<Slot>,
}

impl Supply {
    pub fn from_ids(ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            slots: ids.into_iter().map(Slot::Card).collect(),
        }
    }

    /// Ids of occupied slots, in slot order.
    pub fn card_ids(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Card(id) => Some(id.clone()),
                Slot::Empty => None,
            })
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.slots.iter().any(|slot| matches!(slot, Slot::Card(found) if found == id))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| matches!(slot, Slot::Card(_))).count()
    }

    pub fn empty_slots(&self) -> usize {
        self.len() - self.occupied()
    }

    /// Blank the selected card slots. Returns how many were blanked.
    pub fn blank(&mut self, selected: &HashSet<String>) -> usize {
        let mut blanked = 0;
        for slot in &mut self.slots {
            if let Slot::Card(id) = slot {
                if selected.contains(id.as_str()) {
                    *slot = Slot::Empty;
                    blanked += 1;
                }
            }
        }
        blanked
    }

    /// Substitute each selected card slot, in order, with the next
    /// replacement id; leftover replacements then fill empty slots. Returns
    /// how many slots changed.
    pub fn replace_selected(
        &mut self,
        selected: &HashSet<String>,
        new_ids: impl IntoIterator<Item = String>,
    ) -> usize {
        let mut queue = new_ids.into_iter();
        let mut changed = 0;
        for slot in &mut self.slots {
            if let Slot::Card(id) = slot {
                if !selected.contains(id.as_str()) {
                    continue;
                }
                let Some(next) = queue.next() else {
                    return changed;
                };
                *slot = Slot::Card(next);
                changed += 1;
            }
        }
        for slot in &mut self.slots {
            if matches!(slot, Slot::Empty) {
                let Some(next) = queue.next() else {
                    return changed;
                };
                *slot = Slot::Card(next);
                changed += 1;
            }
        }
        changed
    }

    /// Fill empty slots only, in slot order.
    pub fn fill_empty(&mut self, new_ids: impl IntoIterator<Item = String>) -> usize {
        self.replace_selected(&HashSet::new(), new_ids)
    }
}
