use indexmap::IndexMap;

use crate::state::scoring::Tier;

/// Display status of a feature on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerStatus {
    /// Found; immutable once set.
    Correct(Tier),
    /// Wrong guess flash, cleared after a short delay.
    Incorrect,
    /// Hint reveal on the current target after repeated misses.
    Blinking,
}

impl AnswerStatus {
    /// Status label exposed to clients.
    pub fn label(self) -> &'static str {
        match self {
            AnswerStatus::Correct(tier) => tier.label(),
            AnswerStatus::Incorrect => "incorrect",
            AnswerStatus::Blinking => "blinking",
        }
    }

    /// Whether this is one of the terminal correct tiers.
    pub fn is_correct(self) -> bool {
        matches!(self, AnswerStatus::Correct(_))
    }
}

/// Feature name to display status, in first-write order.
#[derive(Debug, Clone, Default)]
pub struct AnswerStateStore {
    entries: IndexMap<String, AnswerStatus>,
}

impl AnswerStateStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status of `name`, if any.
    pub fn get(&self, name: &str) -> Option<AnswerStatus> {
        self.entries.get(name).copied()
    }

    /// Whether `name` already carries a correct tier.
    pub fn is_solved(&self, name: &str) -> bool {
        self.get(name).is_some_and(AnswerStatus::is_correct)
    }

    /// Record the tier for a found target. Returns false if `name` was already solved.
    pub fn mark_correct(&mut self, name: &str, tier: Tier) -> bool {
        if self.is_solved(name) {
            return false;
        }
        self.entries
            .insert(name.to_string(), AnswerStatus::Correct(tier));
        true
    }

    /// Flash `name` as a wrong guess. Solved names are left untouched.
    pub fn mark_incorrect(&mut self, name: &str) -> bool {
        if self.is_solved(name) {
            return false;
        }
        self.entries.insert(name.to_string(), AnswerStatus::Incorrect);
        true
    }

    /// Reveal `name` as a hint. Solved names are left untouched.
    pub fn mark_blinking(&mut self, name: &str) -> bool {
        if self.is_solved(name) {
            return false;
        }
        self.entries.insert(name.to_string(), AnswerStatus::Blinking);
        true
    }

    /// Drop the flash for `name` only if it is still exactly [`AnswerStatus::Incorrect`].
    pub fn clear_incorrect(&mut self, name: &str) -> bool {
        if self.get(name) != Some(AnswerStatus::Incorrect) {
            return false;
        }
        self.entries.shift_remove(name);
        true
    }

    /// Remove every hint reveal, returning the affected names.
    pub fn clear_blinking(&mut self) -> Vec<String> {
        let blinking: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, status)| **status == AnswerStatus::Blinking)
            .map(|(name, _)| name.clone())
            .collect();
        for name in &blinking {
            self.entries.shift_remove(name);
        }
        blinking
    }

    /// Iterate entries in first-write order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, AnswerStatus)> {
        self.entries
            .iter()
            .map(|(name, status)| (name.as_str(), *status))
    }

    /// Number of names with a status.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no name carries a status.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
