use std::collections::BTreeSet;

use zeronight_shared::shared_word_game::LevelDescriptor;

/// Ordered level list; position in the list is the unlock order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelCatalog {
    levels: Vec<LevelDescriptor>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<LevelDescriptor>) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> &[LevelDescriptor] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn descriptor_of(&self, level: u32) -> Option<&LevelDescriptor> {
        self.levels.iter().find(|l| l.level == level)
    }

    /// Lowest level not yet solved, or the last level once everything is solved.
    /// An empty catalog points at level 1.
    pub fn next_unlocked(&self, solved: &BTreeSet<u32>) -> u32 {
        self.levels
            .iter()
            .find(|l| !solved.contains(&l.level))
            .or_else(|| self.levels.last())
            .map(|l| l.level)
            .unwrap_or(1)
    }

    pub fn solved_count(&self, solved: &BTreeSet<u32>) -> usize {
        self.levels.iter().filter(|l| solved.contains(&l.level)).count()
    }

    pub fn all_solved(&self, solved: &BTreeSet<u32>) -> bool {
        !self.levels.is_empty() && self.solved_count(solved) == self.levels.len()
    }

    /// Replaces the catalog, reporting whether anything changed.
    pub fn replace(&mut self, levels: Vec<LevelDescriptor>) -> bool {
        if self.levels == levels {
            return false;
        }
        self.levels = levels;
        true
    }
}
