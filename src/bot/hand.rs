//! The planner's working inventory of lifted units.

use crate::game::UnitKind;

/// Units taken off the board, tallied by strength.
///
/// Units in the hand are ready to act; the board no longer pays for them
/// until they are set down again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hand {
    counts: [u32; 4],
}

const fn slot(kind: UnitKind) -> usize {
    kind.strength() as usize - 1
}

impl Hand {
    /// Add one unit.
    pub fn add(&mut self, kind: UnitKind) {
        self.counts[slot(kind)] += 1;
    }

    /// Remove one unit of `kind`; `false` if there is none.
    pub fn take(&mut self, kind: UnitKind) -> bool {
        let count = &mut self.counts[slot(kind)];
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    /// Units of `kind` held.
    #[must_use]
    pub const fn count(&self, kind: UnitKind) -> u32 {
        self.counts[slot(kind)]
    }

    /// No units held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|c| *c == 0)
    }

    /// Salary the held units will cost once placed.
    #[must_use]
    pub fn salaries(&self) -> i32 {
        UnitKind::ALL
            .iter()
            .map(|k| k.salary() * i32::try_from(self.count(*k)).unwrap_or(i32::MAX))
            .sum()
    }

    /// The weakest held unit of at least `strength`.
    #[must_use]
    pub fn weakest_at_least(&self, strength: u8) -> Option<UnitKind> {
        UnitKind::ALL
            .into_iter()
            .find(|k| k.strength() >= strength && self.count(*k) > 0)
    }

    /// The strongest held unit.
    #[must_use]
    pub fn strongest(&self) -> Option<UnitKind> {
        UnitKind::ALL.into_iter().rev().find(|k| self.count(*k) > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally() {
        let mut hand = Hand::default();
        assert!(hand.is_empty());
        hand.add(UnitKind::Peasant);
        hand.add(UnitKind::Peasant);
        hand.add(UnitKind::Knight);
        assert_eq!(hand.count(UnitKind::Peasant), 2);
        assert_eq!(hand.salaries(), 2 + 2 + 18);
        assert_eq!(hand.weakest_at_least(2), Some(UnitKind::Knight));
        assert_eq!(hand.weakest_at_least(1), Some(UnitKind::Peasant));
        assert_eq!(hand.weakest_at_least(4), None);
        assert_eq!(hand.strongest(), Some(UnitKind::Knight));
        assert!(hand.take(UnitKind::Knight));
        assert!(!hand.take(UnitKind::Knight));
        assert_eq!(hand.strongest(), Some(UnitKind::Peasant));
    }
}
