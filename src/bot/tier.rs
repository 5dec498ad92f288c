//! Per-tier tuning of the planner.

use crate::game::Intelligence;

/// Knobs that separate the intelligence tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierParams {
    /// Chance per kingdom-turn that the kingdom attacks at all.
    pub conquer_chance: f64,
    /// Defense score at which a tile gets a castle when one is affordable.
    pub must_protect: i32,
    /// Defense score at which a tile gets at least a peasant.
    pub should_protect: i32,
    /// Minimum score for clearing a tree or gravestone before defending.
    pub tree_clear_threshold: i32,
    /// Refund castles, regroup and plan again after attacking.
    pub reconsider_defense: bool,
    /// Weigh tiles by importance. Without it every candidate scores zero
    /// and the first candidate in tile order wins.
    pub smart_scoring: bool,
}

impl TierParams {
    /// Parameters for `tier`.
    #[must_use]
    pub const fn of(tier: Intelligence) -> Self {
        match tier {
            Intelligence::Dumb => Self {
                conquer_chance: 0.5,
                must_protect: 5,
                should_protect: 3,
                tree_clear_threshold: 3,
                reconsider_defense: false,
                smart_scoring: false,
            },
            Intelligence::Easy => Self {
                conquer_chance: 0.7,
                must_protect: 5,
                should_protect: 2,
                tree_clear_threshold: 2,
                reconsider_defense: false,
                smart_scoring: true,
            },
            Intelligence::Medium => Self {
                conquer_chance: 0.9,
                must_protect: 4,
                should_protect: 2,
                tree_clear_threshold: 1,
                reconsider_defense: true,
                smart_scoring: true,
            },
            Intelligence::Hard => Self {
                conquer_chance: 1.0,
                must_protect: 3,
                should_protect: 1,
                tree_clear_threshold: 1,
                reconsider_defense: true,
                smart_scoring: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_get_bolder() {
        let tiers = [
            Intelligence::Dumb,
            Intelligence::Easy,
            Intelligence::Medium,
            Intelligence::Hard,
        ];
        let params: Vec<TierParams> = tiers.iter().map(|t| TierParams::of(*t)).collect();
        assert!(params.windows(2).all(|w| w[0].conquer_chance <= w[1].conquer_chance));
        assert!(params.iter().all(|p| p.must_protect >= p.should_protect));
        assert!(!params[0].smart_scoring);
        assert!(params[3].reconsider_defense);
    }
}
