//! Per-kingdom turn planning.
//!
//! The planner lifts every ready unit into its [`Hand`], then works through
//! fixed phases: clear trees, defend, attack, optionally regroup and go
//! again, and finally put every unit back on the board. Every board change
//! goes through a validated engine move, so the state is consistent after
//! each step and a cancelled turn leaves nothing half-done.

use crate::bot::scoring::{
    best, blocking_score, blocking_tiles, border_tiles, conquest_candidates, conquest_score,
    defense_score, empty_tiles, ranked, required_strength,
};
use crate::bot::{BotAction, Hand, TierParams};
use crate::game::{
    apply_move, is_legal, kingdom_income, kingdom_salaries, Content, GameState, KingdomId, Move,
    Rng, Unit, UnitKind,
};
use crate::hex::Hex;

pub(super) struct Planner<'a> {
    state: &'a mut GameState,
    params: TierParams,
    kingdom: KingdomId,
    hand: Hand,
    castles: Vec<Hex>,
    log: &'a mut Vec<BotAction>,
}

impl<'a> Planner<'a> {
    pub(super) fn new(
        state: &'a mut GameState,
        params: TierParams,
        kingdom: KingdomId,
        log: &'a mut Vec<BotAction>,
    ) -> Self {
        Self {
            state,
            params,
            kingdom,
            hand: Hand::default(),
            castles: Vec::new(),
            log,
        }
    }

    pub(super) fn run(mut self) {
        self.pick_up_all();
        self.clear_blocking(self.params.tree_clear_threshold, true);
        self.defend();

        // A private roll keeps the game RNG untouched, so recorded actions
        // replay exactly.
        let mut roll = Rng::new(self.state.state_hash() ^ u64::from(self.kingdom.0));
        let attacking = roll.chance(self.params.conquer_chance);
        if attacking {
            self.conquer();
            if self.params.reconsider_defense {
                self.refund_castles();
                self.pick_up_all();
                self.defend();
                self.conquer();
            }
        }

        self.clear_blocking(0, false);
        self.place_remaining();
        tracing::debug!(
            kingdom = %self.kingdom,
            attacking,
            savings = self.savings(),
            "bot.kingdom_done"
        );
    }

    fn engine(&mut self, mv: Move) {
        debug_assert!(is_legal(self.state, &mv), "bot attempted illegal move: {mv}");
        apply_move(self.state, mv);
        self.log.push(BotAction::Engine(mv));
    }

    /// Move the unit in the engine's hand into the tally.
    fn stash(&mut self) {
        let Some(Content::Unit(unit)) = self.state.held.take() else {
            panic!("stashing without a unit in hand");
        };
        self.hand.add(unit.kind);
        self.log.push(BotAction::Stash(unit.kind));
    }

    /// Move a tallied unit into the engine's hand.
    fn draw(&mut self, kind: UnitKind) {
        let taken = self.hand.take(kind);
        assert!(taken, "drawing {kind:?} that is not in the hand");
        debug_assert!(self.state.held.is_none());
        self.state.held = Some(Content::Unit(Unit::ready(kind)));
        self.log.push(BotAction::Draw(kind));
    }

    fn savings(&self) -> i32 {
        self.state.kingdom(self.kingdom).map_or(0, |k| k.savings)
    }

    /// Whether the kingdom can carry a new unit of `kind` that replaces
    /// units with `consumed` total salary.
    fn sustainable(&self, kind: UnitKind, consumed: i32) -> bool {
        let income = kingdom_income(self.state, self.kingdom);
        let board = kingdom_salaries(self.state, self.kingdom);
        let held = self.hand.salaries() - consumed;
        income - board - held - kind.salary() >= 0 || self.savings() > 3 * kind.salary()
    }

    fn pick_up_all(&mut self) {
        let ready: Vec<Hex> = self.state.kingdom(self.kingdom).map_or_else(Vec::new, |k| {
            k.tiles
                .iter()
                .copied()
                .filter(|h| {
                    self.state
                        .content_at(*h)
                        .and_then(Content::unit)
                        .is_some_and(|u| u.can_act)
                })
                .collect()
        });
        for coord in ready {
            self.engine(Move::PickUp(coord));
            self.stash();
        }
    }

    fn clear_blocking(&mut self, threshold: i32, may_buy: bool) {
        loop {
            let (kingdom, smart) = (self.kingdom, self.params.smart_scoring);
            let state: &GameState = self.state;
            let candidates = blocking_tiles(state, kingdom);
            let Some((coord, score)) =
                best(&candidates, |h| blocking_score(state, kingdom, h, smart))
            else {
                break;
            };
            if score < threshold {
                break;
            }
            if self.hand.is_empty() && !(may_buy && self.acquire(1)) {
                break;
            }
            let Some(kind) = self.hand.weakest_at_least(1) else {
                break;
            };
            self.draw(kind);
            self.engine(Move::PlaceOwn(coord));
        }
    }

    fn defend(&mut self) {
        loop {
            let (kingdom, smart) = (self.kingdom, self.params.smart_scoring);
            let state: &GameState = self.state;
            let candidates = border_tiles(state, kingdom);
            let Some((coord, score)) =
                best(&candidates, |h| defense_score(state, kingdom, h, smart))
            else {
                break;
            };

            if score >= self.params.must_protect && self.savings() >= self.state.rules.castle_cost
            {
                self.engine(Move::BuyCastle);
                self.engine(Move::PlaceOwn(coord));
                self.castles.push(coord);
                continue;
            }
            if score >= self.params.should_protect.min(self.params.must_protect)
                && self.place_unit(coord)
            {
                continue;
            }
            break;
        }
    }

    /// Put the weakest held unit on `coord`, buying a peasant if the hand is
    /// empty.
    fn place_unit(&mut self, coord: Hex) -> bool {
        if self.hand.is_empty() && !self.acquire(1) {
            return false;
        }
        let Some(kind) = self.hand.weakest_at_least(1) else {
            return false;
        };
        self.draw(kind);
        self.engine(Move::PlaceOwn(coord));
        true
    }

    fn conquer(&mut self) {
        loop {
            let (kingdom, smart) = (self.kingdom, self.params.smart_scoring);
            let state: &GameState = self.state;
            let candidates = conquest_candidates(state, kingdom);
            let targets: Vec<(Hex, u8)> =
                ranked(&candidates, |h| conquest_score(state, kingdom, h, smart))
                    .into_iter()
                    .filter_map(|(h, _)| required_strength(state, h).map(|s| (h, s)))
                    .collect();
            if targets.is_empty() {
                break;
            }

            let reachable = targets
                .iter()
                .find_map(|(h, s)| self.hand.weakest_at_least(*s).map(|k| (*h, k)));
            if let Some((coord, kind)) = reachable {
                self.draw(kind);
                self.engine(Move::Conquer(coord));
                continue;
            }

            if !targets.iter().any(|(_, s)| self.acquire(*s)) {
                break;
            }
        }
    }

    /// Get a unit of exactly `strength` into the hand: merge two held
    /// units, merge a held unit with a bought peasant, or buy peasants.
    fn acquire(&mut self, strength: u8) -> bool {
        let Some(kind) = UnitKind::from_strength(strength) else {
            return false;
        };
        let peasant_cost = self.state.rules.peasant_cost;
        let peasant = UnitKind::Peasant;

        if let Some(lower) = UnitKind::from_strength(strength - 1) {
            let pair_held = if lower == peasant {
                self.hand.count(peasant) >= 2
            } else {
                self.hand.count(peasant) >= 1 && self.hand.count(lower) >= 1
            };
            if pair_held
                && self.sustainable(kind, peasant.salary() + lower.salary())
                && self.fuse(lower, false)
            {
                return true;
            }
            if self.hand.count(lower) >= 1
                && self.savings() >= peasant_cost
                && self.sustainable(kind, lower.salary())
                && self.fuse(lower, true)
            {
                return true;
            }
        }

        self.savings() >= i32::from(strength) * peasant_cost
            && self.sustainable(kind, 0)
            && self.buy_unit(strength)
    }

    /// An empty tile to assemble units on.
    fn workbench(&self) -> Option<Hex> {
        empty_tiles(self.state, self.kingdom).first().copied()
    }

    fn fuse(&mut self, base: UnitKind, buy_partner: bool) -> bool {
        let Some(bench) = self.workbench() else {
            return false;
        };
        self.draw(base);
        self.engine(Move::PlaceOwn(bench));
        if buy_partner {
            self.engine(Move::BuyPeasant);
        } else {
            self.draw(UnitKind::Peasant);
        }
        self.engine(Move::Combine(bench));
        self.engine(Move::PickUp(bench));
        self.stash();
        true
    }

    fn buy_unit(&mut self, strength: u8) -> bool {
        if strength == 1 {
            self.engine(Move::BuyPeasant);
            self.stash();
            return true;
        }
        let Some(bench) = self.workbench() else {
            return false;
        };
        self.engine(Move::BuyPeasant);
        self.engine(Move::PlaceOwn(bench));
        for _ in 1..strength {
            self.engine(Move::BuyPeasant);
            self.engine(Move::Combine(bench));
        }
        self.engine(Move::PickUp(bench));
        self.stash();
        true
    }

    fn refund_castles(&mut self) {
        for coord in std::mem::take(&mut self.castles) {
            let ours = self
                .state
                .map
                .get(coord)
                .is_some_and(|t| t.kingdom == Some(self.kingdom));
            if ours && self.state.content_at(coord) == Some(Content::Castle) {
                self.state.refund_castle(coord);
                self.log.push(BotAction::Refund(coord));
            }
        }
    }

    /// Set every remaining hand unit down, strongest first on the most
    /// exposed tiles.
    fn place_remaining(&mut self) {
        while let Some(kind) = self.hand.strongest() {
            let (kingdom, smart) = (self.kingdom, self.params.smart_scoring);
            let state: &GameState = self.state;
            let empties = empty_tiles(state, kingdom);
            let spot = best(&empties, |h| defense_score(state, kingdom, h, smart))
                .map(|(h, _)| h)
                .or_else(|| blocking_tiles(state, kingdom).first().copied());

            if let Some(coord) = spot {
                self.draw(kind);
                self.engine(Move::PlaceOwn(coord));
                continue;
            }
            if let Some(coord) = self.merge_target(kind) {
                self.draw(kind);
                self.engine(Move::Combine(coord));
                continue;
            }

            tracing::warn!(kingdom = %self.kingdom, unit = ?kind, "bot.unit_undumpable");
            self.hand.take(kind);
            self.log.push(BotAction::Discard(kind));
        }
    }

    /// A unit of the kingdom that `kind` can merge into.
    fn merge_target(&self, kind: UnitKind) -> Option<Hex> {
        let k = self.state.kingdom(self.kingdom)?;
        k.tiles.iter().copied().find(|h| {
            self.state
                .content_at(*h)
                .and_then(Content::unit)
                .is_some_and(|u| {
                    (kind == UnitKind::Peasant || u.kind == UnitKind::Peasant)
                        && kind.strength() + u.kind.strength() <= 4
                })
        })
    }
}
