//! End-of-game scoring.
//!
//! A player's [`Score`] is split in categories so the final table can show
//! where points came from:
//!
//! - treasury: one point per three coins;
//! - military: battle results, plus score effects of military buildings;
//! - special: score effects of built specials;
//! - civilian, economy, personality: score effects of buildings of that kind
//!   (resource buildings count as economy);
//! - science: for each science, the square of its count, plus seven per
//!   complete set. Effects offering a choice of sciences are assigned to
//!   maximize the result.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use evolve_rules::{Effect, RuleBook};
use evolve_types::{BattleOutcome, BuildingKind};
use serde::{Deserialize, Serialize};

use crate::seat::Seat;

/// Points per complete set of sciences.
const SCIENCE_SET_BONUS: u32 = 7;

/// Coins per treasury point.
const COINS_PER_POINT: u32 = 3;

/// A player's points, per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Money left over.
    pub treasury: i32,
    /// Battles and military building bonuses.
    pub military: i32,
    /// Built specials.
    pub special: i32,
    /// Civilian buildings.
    pub civilian: i32,
    /// Economic and resource buildings.
    pub economy: i32,
    /// Sciences.
    pub science: i32,
    /// Personality buildings.
    pub personality: i32,
}

impl Score {
    /// Sum of every category.
    pub const fn total(&self) -> i32 {
        self.treasury
            .saturating_add(self.military)
            .saturating_add(self.special)
            .saturating_add(self.civilian)
            .saturating_add(self.economy)
            .saturating_add(self.science)
            .saturating_add(self.personality)
    }

    /// Score of the player in `seat` at this point of the game.
    pub fn of(seat: &Seat<'_>) -> Self {
        let rules = seat.rules;
        let player = seat.player;
        let mut score = Self {
            treasury: points(player.money.checked_div(COINS_PER_POINT).unwrap_or(0)),
            ..Self::default()
        };

        for battle in &player.battles {
            if let Some(age) = rules.age(&battle.age) {
                let earned = match battle.result {
                    BattleOutcome::Victory => age.victory_score,
                    BattleOutcome::Defeat => age.defeat_score,
                };
                score.military = score.military.saturating_add(earned);
            }
        }

        for building in player.buildings.iter().filter_map(|name| rules.building(name)) {
            let earned = points(seat.effect_score(&building.effect));
            let category = match building.kind {
                BuildingKind::Military => &mut score.military,
                BuildingKind::Civilian => &mut score.civilian,
                BuildingKind::BasicResource
                | BuildingKind::ComplexResource
                | BuildingKind::Economic => &mut score.economy,
                BuildingKind::Scientific => &mut score.science,
                BuildingKind::Personality => &mut score.personality,
            };
            *category = category.saturating_add(earned);
        }

        for special in seat.built_specials() {
            score.special = score
                .special
                .saturating_add(points(seat.effect_score(&special.effect)));
        }

        score.science = score
            .science
            .saturating_add(points(science_score(rules, &seat.active_effects())));
        score
    }
}

impl Add for Score {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            treasury: self.treasury.saturating_add(other.treasury),
            military: self.military.saturating_add(other.military),
            special: self.special.saturating_add(other.special),
            civilian: self.civilian.saturating_add(other.civilian),
            economy: self.economy.saturating_add(other.economy),
            science: self.science.saturating_add(other.science),
            personality: self.personality.saturating_add(other.personality),
        }
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

fn points(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

// ---------------------------------------------------------------------------
// Science
// ---------------------------------------------------------------------------

/// Best science score reachable with `effects`.
///
/// Effects with one science always count it. Effects with several count
/// exactly one of them; every combination is tried.
pub fn science_score(rules: &RuleBook, effects: &[&Effect]) -> u32 {
    let mut counts: BTreeMap<&str, u32> = rules
        .sciences()
        .iter()
        .map(|science| (science.as_str(), 0))
        .collect();
    let mut choices: Vec<&[String]> = Vec::new();
    for effect in effects {
        match effect.sciences.as_slice() {
            [] => {}
            [single] => bump(&mut counts, single, true),
            several => choices.push(several),
        }
    }
    best_assignment(&mut counts, &choices)
}

fn best_assignment(counts: &mut BTreeMap<&str, u32>, choices: &[&[String]]) -> u32 {
    let Some((first, rest)) = choices.split_first() else {
        return evaluate(counts);
    };
    let mut best = 0;
    for science in *first {
        bump(counts, science, true);
        best = best.max(best_assignment(counts, rest));
        bump(counts, science, false);
    }
    best
}

fn bump(counts: &mut BTreeMap<&str, u32>, science: &str, up: bool) {
    if let Some(count) = counts.get_mut(science) {
        *count = if up {
            count.saturating_add(1)
        } else {
            count.saturating_sub(1)
        };
    }
}

fn evaluate(counts: &BTreeMap<&str, u32>) -> u32 {
    let squares = counts
        .values()
        .fold(0_u32, |total, count| total.saturating_add(count.saturating_mul(*count)));
    let sets = counts.values().copied().min().unwrap_or(0);
    squares.saturating_add(sets.saturating_mul(SCIENCE_SET_BONUS))
}
