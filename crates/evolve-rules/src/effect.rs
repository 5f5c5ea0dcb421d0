//! Effects of buildings and specials.
//!
//! An [`Effect`] is a bag of optional benefits. Most effects set only one of
//! them, but any combination is allowed as long as fields that belong
//! together are set together (see [`Effect::validate`]).
//!
//! Effects are evaluated against a [`Neighborhood`]: the [`Tally`] of the
//! owner's city and of both neighbors.

use std::collections::BTreeMap;

use evolve_economy::{Cost, ProductionSlot, Yield};
use evolve_types::{BuildingKind, Direction};
use serde::{Deserialize, Serialize};

use crate::error::RulesError;

/// What a building or special provides once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Effect {
    /// Income. The money part is paid once, when the effect is applied. The
    /// resource part is produced every turn; with several resources listed
    /// only one of them is produced per payment.
    pub production: Option<Cost>,
    /// Flat score at the end of the game.
    pub score: u32,
    /// Military power.
    pub military: u32,
    /// Science symbols; only one of them counts when scoring.
    pub sciences: Vec<String>,
    /// Trade discount: the money part is the new unit price, the resources
    /// are the ones it applies to.
    pub trade: Option<Cost>,
    /// The trade discount applies to the left neighbor.
    pub left_trade: bool,
    /// The trade discount applies to the right neighbor.
    pub right_trade: bool,
    /// Building kind counted by the money-per-building fields.
    pub kind_payed: Option<BuildingKind>,
    /// Money per building of `kind_payed` owned by each neighbor.
    pub money_per_neighbor_building: u32,
    /// Money per building of `kind_payed` owned by the player.
    pub money_per_local_building: u32,
    /// Building kinds counted by the score-per-building fields.
    pub kinds_scored: Vec<BuildingKind>,
    /// Score per building of `kinds_scored` owned by each neighbor.
    pub score_per_neighbor_building: u32,
    /// Score per building of `kinds_scored` owned by the player.
    pub score_per_local_building: u32,
    /// Money per special built by the player.
    pub money_per_local_special: u32,
    /// Score per special built by the player.
    pub score_per_local_special: u32,
    /// Money per special built by each neighbor.
    pub money_per_neighbor_special: u32,
    /// Score per special built by each neighbor.
    pub score_per_neighbor_special: u32,
    /// Score per military defeat suffered by each neighbor.
    pub score_per_neighbor_defeat: u32,
    /// Grants the once-per-age ability to build an option for free.
    pub free_building: bool,
    /// Marks an extra turn at the end of each age.
    ///
    /// Carried as rule data only: turn resolution does not read it.
    pub extra_turn: bool,
    /// Marks a build from the discard pile. Data only, like `extra_turn`.
    pub use_discards: bool,
    /// Marks copying a neighbor's personality. Data only, like `extra_turn`.
    pub copy_personality: bool,
}

impl Effect {
    /// Check that related fields are set together.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::InvalidEffect`] naming `owner` when:
    /// - `trade` is set without a direction, or a direction without `trade`;
    /// - `kind_payed` is set without a money-per-building amount, or the
    ///   other way round;
    /// - `kinds_scored` is empty while a score-per-building amount is set,
    ///   or the other way round.
    pub fn validate(&self, owner: &str) -> Result<(), RulesError> {
        let invalid = |reason| RulesError::InvalidEffect {
            owner: owner.to_owned(),
            reason,
        };
        if self.trade.is_some() != (self.left_trade || self.right_trade) {
            return Err(invalid("trade must be set along left_trade and/or right_trade"));
        }
        let pays_per_building =
            self.money_per_local_building > 0 || self.money_per_neighbor_building > 0;
        if self.kind_payed.is_some() != pays_per_building {
            return Err(invalid("kind_payed must be set along money_per_*_building"));
        }
        let scores_per_building =
            self.score_per_local_building > 0 || self.score_per_neighbor_building > 0;
        if self.kinds_scored.is_empty() == scores_per_building {
            return Err(invalid("kinds_scored must be set along score_per_*_building"));
        }
        Ok(())
    }

    /// The per-turn resource production of this effect, if any.
    pub fn production_slot(&self) -> Option<ProductionSlot> {
        let yields = self
            .production
            .as_ref()?
            .resources()
            .map(|(resource, amount)| Yield::new(amount, resource))
            .collect();
        ProductionSlot::from_yields(yields).ok()
    }

    /// Resources named anywhere in this effect, for cross-reference checks.
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.production
            .iter()
            .chain(self.trade.iter())
            .flat_map(|cost| cost.resources().map(|(name, _)| name))
    }

    /// Unit trade prices this effect grants towards `direction`.
    pub fn trade_prices(&self, direction: Direction) -> impl Iterator<Item = (&str, u32)> {
        let applies = match direction {
            Direction::Left => self.left_trade,
            Direction::Right => self.right_trade,
        };
        self.trade
            .iter()
            .filter(move |_| applies)
            .flat_map(|cost| cost.resources().map(move |(name, _)| (name, cost.money())))
    }

    /// Money credited once, when the effect is applied.
    pub fn income(&self, area: Neighborhood<'_>) -> u32 {
        let mut money = self.production.as_ref().map_or(0, Cost::money);
        if let Some(kind) = self.kind_payed {
            money = money
                .saturating_add(
                    self.money_per_local_building
                        .saturating_mul(area.local.buildings(kind)),
                )
                .saturating_add(
                    self.money_per_neighbor_building
                        .saturating_mul(area.neighbor_buildings(kind)),
                );
        }
        money
            .saturating_add(
                self.money_per_local_special
                    .saturating_mul(area.local.specials),
            )
            .saturating_add(
                self.money_per_neighbor_special
                    .saturating_mul(area.neighbor_specials()),
            )
    }

    /// Score granted at the end of the game, excluding science and military.
    pub fn final_score(&self, area: Neighborhood<'_>) -> u32 {
        let per_building = self.kinds_scored.iter().fold(0_u32, |total, kind| {
            total
                .saturating_add(
                    self.score_per_local_building
                        .saturating_mul(area.local.buildings(*kind)),
                )
                .saturating_add(
                    self.score_per_neighbor_building
                        .saturating_mul(area.neighbor_buildings(*kind)),
                )
        });
        self.score
            .saturating_add(per_building)
            .saturating_add(
                self.score_per_local_special
                    .saturating_mul(area.local.specials),
            )
            .saturating_add(
                self.score_per_neighbor_special
                    .saturating_mul(area.neighbor_specials()),
            )
            .saturating_add(
                self.score_per_neighbor_defeat
                    .saturating_mul(area.neighbor_defeats()),
            )
    }
}

impl core::fmt::Display for Effect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut items = Vec::new();
        if let Some(production) = &self.production {
            if production.money() > 0 {
                items.push(format!("${}", production.money()));
            }
            if let Some(slot) = self.production_slot() {
                items.push(slot.to_string());
            }
        }
        if self.score > 0 {
            items.push(format!("{} pts", self.score));
        }
        if self.military > 0 {
            items.push(format!("{} army", self.military));
        }
        if !self.sciences.is_empty() {
            items.push(self.sciences.join("/"));
        }
        if let Some(trade) = &self.trade {
            let names: Vec<&str> = trade.resources().map(|(name, _)| name).collect();
            let left = if self.left_trade { "< " } else { "" };
            let right = if self.right_trade { " >" } else { "" };
            items.push(format!("{left}({}) {}{right}", trade.money(), names.join("/")));
        }
        if self.free_building {
            items.push("free building".to_owned());
        }
        if self.extra_turn {
            items.push("extra turn".to_owned());
        }
        if self.use_discards {
            items.push("build from discards".to_owned());
        }
        if self.copy_personality {
            items.push("copy personality".to_owned());
        }
        write!(f, "{}", items.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Evaluation context
// ---------------------------------------------------------------------------

/// Counters of one city that effects are evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    buildings: BTreeMap<BuildingKind, u32>,
    /// Specials built.
    pub specials: u32,
    /// Military defeats suffered.
    pub defeats: u32,
}

impl Tally {
    /// An empty tally.
    pub const fn new() -> Self {
        Self {
            buildings: BTreeMap::new(),
            specials: 0,
            defeats: 0,
        }
    }

    /// Count one more building of `kind`.
    pub fn add_building(&mut self, kind: BuildingKind) {
        let count = self.buildings.entry(kind).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Buildings of `kind` counted.
    pub fn buildings(&self, kind: BuildingKind) -> u32 {
        self.buildings.get(&kind).copied().unwrap_or(0)
    }
}

/// A city and its two neighbors, as seen by an effect.
#[derive(Debug, Clone, Copy)]
pub struct Neighborhood<'a> {
    /// The effect owner's city.
    pub local: &'a Tally,
    /// The left neighbor's city.
    pub left: &'a Tally,
    /// The right neighbor's city.
    pub right: &'a Tally,
}

impl Neighborhood<'_> {
    fn neighbor_buildings(&self, kind: BuildingKind) -> u32 {
        self.left
            .buildings(kind)
            .saturating_add(self.right.buildings(kind))
    }

    const fn neighbor_specials(&self) -> u32 {
        self.left.specials.saturating_add(self.right.specials)
    }

    const fn neighbor_defeats(&self) -> u32 {
        self.left.defeats.saturating_add(self.right.defeats)
    }
}
