//! Rule queries for one player seen with both neighbors.
//!
//! A [`Seat`] is a read-only snapshot: the rule book, the game constants,
//! the current age, a player and the players sitting left and right. Every
//! question the action rules ask ("can this be paid?", "what does the left
//! neighbor sell?", "how strong is this army?") is a pure function of it.

use std::collections::BTreeMap;

use evolve_economy::{Cost, Market, PaymentOption, ProductionSlot, Yield, payment_options};
use evolve_rules::{Age, CitySpecial, Effect, Neighborhood, RuleBook};
use evolve_types::{BuildOptionId, Direction};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::player::Player;

/// A player and both neighbors, with the rules they play by.
#[derive(Debug, Clone, Copy)]
pub struct Seat<'a> {
    /// Rule data.
    pub rules: &'a RuleBook,
    /// Game constants.
    pub config: &'a GameConfig,
    /// Age being played.
    pub age: &'a Age,
    /// The player.
    pub player: &'a Player,
    /// Previous seat.
    pub left: &'a Player,
    /// Next seat.
    pub right: &'a Player,
}

impl<'a> Seat<'a> {
    /// The neighbor on `direction`.
    pub const fn neighbor(&self, direction: Direction) -> &'a Player {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Whether the player still has to choose an action this turn.
    pub fn can_play(&self) -> bool {
        !self.player.has_pending() && !self.player.hand.is_empty()
    }

    // -----------------------------------------------------------------------
    // Effects
    // -----------------------------------------------------------------------

    /// Specials already built, in build order.
    pub fn built_specials(&self) -> impl Iterator<Item = &'a CitySpecial> + use<'a> {
        let built = self.player.specials_built;
        self.rules
            .specials_for(&self.player.city, &self.player.variant)
            .iter()
            .filter(move |special| special.order < built)
    }

    /// Effects of every building and every built special.
    pub fn active_effects(&self) -> Vec<&'a Effect> {
        let rules = self.rules;
        self.player
            .buildings
            .iter()
            .filter_map(|name| rules.building(name))
            .map(|building| &building.effect)
            .chain(self.built_specials().map(|special| &special.effect))
            .collect()
    }

    /// Military power: sum of every active effect's military.
    pub fn military_power(&self) -> u32 {
        self.active_effects()
            .iter()
            .fold(0_u32, |total, effect| total.saturating_add(effect.military))
    }

    /// Money `effect` credits when applied in this seat.
    pub fn income(&self, effect: &Effect) -> u32 {
        let local = self.player.tally(self.rules);
        let left = self.left.tally(self.rules);
        let right = self.right.tally(self.rules);
        effect.income(Neighborhood {
            local: &local,
            left: &left,
            right: &right,
        })
    }

    /// End-of-game score `effect` grants in this seat (science and battles
    /// excluded).
    pub fn effect_score(&self, effect: &Effect) -> u32 {
        let local = self.player.tally(self.rules);
        let left = self.left.tally(self.rules);
        let right = self.right.tally(self.rules);
        effect.final_score(Neighborhood {
            local: &local,
            left: &left,
            right: &right,
        })
    }

    // -----------------------------------------------------------------------
    // Specials and free building
    // -----------------------------------------------------------------------

    /// The next special to build, if any is left.
    pub fn next_special(&self) -> Option<&'a CitySpecial> {
        self.rules.special(
            &self.player.city,
            &self.player.variant,
            self.player.specials_built,
        )
    }

    /// Whether the next special exists and can be paid.
    pub fn can_build_special(&self) -> bool {
        self.next_special()
            .is_some_and(|special| !self.payment_options(&special.cost).is_empty())
    }

    /// Whether the free-building ability is active and unused this age.
    pub fn can_build_free(&self) -> bool {
        self.active_effects().iter().any(|effect| effect.free_building)
            && !self.player.free_build_ages.contains(&self.age.name)
    }

    // -----------------------------------------------------------------------
    // Production and trade
    // -----------------------------------------------------------------------

    /// The player's own production: the city resource plus every active
    /// effect that produces resources.
    pub fn local_production(&self) -> Vec<ProductionSlot> {
        let mut slots = vec![city_slot(self.rules, self.player)];
        slots.extend(
            self.active_effects()
                .iter()
                .filter_map(|effect| effect.production_slot()),
        );
        slots
    }

    /// What the neighbor on `direction` sells: their city resource plus the
    /// production of their resource buildings.
    pub fn tradeable_resources(&self, direction: Direction) -> Vec<ProductionSlot> {
        let neighbor = self.neighbor(direction);
        let mut slots = vec![city_slot(self.rules, neighbor)];
        slots.extend(
            neighbor
                .buildings
                .iter()
                .filter_map(|name| self.rules.building(name))
                .filter(|building| building.kind.is_tradeable())
                .filter_map(|building| building.effect.production_slot()),
        );
        slots
    }

    /// Unit prices for buying from the neighbor on `direction`.
    ///
    /// Every resource starts at the default price; trade effects lower it.
    /// The lowest price wins.
    pub fn trade_costs(&self, direction: Direction) -> BTreeMap<String, u32> {
        let mut prices: BTreeMap<String, u32> = self
            .rules
            .resources()
            .iter()
            .map(|resource| (resource.name.clone(), self.config.default_trade_cost))
            .collect();
        for effect in self.active_effects() {
            for (resource, price) in effect.trade_prices(direction) {
                prices
                    .entry(resource.to_owned())
                    .and_modify(|current| *current = (*current).min(price))
                    .or_insert(price);
            }
        }
        prices
    }

    // -----------------------------------------------------------------------
    // Payments
    // -----------------------------------------------------------------------

    /// Every non-dominated way for the player to pay `cost` right now.
    pub fn payment_options(&self, cost: &Cost) -> Vec<PaymentOption> {
        let local = self.local_production();
        let left_slots = self.tradeable_resources(Direction::Left);
        let right_slots = self.tradeable_resources(Direction::Right);
        let left_prices = self.trade_costs(Direction::Left);
        let right_prices = self.trade_costs(Direction::Right);
        payment_options(
            cost,
            self.player.money,
            &local,
            Market::new(&left_slots, &left_prices),
            Market::new(&right_slots, &right_prices),
        )
    }

    /// Every way to pay for building `option`.
    ///
    /// A building whose chain predecessor is already owned costs nothing.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownOption`] if `option` is not in the rule
    /// book.
    pub fn payment_options_for(&self, option: BuildOptionId) -> Result<Vec<PaymentOption>, GameError> {
        let building = self
            .rules
            .option_building(option)
            .ok_or(GameError::UnknownOption(option))?;
        if building.is_chained_from(self.player.buildings.iter().map(String::as_str)) {
            return Ok(vec![PaymentOption::default()]);
        }
        Ok(self.payment_options(&building.cost))
    }
}

/// One unit of the city's own resource.
fn city_slot(rules: &RuleBook, player: &Player) -> ProductionSlot {
    let resource = rules
        .city(&player.city)
        .map_or_else(|| player.city.clone(), |city| city.resource.clone());
    ProductionSlot::Single(Yield::new(1, resource))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use evolve_types::UserId;

    use super::*;

    struct Table {
        rules: RuleBook,
        config: GameConfig,
        players: Vec<Player>,
    }

    impl Table {
        fn new(cities: [&str; 3]) -> Self {
            let players = cities
                .iter()
                .zip(0_u32..)
                .map(|(city, seat)| Player::new(UserId::new(), seat, (*city).to_owned(), "day".to_owned(), 3))
                .collect();
            Self {
                rules: RuleBook::standard().unwrap(),
                config: GameConfig::default(),
                players,
            }
        }

        fn seat(&self) -> Seat<'_> {
            Seat {
                rules: &self.rules,
                config: &self.config,
                age: self.rules.first_age().unwrap(),
                player: &self.players[0],
                left: &self.players[2],
                right: &self.players[1],
            }
        }
    }

    #[test]
    fn city_resource_is_local_production() {
        let table = Table::new(["Giza", "Rhodes", "Babylon"]);
        let slots = table.seat().local_production();
        assert_eq!(slots, vec![ProductionSlot::Single(Yield::new(1, "stone"))]);
    }

    #[test]
    fn neighbors_sell_city_and_resource_buildings_only() {
        let mut table = Table::new(["Giza", "Rhodes", "Babylon"]);
        table.players[1].buildings = vec!["Lumber Yard".to_owned(), "Caravansery".to_owned()];
        let right = table.seat().tradeable_resources(Direction::Right);
        assert_eq!(right.len(), 2);
        assert!(right[0].produces("ore"));
        assert!(right[1].produces("wood"));
    }

    #[test]
    fn trading_post_lowers_one_side() {
        let mut table = Table::new(["Giza", "Rhodes", "Babylon"]);
        table.players[0].buildings = vec!["East Trading Post".to_owned()];
        let seat = table.seat();
        assert_eq!(seat.trade_costs(Direction::Right).get("ore"), Some(&1));
        assert_eq!(seat.trade_costs(Direction::Right).get("glass"), Some(&2));
        assert_eq!(seat.trade_costs(Direction::Left).get("ore"), Some(&2));
    }

    #[test]
    fn payment_buys_from_cheapest_sides() {
        let table = Table::new(["Giza", "Rhodes", "Babylon"]);
        // Barracks needs one ore: Rhodes (right) sells it for 2.
        let option = table
            .rules
            .options()
            .iter()
            .find(|o| o.building == "Barracks")
            .unwrap()
            .id;
        let options = table.seat().payment_options_for(option).unwrap();
        assert_eq!(options.len(), 1);
        assert!(options[0].matches_trades(0, 2));
    }

    #[test]
    fn chained_building_is_free() {
        let mut table = Table::new(["Giza", "Rhodes", "Babylon"]);
        table.players[0].buildings = vec!["Altar".to_owned()];
        let temple = table
            .rules
            .options()
            .iter()
            .find(|o| o.building == "Temple")
            .unwrap()
            .id;
        let options = table.seat().payment_options_for(temple).unwrap();
        assert_eq!(options, vec![PaymentOption::default()]);
    }

    #[test]
    fn specials_in_order() {
        let mut table = Table::new(["Olympia", "Rhodes", "Babylon"]);
        assert_eq!(table.seat().next_special().map(|s| s.order), Some(0));
        assert!(!table.seat().can_build_free());

        table.players[0].specials_built = 2;
        let seat = table.seat();
        assert_eq!(seat.next_special().map(|s| s.order), Some(2));
        assert!(seat.can_build_free());

        table.players[0].specials_built = 3;
        assert!(table.seat().next_special().is_none());
        assert!(!table.seat().can_build_special());
    }

    #[test]
    fn military_sums_buildings_and_specials() {
        let mut table = Table::new(["Rhodes", "Giza", "Babylon"]);
        table.players[0].buildings = vec!["Stockade".to_owned(), "Walls".to_owned()];
        table.players[0].specials_built = 2;
        assert_eq!(table.seat().military_power(), 5);
    }

    #[test]
    fn unknown_option_rejected() {
        let table = Table::new(["Giza", "Rhodes", "Babylon"]);
        let result = table.seat().payment_options_for(BuildOptionId(9999));
        assert_eq!(result, Err(GameError::UnknownOption(BuildOptionId(9999))));
    }
}
