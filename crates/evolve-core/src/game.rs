//! The game state machine: seating, dealing, turns and ages.
//!
//! A [`Game`] moves one way through `Joining -> Started -> Finished`.
//!
//! While started, every turn follows the same cycle:
//!
//! 1. **Choose** -- each player records an action with [`Game::play`]. Nothing
//!    is applied yet; the request is only checked against the current state.
//! 2. **Resolve** -- once nobody is missing, the turn resolves:
//!    - the payment of every paid action is fixed against the state at the
//!      start of the turn;
//!    - every new building and special is added (pre-apply) before any
//!      action is applied, so income effects see what neighbors built the
//!      same turn;
//!    - actions are applied in seat order: money changes hands, options
//!      leave hands, income is credited;
//!    - hands pass in the direction of the age.
//! 3. **Age end** -- after the last turn of an age the remaining options are
//!    discarded, every player fights both neighbors, and the next age is
//!    dealt. After the last age the game is finished.
//!
//! Every mutating operation runs on a staged copy of the game that replaces
//! the original only on success: a failed call leaves the game untouched.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use evolve_economy::PaymentOption;
use evolve_rules::{Age, RuleBook};
use evolve_types::{
    ActionKind, BattleOutcome, BuildOptionId, BuildingKind, Direction, GameId, GameStatus,
    PlayerId, UserId,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::{IndexedRandom, SliceRandom};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::player::{BattleRecord, PendingAction, PlayRequest, Player};
use crate::score::Score;
use crate::seat::Seat;

/// Result of dealing the hands of an age.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleReport {
    /// Options dealt into hands.
    pub dealt: usize,
    /// Eligible options left out of the hands.
    pub undealt: Vec<BuildOptionId>,
}

/// Final standing of one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalScore {
    /// Seat identifier.
    pub player: PlayerId,
    /// The user behind the seat.
    pub user: UserId,
    /// City played.
    pub city: String,
    /// Points per category.
    pub score: Score,
}

/// One match.
#[derive(Debug, Clone)]
pub struct Game {
    id: GameId,
    created_at: DateTime<Utc>,
    rules: Arc<RuleBook>,
    config: GameConfig,
    rng: SmallRng,
    status: GameStatus,
    age: String,
    turn: u32,
    /// Sorted by seat.
    players: Vec<Player>,
    discards: Vec<BuildOptionId>,
    undealt: Vec<BuildOptionId>,
}

impl Game {
    /// A new game waiting for players, at the first age of `rules`.
    ///
    /// The random generator is seeded from `config.seed` when set.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Invariant`] if the rule book has no ages.
    pub fn new(rules: Arc<RuleBook>, config: GameConfig) -> Result<Self, GameError> {
        let age = rules
            .first_age()
            .ok_or_else(|| GameError::invariant("rule book has no ages"))?
            .name
            .clone();
        let rng = config
            .seed
            .map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);
        let game = Self {
            id: GameId::new(),
            created_at: Utc::now(),
            rules,
            config,
            rng,
            status: GameStatus::Joining,
            age,
            turn: 0,
            players: Vec::new(),
            discards: Vec::new(),
            undealt: Vec::new(),
        };
        info!(game_id = %game.id, seed = ?game.config.seed, "Game created");
        Ok(game)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Game identifier.
    pub const fn id(&self) -> GameId {
        self.id
    }

    /// Creation time.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Lifecycle state.
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Rule book in use.
    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Game constants in use.
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Name of the current age.
    pub fn age_name(&self) -> &str {
        &self.age
    }

    /// The current age.
    pub fn current_age(&self) -> Result<&Age, GameError> {
        self.rules
            .age(&self.age)
            .ok_or_else(|| GameError::invariant(format!("unknown current age {}", self.age)))
    }

    /// Turn within the age, from 1 once started.
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Players in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Options discarded so far (sold, or left in hand at the end of an age).
    pub fn discards(&self) -> &[BuildOptionId] {
        &self.discards
    }

    /// Eligible options of the current age that were not dealt.
    pub fn undealt(&self) -> &[BuildOptionId] {
        &self.undealt
    }

    /// The seat of `user`, if playing.
    pub fn get_player(&self, user: UserId) -> Option<&Player> {
        self.players.iter().find(|player| player.user == user)
    }

    /// Players who still have to choose an action this turn.
    pub fn missing_players(&self) -> Vec<&Player> {
        if self.status != GameStatus::Started {
            return Vec::new();
        }
        self.players
            .iter()
            .filter(|player| !player.has_pending())
            .collect()
    }

    /// Rule queries for the player at `index` (seat order).
    pub fn seat(&self, index: usize) -> Result<Seat<'_>, GameError> {
        let count = self.players.len();
        let at = |position: Option<usize>| {
            position
                .and_then(|i| self.players.get(i))
                .ok_or_else(|| GameError::invariant(format!("no seat {index} among {count}")))
        };
        Ok(Seat {
            rules: &self.rules,
            config: &self.config,
            age: self.current_age()?,
            player: at(Some(index))?,
            left: at(neighbor_index(index, count, Direction::Left))?,
            right: at(neighbor_index(index, count, Direction::Right))?,
        })
    }

    /// Rule queries for `user`.
    pub fn seat_of(&self, user: UserId) -> Result<Seat<'_>, GameError> {
        self.seat(self.index_of(user)?)
    }

    // -----------------------------------------------------------------------
    // Joining and starting
    // -----------------------------------------------------------------------

    /// Whether `user` may join now.
    pub fn is_joinable(&self, user: UserId) -> bool {
        self.check_join(user).is_ok()
    }

    /// Seat `user` in a random free city with a random variant.
    ///
    /// # Errors
    ///
    /// Fails when the game is past joining, the user is already seated, the
    /// seats are full or no city is left.
    pub fn join(&mut self, user: UserId) -> Result<PlayerId, GameError> {
        self.check_join(user)?;
        let free: Vec<&str> = self
            .rules
            .cities()
            .iter()
            .filter(|city| !self.players.iter().any(|p| p.city == city.name))
            .map(|city| city.name.as_str())
            .collect();
        let city = free
            .choose(&mut self.rng)
            .map(|name| (*name).to_owned())
            .ok_or(GameError::NoCityAvailable)?;
        let variant = self
            .rules
            .variants()
            .choose(&mut self.rng)
            .cloned()
            .ok_or(GameError::NoCityAvailable)?;
        let Ok(seat) = u32::try_from(self.players.len()) else {
            return Err(GameError::invariant("seat number overflow"));
        };

        let player = Player::new(user, seat, city, variant, self.config.initial_money);
        let id = player.id;
        info!(
            game_id = %self.id,
            user = %user,
            seat,
            city = %player.city,
            variant = %player.variant,
            "Player joined"
        );
        self.players.push(player);
        Ok(id)
    }

    /// Whether the game can be started now.
    pub fn is_startable(&self) -> bool {
        self.status == GameStatus::Joining && self.seated() >= self.config.min_players
    }

    /// Start the game and deal the first age.
    ///
    /// # Errors
    ///
    /// Fails when the game already started or too few players joined, and
    /// with [`GameError::NotEnoughOptions`] when the first age cannot be
    /// dealt.
    pub fn start(&mut self) -> Result<ShuffleReport, GameError> {
        self.ensure_status(GameStatus::Joining)?;
        let seated = self.seated();
        if seated < self.config.min_players {
            return Err(GameError::NotEnoughPlayers {
                seated,
                needed: self.config.min_players,
            });
        }
        let mut stage = self.clone();
        stage.status = GameStatus::Started;
        stage.turn = 1;
        let report = stage.shuffle()?;
        *self = stage;
        info!(game_id = %self.id, players = seated, age = %self.age, "Game started");
        Ok(report)
    }

    /// Deal the hands of the current age.
    ///
    /// Personality options are dealt apart: as many as needed to fill the
    /// hands, and at least two more than the number of players, when
    /// available. Options left out are reported as undealt.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Invariant`] if a hand is not empty, and
    /// [`GameError::NotEnoughOptions`] if the hands cannot be filled.
    pub fn shuffle(&mut self) -> Result<ShuffleReport, GameError> {
        if self.players.iter().any(|player| !player.hand.is_empty()) {
            return Err(GameError::invariant("dealing into non-empty hands"));
        }
        let players = self.players.len();
        let hand_size = usize::try_from(self.config.initial_options).unwrap_or(usize::MAX);
        let needed = players
            .checked_mul(hand_size)
            .ok_or_else(|| GameError::invariant("hand total overflow"))?;

        let rules = Arc::clone(&self.rules);
        let (mut personalities, mut pool): (Vec<BuildOptionId>, Vec<BuildOptionId>) = rules
            .options_for(&self.age, self.seated())
            .map(|option| option.id)
            .partition(|id| {
                rules
                    .option_building(*id)
                    .is_some_and(|building| building.kind == BuildingKind::Personality)
            });

        let shortfall = needed.saturating_sub(pool.len());
        let wanted = personalities
            .len()
            .min(shortfall.max(players.saturating_add(2)));
        personalities.shuffle(&mut self.rng);
        let left_out = personalities.split_off(wanted);
        pool.extend(personalities);

        if pool.len() < needed {
            let error = GameError::NotEnoughOptions {
                age: self.age.clone(),
                available: pool.len(),
                needed,
            };
            tracing::error!(game_id = %self.id, %error, "Cannot deal hands");
            return Err(error);
        }

        pool.shuffle(&mut self.rng);
        for player in &mut self.players {
            let rest = pool.split_off(hand_size.min(pool.len()));
            player.hand = std::mem::replace(&mut pool, rest);
        }
        pool.extend(left_out);
        self.undealt.clone_from(&pool);

        info!(
            game_id = %self.id,
            age = %self.age,
            dealt = needed,
            undealt = pool.len(),
            "Hands dealt"
        );
        Ok(ShuffleReport {
            dealt: needed,
            undealt: pool,
        })
    }

    // -----------------------------------------------------------------------
    // Playing
    // -----------------------------------------------------------------------

    /// Record the action of `user` for this turn, resolving the turn if it
    /// was the last one missing.
    ///
    /// Returns whether the turn resolved.
    ///
    /// # Errors
    ///
    /// Returns a precondition error (no state change) when the action is not
    /// allowed, or an invariant error if resolving the turn fails.
    pub fn play(&mut self, user: UserId, request: PlayRequest) -> Result<bool, GameError> {
        self.ensure_status(GameStatus::Started)?;
        let index = self.index_of(user)?;
        self.check_play(index, &request)?;

        let mut stage = self.clone();
        stage.player_mut(index)?.pending = Some(request);
        let resolved = stage.resolve_if_ready()?;
        *self = stage;
        debug!(
            game_id = %self.id,
            user = %user,
            action = ?request.action,
            option = %request.option,
            trade_left = request.trade_left,
            trade_right = request.trade_right,
            resolved,
            "Action recorded"
        );
        Ok(resolved)
    }

    /// Resolve the turn if every player has chosen.
    ///
    /// Returns whether the turn resolved.
    ///
    /// # Errors
    ///
    /// Returns an invariant error if resolution fails; the game is then
    /// left as it was.
    pub fn turn_check(&mut self) -> Result<bool, GameError> {
        if !self.turn_ready() {
            return Ok(false);
        }
        let mut stage = self.clone();
        stage.resolve_if_ready()?;
        *self = stage;
        Ok(true)
    }

    /// Every request `user` could submit right now.
    ///
    /// Paid actions are listed once per distinct way to split the trade
    /// money between the neighbors. Empty when the user already chose.
    pub fn legal_requests(&self, user: UserId) -> Result<Vec<PlayRequest>, GameError> {
        self.ensure_status(GameStatus::Started)?;
        let index = self.index_of(user)?;
        let seat = self.seat(index)?;
        if !seat.can_play() {
            return Ok(Vec::new());
        }
        let trades = |options: Vec<PaymentOption>| {
            let mut splits: Vec<(u32, u32)> = options
                .iter()
                .map(|option| (option.left_cost(), option.right_cost()))
                .collect();
            splits.sort_unstable();
            splits.dedup();
            splits
        };
        let special_trades = seat
            .next_special()
            .map(|special| trades(seat.payment_options(&special.cost)))
            .unwrap_or_default();

        let mut candidates = Vec::new();
        for option in &seat.player.hand {
            let request = |action, (trade_left, trade_right)| PlayRequest {
                action,
                option: *option,
                trade_left,
                trade_right,
            };
            candidates.push(PlayRequest::sell(*option));
            candidates.push(request(ActionKind::BuildFree, (0, 0)));
            if let Ok(options) = seat.payment_options_for(*option) {
                candidates.extend(
                    trades(options)
                        .into_iter()
                        .map(|split| request(ActionKind::Build, split)),
                );
            }
            candidates.extend(
                special_trades
                    .iter()
                    .map(|split| request(ActionKind::BuildSpecial, *split)),
            );
        }
        Ok(candidates
            .into_iter()
            .filter(|candidate| self.check_play(index, candidate).is_ok())
            .collect())
    }

    /// Put `option` on the discard pile.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownOption`] if the option is not in the rule
    /// book, [`GameError::OptionInHand`] if a player still holds it and
    /// [`GameError::AlreadyDiscarded`] if it is on the pile already.
    pub fn discard(&mut self, option: BuildOptionId) -> Result<(), GameError> {
        if self.rules.option(option).is_none() {
            return Err(GameError::UnknownOption(option));
        }
        if self.players.iter().any(|player| player.holds(option)) {
            return Err(GameError::OptionInHand(option));
        }
        if self.discards.contains(&option) {
            return Err(GameError::AlreadyDiscarded(option));
        }
        self.discards.push(option);
        Ok(())
    }

    /// Scores of every player, in seat order.
    pub fn final_scores(&self) -> Result<Vec<FinalScore>, GameError> {
        (0..self.players.len())
            .map(|index| {
                let seat = self.seat(index)?;
                Ok(FinalScore {
                    player: seat.player.id,
                    user: seat.player.user,
                    city: seat.player.city.clone(),
                    score: Score::of(&seat),
                })
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Preconditions
    // -----------------------------------------------------------------------

    fn check_join(&self, user: UserId) -> Result<(), GameError> {
        self.ensure_status(GameStatus::Joining)?;
        if self.get_player(user).is_some() {
            return Err(GameError::AlreadySeated(user));
        }
        if self.seated() >= self.config.max_players {
            return Err(GameError::GameFull {
                max: self.config.max_players,
            });
        }
        let city_left = self
            .rules
            .cities()
            .iter()
            .any(|city| !self.players.iter().any(|p| p.city == city.name));
        if !city_left || self.rules.variants().is_empty() {
            return Err(GameError::NoCityAvailable);
        }
        Ok(())
    }

    fn check_play(&self, index: usize, request: &PlayRequest) -> Result<(), GameError> {
        let seat = self.seat(index)?;
        let player = seat.player;
        if player.has_pending() {
            return Err(GameError::ActionPending(player.user));
        }
        if !player.holds(request.option) {
            return Err(GameError::OptionNotHeld(request.option));
        }
        let building = self
            .rules
            .option_building(request.option)
            .ok_or(GameError::UnknownOption(request.option))?;
        let no_match = || GameError::NoMatchingPayment {
            left: request.trade_left,
            right: request.trade_right,
        };

        match request.action {
            ActionKind::Build => {
                if player.owns(&building.name) {
                    return Err(GameError::AlreadyBuilt {
                        building: building.name.clone(),
                    });
                }
                let options = seat.payment_options_for(request.option)?;
                if !has_match(&options, request) {
                    return Err(no_match());
                }
            }
            ActionKind::BuildFree => {
                if player.owns(&building.name) {
                    return Err(GameError::AlreadyBuilt {
                        building: building.name.clone(),
                    });
                }
                if !seat.can_build_free() {
                    return Err(GameError::FreeBuildUnavailable);
                }
            }
            ActionKind::Sell => {}
            ActionKind::BuildSpecial => {
                let special = seat.next_special().ok_or(GameError::NoSpecialLeft)?;
                if !has_match(&seat.payment_options(&special.cost), request) {
                    return Err(no_match());
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Resolution (always on a staged copy)
    // -----------------------------------------------------------------------

    fn turn_ready(&self) -> bool {
        self.status == GameStatus::Started && self.players.iter().all(Player::has_pending)
    }

    fn resolve_if_ready(&mut self) -> Result<bool, GameError> {
        if !self.turn_ready() {
            return Ok(false);
        }
        self.end_of_turn()?;
        Ok(true)
    }

    fn end_of_turn(&mut self) -> Result<(), GameError> {
        let age = self.current_age()?.clone();
        let count = self.players.len();

        let payments = (0..count)
            .map(|index| self.committed_payment(index))
            .collect::<Result<Vec<_>, _>>()?;

        for index in 0..count {
            self.pre_apply_action(index)?;
        }
        for (index, payment) in payments.iter().enumerate() {
            self.apply_action(index, payment.as_ref())?;
        }

        self.rotate_hands(age.direction)?;
        self.turn = self.turn.saturating_add(1);
        info!(game_id = %self.id, age = %age.name, turn = self.turn, "Turn resolved");

        let hands_empty = self.players.iter().all(|player| player.hand.is_empty());
        if self.turn > age.turn_limit(self.config.turns_per_age) || hands_empty {
            self.end_of_age()?;
        }
        for player in &mut self.players {
            player.reset_action();
        }
        Ok(())
    }

    /// The payment a pending paid action will use, fixed before any change.
    fn committed_payment(&self, index: usize) -> Result<Option<PaymentOption>, GameError> {
        let seat = self.seat(index)?;
        let pending = pending_of(seat.player)?;
        let options = match pending.action {
            ActionKind::Build => seat.payment_options_for(pending.option)?,
            ActionKind::BuildSpecial => {
                let special = seat
                    .next_special()
                    .ok_or_else(|| GameError::invariant("special chosen but none left"))?;
                seat.payment_options(&special.cost)
            }
            ActionKind::BuildFree | ActionKind::Sell => return Ok(None),
        };
        options
            .into_iter()
            .find(|option| option.matches_trades(pending.trade_left, pending.trade_right))
            .map(Some)
            .ok_or_else(|| {
                GameError::invariant(format!(
                    "committed action of seat {index} can no longer be paid"
                ))
            })
    }

    fn pre_apply_action(&mut self, index: usize) -> Result<(), GameError> {
        let pending = pending_of(self.player(index)?)?;
        if pending.action == ActionKind::BuildSpecial {
            let order = self
                .seat(index)?
                .next_special()
                .ok_or_else(|| GameError::invariant("special chosen but none left"))?
                .order;
            self.player_mut(index)?.specials_built = order.saturating_add(1);
            return Ok(());
        }
        if !pending.action.adds_building() {
            return Ok(());
        }
        let name = self
            .rules
            .option_building(pending.option)
            .ok_or_else(|| GameError::invariant(format!("option {} has no building", pending.option)))?
            .name
            .clone();
        let player = self.player_mut(index)?;
        if player.owns(&name) {
            return Err(GameError::invariant(format!("{name} built twice")));
        }
        player.buildings.push(name);
        Ok(())
    }

    fn apply_action(
        &mut self,
        index: usize,
        payment: Option<&PaymentOption>,
    ) -> Result<(), GameError> {
        let rules = Arc::clone(&self.rules);
        let pending = pending_of(self.player(index)?)?;
        if !self.player_mut(index)?.take_from_hand(pending.option) {
            return Err(GameError::invariant(format!(
                "option {} left the hand before being applied",
                pending.option
            )));
        }
        let missing_payment = || GameError::invariant("paid action without committed payment");

        match pending.action {
            ActionKind::Sell => {
                self.discard(pending.option)?;
                self.credit(index, self.config.sell_value)?;
            }
            ActionKind::Build => {
                self.pay(index, payment.ok_or_else(missing_payment)?)?;
                let building = rules
                    .option_building(pending.option)
                    .ok_or(GameError::UnknownOption(pending.option))?;
                let income = self.seat(index)?.income(&building.effect);
                self.credit(index, income)?;
            }
            ActionKind::BuildFree => {
                let building = rules
                    .option_building(pending.option)
                    .ok_or(GameError::UnknownOption(pending.option))?;
                let income = self.seat(index)?.income(&building.effect);
                self.credit(index, income)?;
                let age = self.age.clone();
                self.player_mut(index)?.free_build_ages.insert(age);
            }
            ActionKind::BuildSpecial => {
                self.pay(index, payment.ok_or_else(missing_payment)?)?;
                let seat = self.seat(index)?;
                let special = seat
                    .built_specials()
                    .last()
                    .ok_or_else(|| GameError::invariant("special applied before being built"))?;
                let income = seat.income(&special.effect);
                self.credit(index, income)?;
            }
        }
        Ok(())
    }

    /// Deduct a payment from the buyer and hand trade money to the neighbors.
    fn pay(&mut self, index: usize, payment: &PaymentOption) -> Result<(), GameError> {
        let count = self.players.len();
        let buyer = self.player_mut(index)?;
        buyer.money = buyer
            .money
            .checked_sub(payment.total_cost())
            .ok_or_else(|| GameError::invariant("payment exceeds money"))?;
        for direction in Direction::ALL {
            let amount = payment.trade_cost_towards(direction);
            if amount > 0 {
                let seller = neighbor_index(index, count, direction)
                    .ok_or_else(|| GameError::invariant("seller seat missing"))?;
                self.credit(seller, amount)?;
            }
        }
        Ok(())
    }

    fn credit(&mut self, index: usize, amount: u32) -> Result<(), GameError> {
        let player = self.player_mut(index)?;
        player.money = player.money.saturating_add(amount);
        Ok(())
    }

    /// Pass every hand to the neighbor on `direction`.
    fn rotate_hands(&mut self, direction: Direction) -> Result<(), GameError> {
        let count = self.players.len();
        let mut hands: Vec<Vec<BuildOptionId>> = self
            .players
            .iter_mut()
            .map(|player| std::mem::take(&mut player.hand))
            .collect();
        for index in 0..count {
            let giver = neighbor_index(index, count, direction.opposite())
                .ok_or_else(|| GameError::invariant("giver seat missing"))?;
            let hand = hands
                .get_mut(giver)
                .map(std::mem::take)
                .ok_or_else(|| GameError::invariant("hand missing during rotation"))?;
            self.player_mut(index)?.hand = hand;
        }
        Ok(())
    }

    fn end_of_age(&mut self) -> Result<(), GameError> {
        let age = self.current_age()?.clone();
        for player in &mut self.players {
            self.discards.append(&mut player.hand);
        }

        let powers = (0..self.players.len())
            .map(|index| self.seat(index).map(|seat| seat.military_power()))
            .collect::<Result<Vec<_>, _>>()?;
        let now = Utc::now();
        let count = self.players.len();
        for (index, own) in powers.iter().enumerate() {
            for direction in Direction::ALL {
                let other = neighbor_index(index, count, direction)
                    .and_then(|i| powers.get(i))
                    .ok_or_else(|| GameError::invariant("battle opponent missing"))?;
                let result = match own.cmp(other) {
                    Ordering::Greater => BattleOutcome::Victory,
                    Ordering::Less => BattleOutcome::Defeat,
                    Ordering::Equal => continue,
                };
                debug!(
                    game_id = %self.id,
                    age = %age.name,
                    seat = index,
                    ?direction,
                    ?result,
                    own,
                    other,
                    "Battle"
                );
                self.player_mut(index)?.battles.push(BattleRecord {
                    age: age.name.clone(),
                    direction,
                    result,
                    recorded_at: now,
                });
            }
        }

        let next = self.rules.next_age(&age.name).map(|next| next.name.clone());
        if let Some(next) = next {
            info!(game_id = %self.id, from = %age.name, to = %next, "Age ended");
            self.age = next;
            self.turn = 1;
            self.shuffle()?;
        } else {
            self.status = GameStatus::Finished;
            info!(game_id = %self.id, "Game finished");
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn seated(&self) -> u32 {
        u32::try_from(self.players.len()).unwrap_or(u32::MAX)
    }

    fn ensure_status(&self, expected: GameStatus) -> Result<(), GameError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(GameError::WrongStatus {
                expected,
                actual: self.status,
            })
        }
    }

    fn index_of(&self, user: UserId) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|player| player.user == user)
            .ok_or(GameError::UnknownPlayer(user))
    }

    fn player(&self, index: usize) -> Result<&Player, GameError> {
        self.players
            .get(index)
            .ok_or_else(|| GameError::invariant(format!("no seat {index}")))
    }

    fn player_mut(&mut self, index: usize) -> Result<&mut Player, GameError> {
        self.players
            .get_mut(index)
            .ok_or_else(|| GameError::invariant(format!("no seat {index}")))
    }
}

/// Seat next to `index` on `direction`, in a circle of `count` seats.
fn neighbor_index(index: usize, count: usize, direction: Direction) -> Option<usize> {
    let shifted = match direction {
        Direction::Left => index.checked_add(count)?.checked_sub(1)?,
        Direction::Right => index.checked_add(1)?,
    };
    shifted.checked_rem(count)
}

fn pending_of(player: &Player) -> Result<PendingAction, GameError> {
    player
        .pending
        .ok_or_else(|| GameError::invariant(format!("seat {} has no pending action", player.seat)))
}

fn has_match(options: &[PaymentOption], request: &PlayRequest) -> bool {
    options
        .iter()
        .any(|option| option.matches_trades(request.trade_left, request.trade_right))
}
