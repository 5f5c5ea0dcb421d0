//! One bot match from creation to final scores.
//!
//! The session polls the game the way a waiting view would: every bot that
//! still has to act submits a request, then [`Game::turn_check`] resolves
//! the turn. Each step runs under the game's registry lock.

use std::collections::BTreeMap;

use evolve_core::{FinalScore, Game, GameError, GameRegistry, RegistryError};
use evolve_types::{GameId, GameStatus, UserId};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::bot::Bot;
use crate::error::EngineError;

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    /// The game played.
    pub game: GameId,
    /// Turns resolved.
    pub turns: u32,
    /// Whether the game reached its end (false when the turn guard hit).
    pub finished: bool,
    /// Scores in seat order.
    pub scores: Vec<FinalScore>,
}

/// Create a game, seat `bots`, start it and play until it finishes or
/// `max_turns` turns resolved (0 = unlimited).
pub fn run_session<R: Rng + ?Sized>(
    registry: &GameRegistry,
    bots: &[Bot],
    max_turns: u32,
    rng: &mut R,
) -> Result<SessionOutcome, EngineError> {
    let id = registry.create()?;
    registry.with_game(id, |game| {
        for bot in bots {
            game.join(bot.user)?;
        }
        game.start().map(|report| {
            info!(
                game_id = %id,
                dealt = report.dealt,
                undealt = report.undealt.len(),
                "Match started"
            );
        })
    })?;

    let mut turns: u32 = 0;
    loop {
        let status = registry.with_game(id, |game| Ok(game.status()))?;
        if status == GameStatus::Finished {
            break;
        }
        if max_turns > 0 && turns >= max_turns {
            warn!(game_id = %id, turns, max_turns, "Turn guard reached, stopping match");
            break;
        }

        let handle = registry.get(id)?;
        let mut game = handle
            .lock()
            .map_err(|e| RegistryError::Poisoned(e.to_string()))?;
        for user in waiting(&game) {
            let bot = bots
                .iter()
                .find(|bot| bot.user == user)
                .ok_or(GameError::UnknownPlayer(user))?;
            let request = bot
                .choose(&game, rng)?
                .ok_or_else(|| EngineError::Stuck {
                    bot: bot.name.clone(),
                })?;
            debug!(
                game_id = %id,
                bot = %bot.name,
                action = ?request.action,
                option = %request.option,
                "Bot chose"
            );
            game.play(user, request)?;
        }
        game.turn_check()?;
        turns = turns.saturating_add(1);
    }

    let (finished, scores) = registry.with_game(id, |game| {
        Ok((game.status() == GameStatus::Finished, game.final_scores()?))
    })?;
    log_scores(id, bots, &scores);
    Ok(SessionOutcome {
        game: id,
        turns,
        finished,
        scores,
    })
}

/// Users still to act this turn.
fn waiting(game: &Game) -> Vec<UserId> {
    game.missing_players()
        .iter()
        .map(|player| player.user)
        .collect()
}

/// Log the final table, best total first.
fn log_scores(id: GameId, bots: &[Bot], scores: &[FinalScore]) {
    let names: BTreeMap<UserId, &str> = bots
        .iter()
        .map(|bot| (bot.user, bot.name.as_str()))
        .collect();
    let mut ranking: Vec<&FinalScore> = scores.iter().collect();
    ranking.sort_by_key(|entry| std::cmp::Reverse(entry.score.total()));

    for (rank, entry) in (1_u32..).zip(ranking) {
        let score = entry.score;
        info!(
            game_id = %id,
            rank,
            bot = names.get(&entry.user).copied().unwrap_or("?"),
            city = %entry.city,
            total = score.total(),
            treasury = score.treasury,
            military = score.military,
            special = score.special,
            civilian = score.civilian,
            economy = score.economy,
            science = score.science,
            personality = score.personality,
            "Final score"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use evolve_core::GameConfig;
    use evolve_rules::RuleBook;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::bot::spawn_bots;

    fn registry() -> GameRegistry {
        let config = GameConfig {
            seed: Some(11),
            ..GameConfig::default()
        };
        GameRegistry::new(Arc::new(RuleBook::standard().unwrap()), config)
    }

    #[test]
    fn bots_play_to_the_end() {
        let registry = registry();
        let mut rng = SmallRng::seed_from_u64(11);
        let bots = spawn_bots(4, &mut rng);
        let outcome = run_session(&registry, &bots, 100, &mut rng).unwrap();
        assert!(outcome.finished);
        assert_eq!(outcome.turns, 18);
        assert_eq!(outcome.scores.len(), 4);
    }

    #[test]
    fn turn_guard_stops_early() {
        let registry = registry();
        let mut rng = SmallRng::seed_from_u64(12);
        let bots = spawn_bots(3, &mut rng);
        let outcome = run_session(&registry, &bots, 2, &mut rng).unwrap();
        assert!(!outcome.finished);
        assert_eq!(outcome.turns, 2);
    }

    #[test]
    fn too_few_bots_cannot_start() {
        let registry = registry();
        let mut rng = SmallRng::seed_from_u64(13);
        let bots = spawn_bots(2, &mut rng);
        assert!(matches!(
            run_session(&registry, &bots, 0, &mut rng),
            Err(EngineError::Registry { .. })
        ));
    }
}
