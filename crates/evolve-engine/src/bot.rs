//! Bot players.
//!
//! A bot owns a user identity and a display name drawn from a fixed pool.
//! Each turn it picks uniformly among the requests the game would accept,
//! leaning towards building: selling is only chosen when nothing else is
//! legal or when the coin flip says so.

use evolve_core::{Game, GameError, PlayRequest};
use evolve_types::{ActionKind, UserId};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

/// Chance of selling an option even though something could be built.
const SELL_ANYWAY: f64 = 0.2;

/// Built-in pool of bot names. Drawn without replacement so names are
/// unique within a match.
const NAME_POOL: &[&str] = &[
    "Archimedes", "Boudicca", "Cleopatra", "Darius", "Euclid", "Hammurabi",
    "Hatshepsut", "Hypatia", "Imhotep", "Leonidas", "Nebuchadnezzar",
    "Pericles", "Ramesses", "Sappho", "Thales", "Xerxes", "Zenobia",
];

/// A computer-controlled player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bot {
    /// Identity used to join the game.
    pub user: UserId,
    /// Name shown in logs.
    pub name: String,
}

/// Create `count` bots with distinct names.
///
/// Names are reused with a numeric suffix once the pool runs out.
pub fn spawn_bots<R: Rng + ?Sized>(count: u32, rng: &mut R) -> Vec<Bot> {
    let mut names: Vec<&str> = NAME_POOL.to_vec();
    names.shuffle(rng);
    (0..count)
        .zip(names.iter().cycle())
        .map(|(index, base)| {
            let round = usize::try_from(index)
                .unwrap_or(usize::MAX)
                .checked_div(NAME_POOL.len())
                .unwrap_or(0);
            let name = if round == 0 {
                (*base).to_owned()
            } else {
                format!("{base} {}", round.saturating_add(1))
            };
            Bot {
                user: UserId::new(),
                name,
            }
        })
        .collect()
}

impl Bot {
    /// The request this bot submits this turn, or `None` when it already
    /// chose or holds nothing.
    pub fn choose<R: Rng + ?Sized>(
        &self,
        game: &Game,
        rng: &mut R,
    ) -> Result<Option<PlayRequest>, GameError> {
        let legal = game.legal_requests(self.user)?;
        let (sells, builds): (Vec<PlayRequest>, Vec<PlayRequest>) = legal
            .into_iter()
            .partition(|request| request.action == ActionKind::Sell);
        let pool = if builds.is_empty() || rng.random_bool(SELL_ANYWAY) {
            &sells
        } else {
            &builds
        };
        Ok(pool.choose(rng).copied())
    }
}
