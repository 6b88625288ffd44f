//! Rock-paper-scissors: one round against a uniformly random bot.

use super::GameEngine;
use crate::error::MoveError;
use crate::rng::RandomSource;
use crate::settings::GameSettings;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, instrument, warn};

/// A hand shape.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Hand {
    /// Beats scissors.
    Rock,
    /// Beats rock.
    Paper,
    /// Beats paper.
    Scissors,
}

impl Hand {
    /// Normalises a choice token through the synonym table.
    ///
    /// Accepts English and Russian vocabularies, case-insensitively.
    pub fn parse(input: &str) -> Result<Self, MoveError> {
        match input.trim().to_lowercase().as_str() {
            "rock" | "камень" => Ok(Hand::Rock),
            "paper" | "бумага" => Ok(Hand::Paper),
            "scissors" | "ножницы" => Ok(Hand::Scissors),
            _ => Err(MoveError::InvalidChoice(input.to_string())),
        }
    }

    /// The hand this one defeats.
    pub fn beats(self) -> Hand {
        match self {
            Hand::Rock => Hand::Scissors,
            Hand::Scissors => Hand::Paper,
            Hand::Paper => Hand::Rock,
        }
    }

    /// Result of playing `self` against `other`.
    pub fn against(self, other: Hand) -> RoundResult {
        if self == other {
            RoundResult::Draw
        } else if self.beats() == other {
            RoundResult::Win
        } else {
            RoundResult::Lose
        }
    }
}

/// Result of a round, from the player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoundResult {
    /// Player won.
    Win,
    /// Same hands.
    Draw,
    /// Bot won.
    Lose,
}

/// Round state; all fields unset until the round is played.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpsState {
    /// Player's normalised choice.
    pub player_choice: Option<Hand>,
    /// Bot's draw.
    pub bot_choice: Option<Hand>,
    /// Outcome.
    pub result: Option<RoundResult>,
}

/// A played round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpsRound {
    /// Outcome.
    pub result: RoundResult,
    /// Player's normalised choice.
    pub player_choice: Hand,
    /// Bot's draw.
    pub bot_choice: Hand,
    /// Points awarded.
    pub points: u32,
}

impl GameEngine for RpsState {
    type Move = String;
    type Outcome = RpsRound;

    fn new_game<R: RandomSource>(_settings: &GameSettings, _rng: &mut R) -> Self {
        Self::default()
    }

    #[instrument(skip(self, settings, rng))]
    fn apply<R: RandomSource>(
        &mut self,
        choice: String,
        settings: &GameSettings,
        rng: &mut R,
    ) -> Result<RpsRound, MoveError> {
        if self.result.is_some() {
            return Err(MoveError::GameOver);
        }
        let player = Hand::parse(&choice).inspect_err(|e| warn!(error = %e, "Rejected choice"))?;

        let hands: Vec<Hand> = Hand::iter().collect();
        let bot = match rng.choose(&hands) {
            Some(&hand) => hand,
            None => {
                warn!("Random draw out of range, bot plays rock");
                Hand::Rock
            }
        };
        let result = player.against(bot);
        let points = match result {
            RoundResult::Win => *settings.rps().points_win(),
            RoundResult::Draw => *settings.rps().points_draw(),
            RoundResult::Lose => 0,
        };

        self.player_choice = Some(player);
        self.bot_choice = Some(bot);
        self.result = Some(result);
        debug!(%player, %bot, %result, points, "Round played");

        Ok(RpsRound {
            result,
            player_choice: player,
            bot_choice: bot,
            points,
        })
    }
}
