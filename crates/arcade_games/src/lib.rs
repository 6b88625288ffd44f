//! Arcade Games - pure logic for seven single-player mini-games
//!
//! Each game is a [`GameEngine`]: a typed state payload plus an `apply`
//! operation that validates a move, mutates the state, and returns an
//! outcome descriptor. Randomness is injected through [`RandomSource`].
//!
//! # Architecture
//!
//! - **Games**: rock-paper-scissors, tic-tac-toe, quiz, battleship, 2048,
//!   tetris and snake
//! - **Dispatch**: [`GameKind`], [`GameState`], [`GameMove`] and
//!   [`MoveOutcome`] close over all seven games
//! - **Settings**: point awards and tunables in [`GameSettings`]
//!
//! # Example
//!
//! ```
//! use arcade_games::{GameKind, GameMove, GameRng, GameSettings, GameState};
//!
//! let settings = GameSettings::default();
//! let mut rng = GameRng::new(7);
//! let mut state = GameState::new_game(GameKind::TicTacToe, &settings, &mut rng);
//! let outcome = state
//!     .apply(GameMove::TicTacToe(4), &settings, &mut rng)
//!     .expect("centre is free");
//! assert!(!outcome.is_terminal());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod games;
pub mod rng;
pub mod settings;

pub use error::{InvalidSettings, MoveError, UnknownGameType};
pub use games::{Direction, GameEngine, GameKind, GameMove, GameState, MoveOutcome};
pub use rng::{GameRng, RandomSource, ScriptedSource};
pub use settings::GameSettings;
