//! Arcade Sessions - the session manager for arcade mini-games
//!
//! Owns the table of live sessions, assigns ids, dispatches moves to the
//! engines in [`arcade_games`], and evicts stale sessions.
//!
//! # Example
//!
//! ```
//! use arcade_sessions::SessionManager;
//!
//! let manager = SessionManager::with_seed(1);
//! let session = manager.start("rps", "user-1", "chat-1").expect("known game");
//! let outcome = manager.submit_text(session.id(), "rock").expect("valid choice");
//! assert!(outcome.is_terminal());
//! assert!(manager.get(session.id()).is_none());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod clock;
pub mod config;
pub mod console;
pub mod error;
pub mod manager;
pub mod session;
pub mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ArcadeConfig;
pub use console::{Console, ConsoleCommand, ConsoleError};
pub use error::{ConfigError, SessionError};
pub use manager::SessionManager;
pub use session::{GameSession, SessionId, SessionStatus, SessionView};
pub use sweeper::Sweeper;
