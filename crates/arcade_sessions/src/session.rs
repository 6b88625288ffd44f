//! A single live game instance.

use arcade_games::{GameKind, GameMove, GameRng, GameSettings, GameState, MoveError, MoveOutcome};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Lifecycle of a session. Moves only from `Active` to `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionStatus {
    /// Accepting moves.
    Active,
    /// Finished; no longer reachable.
    Completed,
}

/// A game session owned by one player.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    kind: GameKind,
    owner_id: String,
    origin_id: String,
    status: SessionStatus,
    created_at: DateTime<Utc>,
    state: GameState,
    rng: GameRng,
}

impl GameSession {
    /// Deals a fresh game of `kind`, drawing from the session's own stream.
    #[instrument(skip_all, fields(session_id = %id, kind = %kind))]
    pub fn new(
        id: SessionId,
        kind: GameKind,
        owner_id: String,
        origin_id: String,
        created_at: DateTime<Utc>,
        settings: &GameSettings,
        mut rng: GameRng,
    ) -> Self {
        let state = GameState::new_game(kind, settings, &mut rng);
        info!("Creating new game session");
        Self {
            id,
            kind,
            owner_id,
            origin_id,
            status: SessionStatus::Active,
            created_at,
            state,
            rng,
        }
    }

    /// Session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Game type; fixed for the session's lifetime.
    pub fn kind(&self) -> GameKind {
        self.kind
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the session still accepts moves.
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Marks the session completed.
    pub fn complete(&mut self) {
        self.status = SessionStatus::Completed;
    }

    /// Applies a move, completing the session on a terminal outcome.
    #[instrument(skip(self, settings), fields(session_id = %self.id))]
    pub fn apply(&mut self, mv: GameMove, settings: &GameSettings) -> Result<MoveOutcome, MoveError> {
        let outcome = self.state.apply(mv, settings, &mut self.rng)?;
        debug!(status = %outcome.status_tag(), points = outcome.points(), "Move applied");
        if outcome.is_terminal() {
            self.complete();
        }
        Ok(outcome)
    }

    /// Cloned, read-only view of the session.
    pub fn view(&self) -> SessionView {
        SessionView::new(
            self.id.clone(),
            self.kind,
            self.owner_id.clone(),
            self.origin_id.clone(),
            self.status,
            self.created_at,
            self.state.clone(),
        )
    }
}

/// Snapshot of a session returned to callers.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize, new)]
pub struct SessionView {
    id: SessionId,
    kind: GameKind,
    owner_id: String,
    origin_id: String,
    status: SessionStatus,
    created_at: DateTime<Utc>,
    state: GameState,
}
