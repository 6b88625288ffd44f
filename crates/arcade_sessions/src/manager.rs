//! The table of live sessions.
//!
//! Locking: the table mutex is only held for lookups, inserts and removals.
//! Each session sits behind its own mutex, so moves on different sessions
//! run in parallel and moves on one session are serialised. The sweep never
//! blocks on a session lock; a session busy with a move is left for the
//! next pass.

use crate::clock::{Clock, SystemClock};
use crate::config::ArcadeConfig;
use crate::error::SessionError;
use crate::session::{GameSession, SessionId, SessionView};
use arcade_games::{GameKind, GameMove, GameRng, GameSettings, MoveOutcome, RandomSource};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

type Slot = Arc<Mutex<GameSession>>;

/// Locks a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Manages all live game sessions. Clones share the same table.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, Slot>>>,
    rng: Arc<Mutex<GameRng>>,
    settings: Arc<GameSettings>,
    clock: Arc<dyn Clock>,
}

impl SessionManager {
    /// Creates a manager with default settings, entropy seeding and the
    /// system clock.
    #[instrument]
    pub fn new() -> Self {
        Self::with_parts(GameSettings::default(), GameRng::from_entropy(), Arc::new(SystemClock))
    }

    /// Creates a manager whose games replay from `seed`.
    #[instrument]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_parts(GameSettings::default(), GameRng::new(seed), Arc::new(SystemClock))
    }

    /// Creates a manager from loaded configuration.
    #[instrument(skip(config), fields(seed = ?config.seed()))]
    pub fn from_config(config: &ArcadeConfig) -> Self {
        let rng = config.seed().map_or_else(GameRng::from_entropy, GameRng::new);
        Self::with_parts(config.games().clone(), rng, Arc::new(SystemClock))
    }

    /// Creates a manager from explicit parts.
    #[instrument(skip_all, fields(seed = rng.seed()))]
    pub fn with_parts(settings: GameSettings, rng: GameRng, clock: Arc<dyn Clock>) -> Self {
        info!("Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            rng: Arc::new(Mutex::new(rng)),
            settings: Arc::new(settings),
            clock,
        }
    }

    /// Replaces the clock, keeping everything else.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Game settings in force.
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Starts a session for a game-type token.
    #[instrument(skip(self, owner_id, origin_id))]
    pub fn start(
        &self,
        game_type: &str,
        owner_id: impl Into<String>,
        origin_id: impl Into<String>,
    ) -> Result<SessionView, SessionError> {
        let kind = GameKind::parse(game_type).inspect_err(|e| warn!(error = %e, "Rejected game type"))?;
        Ok(self.start_kind(kind, owner_id, origin_id))
    }

    /// Starts a session of a known kind.
    #[instrument(skip(self, owner_id, origin_id))]
    pub fn start_kind(
        &self,
        kind: GameKind,
        owner_id: impl Into<String>,
        origin_id: impl Into<String>,
    ) -> SessionView {
        let mut sessions = lock(&self.sessions);
        let (id, session_rng) = {
            let mut master = lock(&self.rng);
            let id = loop {
                let candidate = format!("{}_{}", kind.id_prefix(), 100_000 + master.pick_index(900_000));
                if !sessions.contains_key(&candidate) {
                    break candidate;
                }
                debug!(session_id = %candidate, "Id collision, redrawing");
            };
            (id, master.fork())
        };

        let session = GameSession::new(
            id.clone(),
            kind,
            owner_id.into(),
            origin_id.into(),
            self.clock.now(),
            &self.settings,
            session_rng,
        );
        let view = session.view();
        sessions.insert(id.clone(), Arc::new(Mutex::new(session)));
        info!(session_id = %id, live = sessions.len(), "Started session");
        view
    }

    fn slot(&self, id: &str) -> Option<Slot> {
        lock(&self.sessions).get(id).cloned()
    }

    fn remove_slot(&self, id: &str, slot: &Slot) {
        let mut sessions = lock(&self.sessions);
        if sessions.get(id).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            sessions.remove(id);
        }
    }

    /// Returns a view of the session if it is live and active.
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Option<SessionView> {
        let Some(slot) = self.slot(id) else {
            debug!(session_id = id, "Session not found");
            return None;
        };
        let session = lock(&slot);
        session.is_active().then(|| session.view())
    }

    /// Applies a move to a session.
    ///
    /// A terminal outcome completes the session and removes it before the
    /// outcome is returned. A rejected move leaves the session unchanged.
    #[instrument(skip(self, mv), fields(session_id = id, game = %mv.kind()))]
    pub fn submit_move(&self, id: &str, mv: GameMove) -> Result<MoveOutcome, SessionError> {
        let not_found = || {
            warn!(session_id = id, "Move for unknown session");
            SessionError::SessionNotFound(id.to_string())
        };
        let slot = self.slot(id).ok_or_else(not_found)?;

        let mut session = lock(&slot);
        if !session.is_active() {
            return Err(not_found());
        }
        let outcome = session
            .apply(mv, &self.settings)
            .inspect_err(|e| warn!(error = %e, "Move rejected"))?;
        let completed = !session.is_active();
        drop(session);

        if completed {
            self.remove_slot(id, &slot);
            info!(status = %outcome.status_tag(), points = outcome.points(), "Session completed");
        }
        Ok(outcome)
    }

    /// Parses `input` for the session's game and applies it.
    #[instrument(skip(self))]
    pub fn submit_text(&self, id: &str, input: &str) -> Result<MoveOutcome, SessionError> {
        let kind = self
            .get(id)
            .map(|view| *view.kind())
            .ok_or_else(|| SessionError::SessionNotFound(id.to_string()))?;
        let mv = GameMove::parse(kind, input)?;
        self.submit_move(id, mv)
    }

    /// Ends a session. Returns whether it was live.
    #[instrument(skip(self))]
    pub fn end(&self, id: &str) -> bool {
        let removed = lock(&self.sessions).remove(id);
        match removed {
            Some(slot) => {
                lock(&slot).complete();
                info!(session_id = id, "Ended session");
                true
            }
            None => {
                debug!(session_id = id, "End for unknown session");
                false
            }
        }
    }

    /// Evicts every session created more than `max_age` ago, whatever its
    /// status. Sessions busy with a move are skipped. Returns the number
    /// evicted.
    #[instrument(skip(self))]
    pub fn sweep(&self, max_age: Duration) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(max_age)
            .ok()
            .and_then(|age| self.clock.now().checked_sub_signed(age))
        else {
            debug!("Max age exceeds clock range, nothing is stale");
            return 0;
        };

        let mut sessions = lock(&self.sessions);
        let before = sessions.len();
        let mut skipped = 0usize;
        sessions.retain(|id, slot| {
            let mut session = match slot.try_lock() {
                Ok(guard) => guard,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                Err(TryLockError::WouldBlock) => {
                    skipped += 1;
                    return true;
                }
            };
            if session.created_at() < cutoff {
                session.complete();
                debug!(session_id = %id, "Evicting stale session");
                false
            } else {
                true
            }
        });
        let evicted = before - sessions.len();
        info!(evicted, skipped, live = sessions.len(), "Sweep finished");
        evicted
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        lock(&self.sessions).len()
    }

    /// Whether no session is live.
    pub fn is_empty(&self) -> bool {
        lock(&self.sessions).is_empty()
    }

    /// Ids of live sessions, sorted.
    #[instrument(skip(self))]
    pub fn ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = lock(&self.sessions).keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn manager() -> (SessionManager, ManualClock) {
        let clock = ManualClock::default();
        let manager = SessionManager::with_seed(42).with_clock(Arc::new(clock.clone()));
        (manager, clock)
    }

    #[test]
    fn test_ids_carry_kind_prefix() {
        let (manager, _) = manager();
        let view = manager.start("tictactoe", "u1", "c1").expect("known game");
        let (prefix, digits) = view.id().split_once('_').expect("prefixed id");
        assert_eq!(prefix, "tic");
        assert_eq!(digits.len(), 6);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));

        let merge = manager.start("2048", "u1", "c1").expect("known game");
        assert!(merge.id().starts_with("204_"));
    }

    #[test]
    fn test_same_seed_same_ids() {
        let a = SessionManager::with_seed(7);
        let b = SessionManager::with_seed(7);
        for _ in 0..3 {
            let x = a.start_kind(GameKind::Snake, "u", "c");
            let y = b.start_kind(GameKind::Snake, "u", "c");
            assert_eq!(x.id(), y.id());
            assert_eq!(x.state(), y.state());
        }
    }

    #[test]
    fn test_sweep_skips_busy_session() {
        let (manager, clock) = manager();
        let view = manager.start_kind(GameKind::Quiz, "u", "c");
        clock.advance(chrono::Duration::hours(1));

        let slot = manager.slot(view.id()).expect("live");
        let guard = lock(&slot);
        assert_eq!(manager.sweep(Duration::from_secs(60)), 0);
        assert_eq!(manager.len(), 1);
        drop(guard);

        assert_eq!(manager.sweep(Duration::from_secs(60)), 1);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_huge_max_age_evicts_nothing() {
        let (manager, _) = manager();
        manager.start_kind(GameKind::Rps, "u", "c");
        assert_eq!(manager.sweep(Duration::MAX), 0);
        assert_eq!(manager.len(), 1);
    }
}
