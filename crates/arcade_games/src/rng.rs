//! Seedable randomness for opponent moves, spawns and placements.
//!
//! Engines never touch a global RNG. Every random draw goes through
//! [`RandomSource`], so a session can replay from a seed and tests can
//! script the exact draws they need.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// A source of random draws used by the game engines.
pub trait RandomSource {
    /// Returns an index uniformly distributed in `0..len`.
    ///
    /// `len` is always non-zero when called by the engines.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Returns `true` with the given probability.
    fn chance(&mut self, probability: f64) -> bool;

    /// Chooses an element of `items` uniformly, or `None` when empty.
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        let idx = self.pick_index(items.len());
        items.get(idx)
    }

    /// Draws `count` distinct indices from `0..len`, in draw order.
    ///
    /// `count` is clamped to `len`.
    fn sample_indices(&mut self, len: usize, count: usize) -> Vec<usize>
    where
        Self: Sized,
    {
        let mut pool: Vec<usize> = (0..len).collect();
        let mut drawn = Vec::with_capacity(count.min(len));
        while drawn.len() < count && !pool.is_empty() {
            let idx = self.pick_index(pool.len()) % pool.len();
            drawn.push(pool.swap_remove(idx));
        }
        drawn
    }
}

/// Deterministic ChaCha8 stream with forking.
///
/// The session manager keeps one master stream and forks a child per
/// session, so the same seed reproduces the same games.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Creates a stream from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Creates a stream seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().r#gen())
    }

    /// Seed this stream was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Forks an independent child stream.
    ///
    /// Each fork gets a distinct seed derived from the parent seed and the
    /// number of forks taken so far.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    /// Draws a raw `u32`, used for identifiers.
    pub fn next_u32(&mut self) -> u32 {
        self.inner.r#gen()
    }
}

impl RandomSource for GameRng {
    fn pick_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len.max(1))
    }

    fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }
}

/// A scripted source that replays fixed draws.
///
/// Indices are reduced modulo the requested length so a script stays valid
/// as boards fill up. Once a queue runs dry it yields `0` and `false`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    indices: VecDeque<usize>,
    flips: VecDeque<bool>,
}

impl ScriptedSource {
    /// Creates a source replaying `indices` for index draws.
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
            flips: VecDeque::new(),
        }
    }

    /// Sets the coin flips returned by [`RandomSource::chance`].
    #[must_use]
    pub fn with_flips(mut self, flips: impl IntoIterator<Item = bool>) -> Self {
        self.flips = flips.into_iter().collect();
        self
    }

    /// Queues more index draws.
    pub fn push_indices(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.indices.extend(indices);
    }
}

impl RandomSource for ScriptedSource {
    fn pick_index(&mut self, len: usize) -> usize {
        let raw = self.indices.pop_front().unwrap_or(0);
        raw % len.max(1)
    }

    fn chance(&mut self, _probability: f64) -> bool {
        self.flips.pop_front().unwrap_or(false)
    }
}

/// A source that always answers past the end of the range.
#[cfg(test)]
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct OverflowSource;

#[cfg(test)]
impl RandomSource for OverflowSource {
    fn pick_index(&mut self, len: usize) -> usize {
        len + 7
    }

    fn chance(&mut self, _probability: f64) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.pick_index(1000), b.pick_index(1000));
        }
    }

    #[test]
    fn test_fork_is_deterministic_and_distinct() {
        let mut a = GameRng::new(7);
        let mut b = GameRng::new(7);
        let mut fa = a.fork();
        let mut fb = b.fork();
        assert_eq!(fa.seed(), fb.seed());
        assert_ne!(fa.seed(), a.seed());

        let seq_fork: Vec<_> = (0..10).map(|_| fa.pick_index(1000)).collect();
        let seq_fork2: Vec<_> = (0..10).map(|_| fb.pick_index(1000)).collect();
        assert_eq!(seq_fork, seq_fork2);
    }

    #[test]
    fn test_pick_index_in_range() {
        let mut rng = GameRng::new(1);
        for len in 1..20 {
            assert!(rng.pick_index(len) < len);
        }
    }

    #[test]
    fn test_nan_chance_is_false() {
        let mut rng = GameRng::new(2);
        assert!(!rng.chance(f64::NAN));
        assert!(rng.chance(1.0));
    }

    #[test]
    fn test_overflowing_draws_stay_in_range() {
        let mut rng = OverflowSource;
        assert_eq!(rng.choose(&[1, 2, 3]), None);
        let mut drawn = rng.sample_indices(5, 5);
        drawn.sort_unstable();
        assert_eq!(drawn, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_sample_indices_distinct() {
        let mut rng = GameRng::new(3);
        let mut drawn = rng.sample_indices(10, 6);
        assert_eq!(drawn.len(), 6);
        drawn.sort_unstable();
        drawn.dedup();
        assert_eq!(drawn.len(), 6);
        assert!(drawn.iter().all(|&i| i < 10));
    }

    #[test]
    fn test_sample_indices_clamped() {
        let mut rng = GameRng::new(3);
        assert_eq!(rng.sample_indices(2, 5).len(), 2);
    }

    #[test]
    fn test_scripted_wraps_and_defaults() {
        let mut src = ScriptedSource::new([7, 2]).with_flips([true]);
        assert_eq!(src.pick_index(5), 2);
        assert_eq!(src.pick_index(5), 2);
        assert_eq!(src.pick_index(5), 0);
        assert!(src.chance(0.1));
        assert!(!src.chance(0.9));
    }

    #[test]
    fn test_choose_empty() {
        let mut src = ScriptedSource::default();
        let empty: [u8; 0] = [];
        assert!(src.choose(&empty).is_none());
        assert_eq!(src.choose(&[4, 5, 6]), Some(&4));
    }
}
