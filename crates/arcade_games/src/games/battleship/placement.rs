//! Random non-overlapping fleet placement.

use super::{BOARD_SIZE, Ship};
use crate::rng::RandomSource;
use tracing::{debug, instrument, warn};

/// Places one ship per entry of `lengths`, in order.
///
/// Each ship gets up to `attempts` random tries at an orientation and anchor
/// that fit on the board. A try is accepted only if none of its cells touch
/// an already placed ship. A ship that runs out of tries is skipped, so the
/// returned fleet may be smaller than requested.
#[instrument(skip(rng))]
pub fn place_fleet<R: RandomSource>(lengths: &[usize], attempts: u32, rng: &mut R) -> Vec<Ship> {
    let mut fleet: Vec<Ship> = Vec::with_capacity(lengths.len());

    for &len in lengths {
        if len == 0 || len > BOARD_SIZE {
            warn!(len, "Ship cannot fit on the board");
            continue;
        }

        let span = BOARD_SIZE - len + 1;
        let mut placed = false;
        for attempt in 0..attempts {
            let horizontal = rng.pick_index(2) % 2 == 0;
            let (row, col) = if horizontal {
                (rng.pick_index(BOARD_SIZE) % BOARD_SIZE, rng.pick_index(span) % span)
            } else {
                (rng.pick_index(span) % span, rng.pick_index(BOARD_SIZE) % BOARD_SIZE)
            };
            let candidate = Ship::new(row, col, len, horizontal);

            if fleet.iter().all(|ship| !ship.overlaps(&candidate)) {
                debug!(len, row, col, horizontal, attempt, "Placed ship");
                fleet.push(candidate);
                placed = true;
                break;
            }
        }

        if !placed {
            warn!(len, attempts, "Skipping ship after exhausting placement attempts");
        }
    }

    fleet
}
