//! Property tests for engine invariants that must hold for any move sequence.

use arcade_games::games::battleship::BOARD_SIZE;
use arcade_games::games::merge::slide;
use arcade_games::games::{
    BattleshipState, BattleshipStatus, Mark, MergeState, MergeStatus, Shot, SnakeState,
    SnakeStatus, TicTacToeState, TicTacToeStatus,
};
use arcade_games::{Direction, GameEngine, GameRng, GameSettings, MoveError};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = Direction> + Clone {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn tile() -> impl Strategy<Value = u32> + Clone {
    prop_oneof![Just(0u32), Just(2), Just(4), Just(8), Just(16)]
}

proptest! {
    #[test]
    fn tictactoe_marks_stay_balanced(seed in any::<u64>(), positions in prop::collection::vec(0usize..9, 1..20)) {
        let settings = GameSettings::default();
        let mut rng = GameRng::new(seed);
        let mut state = TicTacToeState::new_game(&settings, &mut rng);

        for pos in positions {
            let before = state.clone();
            match state.apply(pos, &settings, &mut rng) {
                Ok(outcome) => {
                    let x = state.board.count(Mark::X);
                    let o = state.board.count(Mark::O);
                    prop_assert!(x == o || x == o + 1, "x={x} o={o}");
                    if outcome.status == TicTacToeStatus::AlreadyOccupied {
                        prop_assert_eq!(&state, &before);
                    }
                }
                Err(e) => {
                    prop_assert_eq!(e, MoveError::GameOver);
                    prop_assert_eq!(&state, &before);
                }
            }
        }
    }

    #[test]
    fn merge_noop_slide_changes_nothing(
        seed in any::<u64>(),
        tiles in prop::array::uniform4(prop::array::uniform4(tile())),
        dir in direction(),
    ) {
        let mut slid = tiles;
        let settings = GameSettings::default();
        let mut rng = GameRng::new(seed);
        let mut state = MergeState::from_tiles(tiles);
        let gained = slide(&mut slid, dir);

        let outcome = state.apply(dir, &settings, &mut rng).expect("fresh game accepts moves");
        if slid == tiles {
            prop_assert_eq!(gained, 0);
            prop_assert!(matches!(outcome.status, MergeStatus::Unchanged | MergeStatus::Lose));
            prop_assert_eq!(state.tiles, tiles);
            prop_assert_eq!(state.score, 0);
            prop_assert_eq!(state.moves, 0);
        } else {
            prop_assert!(outcome.moved);
            prop_assert_eq!(state.score, gained);
        }
    }

    #[test]
    fn battleship_hits_bounded(
        seed in any::<u64>(),
        shots in prop::collection::vec((0..BOARD_SIZE, 0..BOARD_SIZE), 1..40),
    ) {
        let settings = GameSettings::default();
        let mut rng = GameRng::new(seed);
        let mut state = BattleshipState::new_game(&settings, &mut rng);
        let total = state.total_ship_cells();

        for (row, col) in shots {
            match state.apply(Shot { row, col }, &settings, &mut rng) {
                Ok(outcome) => {
                    prop_assert!(outcome.hits <= total);
                    prop_assert_eq!(outcome.status == BattleshipStatus::Win, outcome.hits == total);
                }
                Err(e) => prop_assert_eq!(e, MoveError::GameOver),
            }
        }
    }

    #[test]
    fn snake_length_and_adjacency(seed in any::<u64>(), moves in prop::collection::vec(direction(), 1..60)) {
        let settings = GameSettings::default();
        let mut rng = GameRng::new(seed);
        let mut state = SnakeState::new_game(&settings, &mut rng);

        for dir in moves {
            let prev = state.head().expect("snake has a head");
            match state.apply(dir, &settings, &mut rng) {
                Ok(outcome) if outcome.status == SnakeStatus::Continue => {
                    prop_assert_eq!(outcome.length, outcome.body.len());
                    let head = outcome.body[0];
                    let dist = head.row.abs_diff(prev.row) + head.col.abs_diff(prev.col);
                    prop_assert_eq!(dist, 1);
                }
                Ok(outcome) => {
                    prop_assert_eq!(outcome.length, outcome.body.len());
                    break;
                }
                Err(MoveError::InvalidDirection { .. }) => {}
                Err(e) => prop_assert!(false, "unexpected error {e}"),
            }
        }
    }
}
