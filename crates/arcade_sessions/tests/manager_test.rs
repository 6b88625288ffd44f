//! Tests for session lifecycle through the manager.

use arcade_games::games::{QuizStatus, TetrisAction};
use arcade_games::{Direction, GameKind, GameMove, GameRng, GameSettings, MoveError, MoveOutcome};
use arcade_sessions::{ManualClock, SessionError, SessionManager, SessionStatus};
use chrono::Duration as ChronoDuration;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn manual_manager() -> (SessionManager, ManualClock) {
    let clock = ManualClock::default();
    let manager = SessionManager::with_parts(GameSettings::default(), GameRng::new(3), Arc::new(clock.clone()));
    (manager, clock)
}

#[test]
fn test_start_then_end_reports_not_found() {
    let manager = SessionManager::with_seed(1);
    let view = manager.start("battleship", "owner", "origin").expect("known game");
    assert_eq!(*view.status(), SessionStatus::Active);
    assert_eq!(view.owner_id(), "owner");
    assert!(manager.get(view.id()).is_some());

    assert!(manager.end(view.id()));
    assert!(manager.get(view.id()).is_none());
    assert!(!manager.end(view.id()));
    assert!(manager.is_empty());
}

#[test]
fn test_unknown_game_type() {
    let manager = SessionManager::with_seed(1);
    let err = manager.start("chess", "o", "c").unwrap_err();
    assert!(matches!(err, SessionError::UnknownGameType(_)));
    assert!(manager.is_empty());
}

#[test]
fn test_aliases_start_sessions() {
    let manager = SessionManager::with_seed(1);
    for (token, kind) in [
        ("rock_paper_scissors", GameKind::Rps),
        ("tic_tac_toe", GameKind::TicTacToe),
        ("game_2048", GameKind::Merge),
        ("Snake", GameKind::Snake),
    ] {
        let view = manager.start(token, "o", "c").expect("alias accepted");
        assert_eq!(*view.kind(), kind);
    }
    assert_eq!(manager.len(), 4);
}

#[test]
fn test_rps_round_completes_session() {
    let manager = SessionManager::with_seed(2);
    let view = manager.start("rps", "o", "c").expect("start");
    let outcome = manager
        .submit_move(view.id(), GameMove::Rps("paper".to_string()))
        .expect("valid choice");
    assert!(matches!(outcome, MoveOutcome::Rps(_)));
    assert!(manager.get(view.id()).is_none());

    let again = manager.submit_move(view.id(), GameMove::Rps("rock".to_string()));
    assert_eq!(again, Err(SessionError::SessionNotFound(view.id().clone())));
}

#[test]
fn test_quiz_runs_to_completion() {
    let manager = SessionManager::with_seed(4);
    let view = manager.start("quiz", "o", "c").expect("start");
    for round in 1..=3 {
        let outcome = manager
            .submit_move(view.id(), GameMove::Quiz(0))
            .expect("index 0 is always an option");
        let MoveOutcome::Quiz(quiz) = outcome else {
            panic!("quiz session returned {outcome:?}");
        };
        if round < 3 {
            assert_eq!(quiz.status, QuizStatus::Continue);
            assert!(manager.get(view.id()).is_some());
        } else {
            assert_eq!(quiz.status, QuizStatus::GameOver);
            assert_eq!(quiz.points, quiz.score * 5);
        }
    }
    assert!(manager.get(view.id()).is_none());
}

#[test]
fn test_rejected_moves_leave_session_unchanged() {
    let manager = SessionManager::with_seed(5);
    let view = manager.start("snake", "o", "c").expect("start");

    let wrong = manager.submit_move(view.id(), GameMove::TicTacToe(4));
    assert_eq!(
        wrong,
        Err(SessionError::Move(MoveError::WrongGame {
            expected: GameKind::Snake,
            got: GameKind::TicTacToe
        }))
    );

    let reversed = manager.submit_move(view.id(), GameMove::Snake(Direction::Left));
    assert!(matches!(
        reversed,
        Err(SessionError::Move(MoveError::InvalidDirection { .. }))
    ));

    let after = manager.get(view.id()).expect("still live");
    assert_eq!(after.state(), view.state());
}

#[test]
fn test_submit_text_parses_for_session_kind() {
    let manager = SessionManager::with_seed(6);
    let view = manager.start("battleship", "o", "c").expect("start");
    manager.submit_text(view.id(), "0,0").expect("on the board");
    assert_eq!(
        manager.submit_text(view.id(), "9 9"),
        Err(SessionError::Move(MoveError::InvalidCoordinates { row: 9, col: 9 }))
    );
    assert!(matches!(
        manager.submit_text("bat_000000", "1 1"),
        Err(SessionError::SessionNotFound(_))
    ));
}

#[test]
fn test_sweep_evicts_only_stale_sessions() {
    let (manager, clock) = manual_manager();
    let old_a = manager.start_kind(GameKind::Tetris, "o", "c");
    let old_b = manager.start_kind(GameKind::Merge, "o", "c");
    clock.advance(ChronoDuration::minutes(20));
    let young = manager.start_kind(GameKind::Snake, "o", "c");
    clock.advance(ChronoDuration::minutes(15));

    assert_eq!(manager.sweep(Duration::from_secs(30 * 60)), 2);
    assert!(manager.get(old_a.id()).is_none());
    assert!(manager.get(old_b.id()).is_none());
    assert!(manager.get(young.id()).is_some());
    assert_eq!(manager.ids(), vec![young.id().clone()]);
}

#[test]
fn test_concurrent_starts_get_unique_ids() {
    let manager = SessionManager::with_seed(8);
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let manager = manager.clone();
            thread::spawn(move || {
                (0..25)
                    .map(|_| manager.start_kind(GameKind::Rps, format!("owner{t}"), "c").id().clone())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let ids: HashSet<String> = handles
        .into_iter()
        .flat_map(|h| h.join().expect("thread"))
        .collect();
    assert_eq!(ids.len(), 200);
    assert_eq!(manager.len(), 200);
}

#[test]
fn test_concurrent_moves_on_one_session() {
    let manager = SessionManager::with_seed(9);
    let view = manager.start("tetris", "o", "c").expect("start");
    let id = view.id().clone();

    let handles: Vec<_> = [TetrisAction::Left, TetrisAction::Right, TetrisAction::Rotate]
        .into_iter()
        .cycle()
        .take(6)
        .map(|action| {
            let manager = manager.clone();
            let id = id.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    manager
                        .submit_move(&id, GameMove::Tetris(action))
                        .expect("shifts and rotations never end a game");
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("thread");
    }
    assert!(manager.get(&id).is_some());
}
