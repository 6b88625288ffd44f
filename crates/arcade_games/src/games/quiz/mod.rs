//! Multiple-choice quiz drawn without replacement from a question pool.

mod questions;

pub use questions::default_pool;

use super::GameEngine;
use crate::error::MoveError;
use crate::rng::RandomSource;
use crate::settings::GameSettings;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// A quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question text.
    pub prompt: String,
    /// Answer options.
    pub answers: Vec<String>,
    /// Index of the correct option.
    pub correct: usize,
}

/// Status tag of a quiz answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuizStatus {
    /// More questions remain.
    Continue,
    /// That was the last question.
    GameOver,
}

/// Session payload for the quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizState {
    /// Questions for this game, in order.
    pub questions: Vec<Question>,
    /// Index of the question awaiting an answer.
    pub current: usize,
    /// Number of correct answers so far.
    pub score: u32,
}

impl QuizState {
    /// The question awaiting an answer.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Whether every question has been answered.
    pub fn is_finished(&self) -> bool {
        self.current >= self.questions.len()
    }
}

/// Result of one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOutcome {
    /// Status tag.
    pub status: QuizStatus,
    /// Whether the answer matched.
    pub correct: bool,
    /// Index of the correct option.
    pub correct_index: usize,
    /// Correct answers so far.
    pub score: u32,
    /// The next question, when the quiz continues.
    pub next_question: Option<Question>,
    /// Points awarded; the final score converted on game over.
    pub points: u32,
}

impl GameEngine for QuizState {
    type Move = usize;
    type Outcome = QuizOutcome;

    #[instrument(skip(settings, rng))]
    fn new_game<R: RandomSource>(settings: &GameSettings, rng: &mut R) -> Self {
        let pool = settings.quiz().pool().clone().unwrap_or_else(default_pool);
        let count = *settings.quiz().questions_per_game();
        let questions: Vec<Question> = rng
            .sample_indices(pool.len(), count)
            .into_iter()
            .map(|idx| pool[idx].clone())
            .collect();
        debug!(drawn = questions.len(), pool = pool.len(), "Drew quiz questions");
        Self {
            questions,
            current: 0,
            score: 0,
        }
    }

    #[instrument(skip(self, settings, _rng), fields(current = self.current))]
    fn apply<R: RandomSource>(
        &mut self,
        index: usize,
        settings: &GameSettings,
        _rng: &mut R,
    ) -> Result<QuizOutcome, MoveError> {
        let question = self.current_question().ok_or(MoveError::QuizFinished)?;
        if index >= question.answers.len() {
            warn!(index, options = question.answers.len(), "Answer out of range");
            return Err(MoveError::InvalidAnswer {
                index,
                options: question.answers.len(),
            });
        }

        let correct_index = question.correct;
        let correct = index == correct_index;
        if correct {
            self.score += 1;
        }
        self.current += 1;

        if self.is_finished() {
            let points = self.score * *settings.quiz().points_per_correct();
            info!(score = self.score, points, "Quiz finished");
            return Ok(QuizOutcome {
                status: QuizStatus::GameOver,
                correct,
                correct_index,
                score: self.score,
                next_question: None,
                points,
            });
        }

        Ok(QuizOutcome {
            status: QuizStatus::Continue,
            correct,
            correct_index,
            score: self.score,
            next_question: self.current_question().cloned(),
            points: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{GameRng, ScriptedSource};
    use crate::settings::QuizSettings;

    fn fixed_pool() -> Vec<Question> {
        (0..4)
            .map(|i| Question {
                prompt: format!("Q{i}"),
                answers: vec!["a".into(), "b".into(), "c".into()],
                correct: i % 3,
            })
            .collect()
    }

    fn settings_with_pool(count: usize) -> GameSettings {
        GameSettings::default().with_quiz(
            QuizSettings::default()
                .with_pool(fixed_pool())
                .with_questions_per_game(count),
        )
    }

    #[test]
    fn test_draws_without_replacement() {
        let settings = GameSettings::default();
        let state = QuizState::new_game(&settings, &mut GameRng::new(11));
        assert_eq!(state.questions.len(), 3);
        for (i, q) in state.questions.iter().enumerate() {
            assert!(!state.questions[i + 1..].contains(q));
        }
    }

    #[test]
    fn test_count_clamped_to_pool() {
        let settings = settings_with_pool(10);
        let state = QuizState::new_game(&settings, &mut GameRng::new(1));
        assert_eq!(state.questions.len(), 4);
    }

    #[test]
    fn test_full_game_scores() {
        let settings = settings_with_pool(3);
        // Draws Q0, Q1 and then Q3.
        let mut rng = ScriptedSource::new([0, 1, 2]);
        let mut state = QuizState::new_game(&settings, &mut rng);
        let first = state.questions[0].correct;
        let second = state.questions[1].correct;

        let o1 = state.apply(first, &settings, &mut rng).expect("valid");
        assert_eq!(o1.status, QuizStatus::Continue);
        assert!(o1.correct);
        assert_eq!(o1.score, 1);
        assert_eq!(o1.next_question.as_ref(), Some(&state.questions[1]));

        let wrong = (second + 1) % 3;
        let o2 = state.apply(wrong, &settings, &mut rng).expect("valid");
        assert!(!o2.correct);
        assert_eq!(o2.correct_index, second);

        let third = state.questions[2].correct;
        let o3 = state.apply(third, &settings, &mut rng).expect("valid");
        assert_eq!(o3.status, QuizStatus::GameOver);
        assert_eq!(o3.score, 2);
        assert_eq!(o3.points, 10);
    }

    #[test]
    fn test_invalid_answer_keeps_pointer() {
        let settings = settings_with_pool(2);
        let mut rng = ScriptedSource::default();
        let mut state = QuizState::new_game(&settings, &mut rng);
        let before = state.clone();
        assert_eq!(
            state.apply(3, &settings, &mut rng),
            Err(MoveError::InvalidAnswer { index: 3, options: 3 })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_answer_after_finish() {
        let settings = settings_with_pool(0);
        let mut rng = ScriptedSource::default();
        let mut state = QuizState::new_game(&settings, &mut rng);
        assert!(state.is_finished());
        assert_eq!(state.apply(0, &settings, &mut rng), Err(MoveError::QuizFinished));
    }
}
