//! Built-in question pool.

use super::Question;

const POOL: &[(&str, &[&str], usize)] = &[
    ("Capital of France?", &["Paris", "London", "Berlin", "Madrid"], 0),
    ("How many continents are there on Earth?", &["5", "6", "7", "8"], 2),
    (
        "Which gas makes up most of the atmosphere?",
        &["Oxygen", "Nitrogen", "Carbon dioxide", "Hydrogen"],
        1,
    ),
    (
        "In which year was the first artificial satellite launched?",
        &["1955", "1957", "1959", "1961"],
        1,
    ),
    ("How many sides does a hexagon have?", &["5", "6", "7", "8"], 1),
    (
        "Which planet is closest to the Sun?",
        &["Venus", "Earth", "Mercury", "Mars"],
        2,
    ),
    ("What is the chemical symbol for gold?", &["Ag", "Au", "Gd", "Go"], 1),
    (
        "Which ocean is the largest?",
        &["Atlantic", "Indian", "Arctic", "Pacific"],
        3,
    ),
];

/// Returns the built-in pool.
pub fn default_pool() -> Vec<Question> {
    POOL.iter()
        .map(|(prompt, answers, correct)| Question {
            prompt: (*prompt).to_string(),
            answers: answers.iter().map(|a| (*a).to_string()).collect(),
            correct: *correct,
        })
        .collect()
}
