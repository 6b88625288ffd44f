//! Line-oriented text console over a [`SessionManager`].

use crate::error::SessionError;
use crate::manager::SessionManager;
use std::time::Duration;
use tracing::instrument;

/// Help text printed by `help`.
pub const HELP: &str = "\
commands:
  start <game>          start a session (rps, tictactoe, quiz, battleship, 2048, tetris, snake)
  move <id> <payload>   submit a move, e.g. `move tic_123456 4` or `move bat_123456 2 3`
  show <id>             print a session
  end <id>              end a session
  list                  list live sessions
  sweep                 evict stale sessions now
  quit                  leave";

/// A console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `start <game>`
    Start(String),
    /// `move <id> <payload>`
    Move {
        /// Session id.
        id: String,
        /// Raw move text.
        payload: String,
    },
    /// `show <id>`
    Show(String),
    /// `end <id>`
    End(String),
    /// `list`
    List,
    /// `sweep`
    Sweep,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Error parsing a console line.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ConsoleError {
    /// Blank line.
    #[display("Empty command")]
    Empty,
    /// First word is not a command.
    #[display("Unknown command {:?}, try `help`", _0)]
    UnknownCommand(String),
    /// A required argument is absent.
    #[display("Missing {} for `{}`", argument, command)]
    MissingArgument {
        /// Command word.
        command: &'static str,
        /// Name of the absent argument.
        argument: &'static str,
    },
}

impl std::error::Error for ConsoleError {}

impl ConsoleCommand {
    /// Parses one console line.
    pub fn parse(line: &str) -> Result<Self, ConsoleError> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let arg = |command: &'static str, argument: &'static str| {
            rest.split_whitespace()
                .next()
                .map(str::to_string)
                .ok_or(ConsoleError::MissingArgument { command, argument })
        };

        match word.to_lowercase().as_str() {
            "" => Err(ConsoleError::Empty),
            "start" => arg("start", "game").map(ConsoleCommand::Start),
            "move" => {
                let (id, payload) = rest.split_once(char::is_whitespace).ok_or(
                    ConsoleError::MissingArgument {
                        command: "move",
                        argument: "payload",
                    },
                )?;
                Ok(ConsoleCommand::Move {
                    id: id.to_string(),
                    payload: payload.trim().to_string(),
                })
            }
            "show" => arg("show", "id").map(ConsoleCommand::Show),
            "end" => arg("end", "id").map(ConsoleCommand::End),
            "list" => Ok(ConsoleCommand::List),
            "sweep" => Ok(ConsoleCommand::Sweep),
            "help" | "?" => Ok(ConsoleCommand::Help),
            "quit" | "exit" => Ok(ConsoleCommand::Quit),
            other => Err(ConsoleError::UnknownCommand(other.to_string())),
        }
    }
}

/// Executes console commands for one owner.
#[derive(Debug, Clone)]
pub struct Console {
    manager: SessionManager,
    owner_id: String,
    session_ttl: Duration,
}

impl Console {
    /// Creates a console acting as `owner_id`.
    pub fn new(manager: SessionManager, owner_id: impl Into<String>, session_ttl: Duration) -> Self {
        Self {
            manager,
            owner_id: owner_id.into(),
            session_ttl,
        }
    }

    /// Runs a command and renders the reply. `Quit` renders nothing.
    #[instrument(skip(self))]
    pub fn execute(&self, command: ConsoleCommand) -> Result<String, SessionError> {
        let reply = match command {
            ConsoleCommand::Start(game) => {
                let view = self.manager.start(&game, self.owner_id.clone(), "console")?;
                format!("started {} ({})\n{}", view.id(), view.kind(), to_json(view.state()))
            }
            ConsoleCommand::Move { id, payload } => {
                let outcome = self.manager.submit_text(&id, &payload)?;
                let ended = if outcome.is_terminal() { " (session over)" } else { "" };
                format!(
                    "{} +{}{}\n{}",
                    outcome.status_tag(),
                    outcome.points(),
                    ended,
                    to_json(&outcome)
                )
            }
            ConsoleCommand::Show(id) => {
                let view = self
                    .manager
                    .get(&id)
                    .ok_or(SessionError::SessionNotFound(id))?;
                to_json(&view)
            }
            ConsoleCommand::End(id) => {
                if self.manager.end(&id) {
                    format!("ended {}", id)
                } else {
                    return Err(SessionError::SessionNotFound(id));
                }
            }
            ConsoleCommand::List => {
                let ids = self.manager.ids();
                if ids.is_empty() {
                    "no live sessions".to_string()
                } else {
                    ids.join("\n")
                }
            }
            ConsoleCommand::Sweep => {
                format!("evicted {}", self.manager.sweep(self.session_ttl))
            }
            ConsoleCommand::Help => HELP.to_string(),
            ConsoleCommand::Quit => String::new(),
        };
        Ok(reply)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unrenderable: {}>", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            ConsoleCommand::parse("start 2048"),
            Ok(ConsoleCommand::Start("2048".to_string()))
        );
        assert_eq!(
            ConsoleCommand::parse("move bat_123456 2 3"),
            Ok(ConsoleCommand::Move {
                id: "bat_123456".to_string(),
                payload: "2 3".to_string()
            })
        );
        assert_eq!(ConsoleCommand::parse("  LIST "), Ok(ConsoleCommand::List));
        assert_eq!(ConsoleCommand::parse(""), Err(ConsoleError::Empty));
        assert_eq!(
            ConsoleCommand::parse("move tic_1"),
            Err(ConsoleError::MissingArgument {
                command: "move",
                argument: "payload"
            })
        );
        assert!(matches!(
            ConsoleCommand::parse("dance"),
            Err(ConsoleError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_start_move_end_flow() {
        let console = Console::new(SessionManager::with_seed(5), "tester", Duration::from_secs(1800));
        let reply = console
            .execute(ConsoleCommand::Start("snake".to_string()))
            .expect("start");
        let id = reply
            .split_whitespace()
            .nth(1)
            .expect("id in reply")
            .to_string();

        let moved = console
            .execute(ConsoleCommand::Move {
                id: id.clone(),
                payload: "up".to_string(),
            })
            .expect("legal move");
        assert!(moved.starts_with("continue"));

        assert_eq!(
            console.execute(ConsoleCommand::Move {
                id: id.clone(),
                payload: "diagonal".to_string(),
            }),
            Err(SessionError::Move(arcade_games::MoveError::UnknownAction(
                "diagonal".to_string()
            )))
        );

        assert!(console.execute(ConsoleCommand::End(id.clone())).is_ok());
        assert_eq!(
            console.execute(ConsoleCommand::Show(id.clone())),
            Err(SessionError::SessionNotFound(id))
        );
    }
}
