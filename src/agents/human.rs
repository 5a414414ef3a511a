//! Text-mode human player.
//!
//! Commands, one per line:
//!
//! ```text
//! move <unit> <x> <y>
//! attack <unit> <x> <y> <target>
//! end
//! resign
//! list
//! ```
//!
//! Unit ids may be written with or without a leading `#`. Input that does
//! not parse, or that names an illegal action, is rejected and the prompt
//! repeats. End of input resigns.

use std::io::{BufRead, Stdin, StdinLock, Stdout, Write};

use thiserror::Error;
use tracing::warn;

use crate::core::{Action, Board, GameError, Pos, Team, UnitId};
use crate::game::Player;
use crate::rules::{team_actions, validate};

/// A command line that could not be understood.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command {0:?}")]
    Unknown(String),

    #[error("{command} expects {expected} arguments")]
    Arity { command: &'static str, expected: usize },

    #[error("invalid number {0:?}")]
    Number(String),
}

/// A parsed input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Play(Action),
    List,
}

fn number<T: std::str::FromStr>(word: &str) -> Result<T, CommandError> {
    word.trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::Number(word.to_string()))
}

/// Parse one line for `team`.
pub fn parse_command(line: &str, team: Team) -> Result<Command, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = words.split_first() else {
        return Err(CommandError::Empty);
    };
    let expect = |command: &'static str, expected: usize| {
        if args.len() == expected {
            Ok(())
        } else {
            Err(CommandError::Arity { command, expected })
        }
    };

    match head.to_ascii_lowercase().as_str() {
        "move" | "m" => {
            expect("move", 3)?;
            let to = Pos::new(number(args[1])?, number(args[2])?);
            Ok(Command::Play(Action::move_to(team, UnitId::new(number(args[0])?), to)))
        }
        "attack" | "a" => {
            expect("attack", 4)?;
            let to = Pos::new(number(args[1])?, number(args[2])?);
            let target = UnitId::new(number(args[3])?);
            Ok(Command::Play(Action::attack(team, UnitId::new(number(args[0])?), to, target)))
        }
        "end" | "e" => {
            expect("end", 0)?;
            Ok(Command::Play(Action::turn_end(team)))
        }
        "resign" => {
            expect("resign", 0)?;
            Ok(Command::Play(Action::resign(team)))
        }
        "list" | "l" => Ok(Command::List),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Reads commands from `input` and writes prompts and the board to
/// `output`.
pub struct HumanPlayer<R: BufRead, W: Write> {
    input: R,
    output: W,
    name: String,
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            name: "Human".to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl HumanPlayer<StdinLock<'static>, Stdout> {
    /// A player on the process's terminal.
    pub fn stdio() -> Self {
        let stdin: Stdin = std::io::stdin();
        Self::new(stdin.lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Player for HumanPlayer<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn make_action(&mut self, board: &Board, team: Team, _turn_start: bool, _game_start: bool) -> Result<Action, GameError> {
        write!(self.output, "{board}")?;
        loop {
            write!(self.output, "{team}> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(Action::resign(team));
            }

            match parse_command(&line, team) {
                Ok(Command::Play(action)) => match validate(board, team, &action) {
                    Ok(()) => return Ok(action),
                    Err(err) => {
                        warn!(input = line.trim(), %err, "rejected action");
                        writeln!(self.output, "illegal: {err}")?;
                    }
                },
                Ok(Command::List) => {
                    for action in team_actions(board, team) {
                        writeln!(self.output, "  {action}")?;
                    }
                }
                Err(CommandError::Empty) => {}
                Err(err) => {
                    warn!(input = line.trim(), %err, "unparsable command");
                    writeln!(self.output, "{err}")?;
                }
            }
        }
    }
}
