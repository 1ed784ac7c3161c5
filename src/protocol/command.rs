//! Command lines typed at the prompt
// (c) 2026 ftpc contributors

use std::{fmt::Display, str::FromStr};

/// Shown to the user when a command line cannot be parsed
pub const USAGE: &str = "Invalid command. Try: put [file], get [file], ls, or quit";

/// A parsed command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Upload a local file
    Put(String),
    /// Download a remote file
    Get(String),
    /// List the remote directory
    List,
    /// End the session
    Quit,
}

/// Why a command line was refused
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCommand {
    /// Nothing but whitespace
    #[error("{}", USAGE)]
    Empty,
    /// A known verb with the wrong number of arguments
    #[error("{verb}: wrong number of arguments. {}", USAGE)]
    WrongArity {
        /// The verb as typed
        verb: String,
    },
    /// Not a verb we know
    #[error("{verb}: unknown command. {}", USAGE)]
    Unknown {
        /// The verb as typed
        verb: String,
    },
}

impl FromStr for Command {
    type Err = InvalidCommand;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            ["put", file] => Ok(Command::Put((*file).to_string())),
            ["get", file] => Ok(Command::Get((*file).to_string())),
            ["ls"] => Ok(Command::List),
            ["quit"] => Ok(Command::Quit),
            [] => Err(InvalidCommand::Empty),
            [verb @ ("put" | "get" | "ls" | "quit"), ..] => Err(InvalidCommand::WrongArity {
                verb: (*verb).to_string(),
            }),
            [verb, ..] => Err(InvalidCommand::Unknown {
                verb: (*verb).to_string(),
            }),
        }
    }
}

impl Command {
    /// The verb that selects this command
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Put(_) => "put",
            Command::Get(_) => "get",
            Command::List => "ls",
            Command::Quit => "quit",
        }
    }

    /// The filename argument, if this command has one
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        match self {
            Command::Put(f) | Command::Get(f) => Some(f),
            Command::List | Command::Quit => None,
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.filename() {
            Some(file) => write!(f, "{} {file}", self.verb()),
            None => write!(f, "{}", self.verb()),
        }
    }
}
