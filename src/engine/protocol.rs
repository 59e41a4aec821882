//! Commands of the line-oriented text protocol the engine speaks on stdin.

use crate::engine::ComputerSide;

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    Id,
    IsReady,
    NewGame {
        computer: Option<ComputerSide>,
    },
    SetPosition {
        notation: String,
    },
    SetOption {
        option: EngineOption,
        value: usize,
    },
    Move {
        request: String,
    },
    Go,
    Moves,
    Forced,
    Display,
    Resign,
    Quit,
    Unknown(String),
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum EngineOption {
    Difficulty,
    TableCapacity,
}

fn parse_setoption(parts: &[&str]) -> Command {
    if parts.len() > 3 && parts[1] == "name" {
        let name_end = parts
            .iter()
            .position(|&x| x == "value")
            .unwrap_or(parts.len());
        let option = match parts[2..name_end].join(" ").as_str() {
            "Difficulty" => EngineOption::Difficulty,
            "TableCapacity" => EngineOption::TableCapacity,
            _ => return Command::Unknown(parts.join(" ")),
        };
        match parts
            .get(name_end + 1)
            .and_then(|value| value.parse::<usize>().ok())
        {
            Some(value) => Command::SetOption { option, value },
            None => Command::Unknown(parts.join(" ")),
        }
    } else {
        Command::Unknown(parts.join(" "))
    }
}

fn parse_newgame(parts: &[&str]) -> Command {
    match parts.get(1) {
        None => Command::NewGame { computer: None },
        Some(side) => match ComputerSide::try_from(*side) {
            Ok(side) => Command::NewGame {
                computer: Some(side),
            },
            Err(_) => Command::Unknown(parts.join(" ")),
        },
    }
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();

        if parts.is_empty() {
            return Self::Unknown(input.to_string());
        }

        match parts[0] {
            "id" => Self::Id,
            "isready" => Self::IsReady,
            "newgame" => parse_newgame(&parts),
            "position" if parts.len() > 1 => Self::SetPosition {
                notation: parts[1..].join(" "),
            },
            "setoption" => parse_setoption(&parts),
            "move" if parts.len() == 2 => Self::Move {
                request: parts[1].to_string(),
            },
            "go" => Self::Go,
            "moves" => Self::Moves,
            "forced" => Self::Forced,
            "d" => Self::Display,
            "resign" => Self::Resign,
            "quit" => Self::Quit,
            _ => Self::Unknown(input.trim().to_string()),
        }
    }
}
