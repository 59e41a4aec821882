//! The engine puts all pieces together: it reads commands of a simple
//! line-oriented text protocol from the input stream, drives the [`Game`] and
//! writes responses to the output stream.
//!
//! [`Engine::run`] is the "main loop" of the engine. Malformed or illegal
//! input never stops the loop: it is reported as an `info string` line.

use std::io::{BufRead, Write};

use anyhow::bail;
use itertools::Itertools;

use crate::chess::core::{MoveRequest, Player};
use crate::engine::protocol::{Command, EngineOption};
use crate::search::transposition::DEFAULT_CAPACITY;
use crate::search::Difficulty;

pub mod game;
mod protocol;

pub use game::Game;

/// Which color the automated player controls.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ComputerSide {
    #[allow(missing_docs)]
    White,
    #[allow(missing_docs)]
    Black,
    /// Two humans play each other.
    None,
}

impl ComputerSide {
    /// Color of the automated player.
    #[must_use]
    pub const fn player(self) -> Option<Player> {
        match self {
            Self::White => Some(Player::White),
            Self::Black => Some(Player::Black),
            Self::None => None,
        }
    }
}

impl TryFrom<&str> for ComputerSide {
    type Error = anyhow::Error;

    fn try_from(side: &str) -> anyhow::Result<Self> {
        match side {
            "white" | "w" => Ok(Self::White),
            "black" | "b" => Ok(Self::Black),
            "none" => Ok(Self::None),
            _ => bail!("computer side should be 'white', 'black' or 'none', got '{side}'"),
        }
    }
}

/// Settings the engine starts with.
#[derive(Copy, Clone, Debug)]
pub struct Options {
    #[allow(missing_docs)]
    pub difficulty: Difficulty,
    #[allow(missing_docs)]
    pub computer: ComputerSide,
    /// Transposition table capacity in entries.
    pub table_capacity: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            computer: ComputerSide::Black,
            table_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// The Engine connects everything together and handles commands sent by the
/// user or a GUI, including I/O.
pub struct Engine<'a, R: BufRead, W: Write> {
    game: Game,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Engine<'a, R, W> {
    /// Creates a new instance of the engine with the starting position and
    /// provided I/O.
    #[must_use]
    pub fn new(options: Options, input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            game: Game::new(
                options.difficulty,
                options.table_capacity,
                options.computer.player(),
            ),
            input,
            output,
        }
    }

    /// Continuously reads the input stream and executes commands until "quit"
    /// is sent or the input ends.
    ///
    /// # Errors
    ///
    /// Only I/O failures are returned. Bad commands are reported to the output
    /// and skipped.
    pub fn run(&mut self) -> anyhow::Result<()> {
        // The computer might be playing White.
        self.reply_if_computer_turn()?;
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            let command = Command::parse(&line);
            tracing::debug!(?command, "received command");
            let result = match command {
                Command::Id => self.handle_id(),
                Command::IsReady => self.handle_isready(),
                Command::NewGame { computer } => self.handle_newgame(computer),
                Command::SetPosition { notation } => self.handle_position(&notation),
                Command::SetOption { option, value } => self.handle_setoption(&option, value),
                Command::Move { request } => self.handle_move(&request),
                Command::Go => self.handle_go(),
                Command::Moves => self.handle_moves(),
                Command::Forced => self.handle_forced(),
                Command::Display => self.handle_display(),
                Command::Resign => self.handle_resign(),
                Command::Quit => break,
                Command::Unknown(command) => {
                    writeln!(self.output, "info string unsupported command: {command}")?;
                    Ok(())
                },
            };
            if let Err(error) = result {
                tracing::warn!("{error:#}");
                writeln!(self.output, "info string {error:#}")?;
            }
            self.output.flush()?;
        }
        Ok(())
    }

    /// Identifies the engine.
    fn handle_id(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "id name {} {}",
            env!("CARGO_PKG_NAME"),
            crate::engine_version()
        )?;
        writeln!(self.output, "id author {}", env!("CARGO_PKG_AUTHORS"))?;
        writeln!(self.output, "idok")?;
        Ok(())
    }

    /// Syncs with the client by responding with `readyok`.
    fn handle_isready(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "readyok")?;
        Ok(())
    }

    fn handle_newgame(&mut self, computer: Option<ComputerSide>) -> anyhow::Result<()> {
        let computer = match computer {
            Some(side) => side.player(),
            None => self.game.computer(),
        };
        self.game.restart(computer);
        self.reply_if_computer_turn()
    }

    fn handle_position(&mut self, notation: &str) -> anyhow::Result<()> {
        self.game.setup(notation)?;
        self.report_outcome()?;
        self.reply_if_computer_turn()
    }

    fn handle_setoption(&mut self, option: &EngineOption, value: usize) -> anyhow::Result<()> {
        match option {
            EngineOption::Difficulty => {
                let level = u8::try_from(value)
                    .map_err(anyhow::Error::from)
                    .and_then(Difficulty::try_from)?;
                self.game.set_difficulty(level);
            },
            EngineOption::TableCapacity => self.game.set_table_capacity(value),
        }
        Ok(())
    }

    /// Plays a human move and lets the computer answer right away.
    fn handle_move(&mut self, request: &str) -> anyhow::Result<()> {
        let request = MoveRequest::try_from(request)?;
        let _ = self.game.play(&request)?;
        self.report_outcome()?;
        self.reply_if_computer_turn()
    }

    /// The computer plays for the side to move, whoever controls it.
    fn handle_go(&mut self) -> anyhow::Result<()> {
        let played = self.game.play_computer()?;
        writeln!(self.output, "bestmove {played}")?;
        self.report_outcome()
    }

    fn handle_moves(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "moves {}",
            self.game.position().generate_moves().iter().join(" ")
        )?;
        Ok(())
    }

    fn handle_forced(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "forced {}",
            self.game.position().forced_pieces().iter().join(" ")
        )?;
        Ok(())
    }

    fn handle_display(&mut self) -> anyhow::Result<()> {
        write!(self.output, "{:?}", self.game.position())?;
        Ok(())
    }

    fn handle_resign(&mut self) -> anyhow::Result<()> {
        let _ = self.game.resign()?;
        self.report_outcome()
    }

    fn reply_if_computer_turn(&mut self) -> anyhow::Result<()> {
        if self.game.is_computer_turn() {
            let played = self.game.play_computer()?;
            writeln!(self.output, "bestmove {played}")?;
            self.report_outcome()?;
        }
        Ok(())
    }

    fn report_outcome(&mut self) -> anyhow::Result<()> {
        if let Some(outcome) = self.game.outcome() {
            writeln!(self.output, "result {outcome}")?;
        }
        Ok(())
    }
}
