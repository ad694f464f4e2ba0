pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod interaction;
pub mod random;

use std::io::{self, BufRead, Write};

use rand::RngCore;
use tracing::warn;

pub use board::{Board, Tile};
pub use config::GameConfig;
pub use error::{MinesweeperError, Result};
pub use game::{FlagOutcome, Game, GameStatus, RevealOutcome};
pub use interaction::{parse_command, Command};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Won,
    Lost,
    Quit,
    EndOfInput,
}

/// Plays one game from line-oriented input, redrawing after every move that changed something.
pub fn run<R, I, O>(game: &mut Game<R>, input: I, output: &mut O) -> io::Result<SessionEnd>
where
    R: RngCore,
    I: BufRead,
    O: Write,
{
    writeln!(output, "{}", game)?;
    let mut lines = input.lines();
    loop {
        write!(output, "enter: row,col: ")?;
        output.flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(SessionEnd::EndOfInput),
        };

        let changed = match parse_command(&line) {
            None => {
                warn!(input = line.trim(), "unrecognised move");
                writeln!(output, "moves look like `row,col`, `-row,-col` or `f row col`; `q` quits")?;
                continue;
            }
            Some(Command::Quit) => return Ok(SessionEnd::Quit),
            Some(Command::Reveal { row, col }) => game.reveal(row, col).map(|outcome| outcome != RevealOutcome::NoChange),
            Some(Command::Flag { row, col }) => game.flag(row, col).map(|outcome| outcome != FlagOutcome::NoChange),
        };

        match changed {
            Ok(true) => writeln!(output, "{}", game)?,
            Ok(false) => {}
            Err(err) => {
                warn!(%err, "move rejected");
                writeln!(output, "{}", err)?;
            }
        }

        match game.status() {
            GameStatus::Won => {
                writeln!(output, "win!   time: {}", game.elapsed_millis())?;
                return Ok(SessionEnd::Won);
            }
            GameStatus::Lost => {
                writeln!(output, "loss!")?;
                return Ok(SessionEnd::Lost);
            }
            GameStatus::Ready | GameStatus::Playing => {}
        }
    }
}
