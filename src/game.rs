use std::fmt;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{info, trace};

use crate::board::Board;
use crate::error::{MinesweeperError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ready,
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOutcome {
    Flagged,
    Unflagged,
    NoChange,
}

/// A single session: the board plus the player-facing counters and clock.
pub struct Game<R = StdRng> {
    board: Board,
    rng: R,
    mines_remaining: i64,
    tiles_remaining: usize,
    status: GameStatus,
    started_at: Option<Instant>,
    finished_after: Option<Duration>,
    exploded: Option<(usize, usize)>,
}

impl Game<StdRng> {
    pub fn new(width: usize, height: usize, mine_total: usize) -> Result<Game<StdRng>> {
        Game::with_rng(width, height, mine_total, StdRng::from_entropy())
    }

    pub fn seeded(width: usize, height: usize, mine_total: usize, seed: u64) -> Result<Game<StdRng>> {
        Game::with_rng(width, height, mine_total, StdRng::seed_from_u64(seed))
    }

    /// Plays on a board whose mines are already laid.
    ///
    /// Release builds accept an unlaid board too, in which case the first reveal lays it
    /// from a fixed zero seed. Use [`Game::seeded`] for varied layouts.
    pub fn from_board(board: Board) -> Game<StdRng> {
        debug_assert!(board.is_laid(), "from_board expects a laid board");
        Game::from_parts(board, StdRng::seed_from_u64(0))
    }
}

impl<R: RngCore> Game<R> {
    pub fn with_rng(width: usize, height: usize, mine_total: usize, rng: R) -> Result<Game<R>> {
        let board = Board::new(width, height, mine_total)?;
        Ok(Game::from_parts(board, rng))
    }

    fn from_parts(board: Board, rng: R) -> Game<R> {
        let tiles_remaining = board.area() - board.mine_total();
        let mines_remaining = board.mine_total() as i64;
        Game {
            board,
            rng,
            mines_remaining,
            tiles_remaining,
            status: GameStatus::Ready,
            started_at: None,
            finished_after: None,
            exploded: None,
        }
    }

    pub fn flag(&mut self, row: usize, col: usize) -> Result<FlagOutcome> {
        self.check_not_over()?;
        let tile = self.board.tile_mut(row, col)?;
        if tile.is_revealed {
            return Ok(FlagOutcome::NoChange);
        }
        tile.toggle_flag();
        let outcome = if tile.is_flagged {
            self.mines_remaining -= 1;
            FlagOutcome::Flagged
        } else {
            self.mines_remaining += 1;
            FlagOutcome::Unflagged
        };
        self.start_clock();
        Ok(outcome)
    }

    pub fn reveal(&mut self, row: usize, col: usize) -> Result<RevealOutcome> {
        self.check_not_over()?;
        let safe_index = self.board.index_of(row, col)?;
        if !self.board.is_laid() {
            self.board.lay_mines(safe_index, &mut self.rng)?;
        }
        self.start_clock();

        let before = self.tiles_remaining;
        if self.cascade(row, col) {
            self.lose(row, col);
            return Ok(RevealOutcome::Lost);
        }
        if self.tiles_remaining == 0 {
            self.win();
            return Ok(RevealOutcome::Won);
        }
        Ok(if self.tiles_remaining < before {
            RevealOutcome::Revealed
        } else {
            RevealOutcome::NoChange
        })
    }

    /// Flood fill from one tile with an explicit stack, returning whether a mine was hit.
    /// Only zero-count tiles push their neighbours, so a mine is only ever reached as the root.
    fn cascade(&mut self, row: usize, col: usize) -> bool {
        let mut pending = vec![(row, col)];
        let mut opened = 0usize;
        while let Some((r, c)) = pending.pop() {
            let index = r * self.board.width() + c;
            let tile = &mut self.board.tiles_mut()[index];
            if tile.is_revealed || tile.is_flagged {
                continue;
            }
            if tile.reveal() {
                return true;
            }
            self.tiles_remaining -= 1;
            opened += 1;
            if tile.adjacent_mines == 0 {
                pending.extend(self.board.neighbors(r, c));
            }
        }
        trace!(row, col, opened, "cascade finished");
        false
    }

    fn start_clock(&mut self) {
        if self.status == GameStatus::Ready {
            self.status = GameStatus::Playing;
            self.started_at = Some(Instant::now());
        }
    }

    fn stop_clock(&mut self) {
        self.finished_after = Some(self.started_at.map(|start| start.elapsed()).unwrap_or_default());
    }

    fn win(&mut self) {
        self.stop_clock();
        self.status = GameStatus::Won;
        info!(millis = self.elapsed_millis() as u64, "board cleared");
    }

    fn lose(&mut self, row: usize, col: usize) {
        self.stop_clock();
        self.status = GameStatus::Lost;
        self.exploded = Some((row, col));
        for tile in self.board.tiles_mut().iter_mut().filter(|tile| tile.is_mine) {
            tile.is_revealed = true;
        }
        info!(row, col, "mine revealed");
    }

    fn check_not_over(&self) -> Result<()> {
        if self.is_over() {
            Err(MinesweeperError::ActionAfterGameOver)
        } else {
            Ok(())
        }
    }
}

impl<R> Game<R> {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_started(&self) -> bool {
        self.status != GameStatus::Ready
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    /// Mines minus flags placed; negative once the player over-flags.
    pub fn mines_remaining(&self) -> i64 {
        self.mines_remaining
    }

    pub fn tiles_remaining(&self) -> usize {
        self.tiles_remaining
    }

    pub fn exploded(&self) -> Option<(usize, usize)> {
        self.exploded
    }

    /// Zero before the first action, live while playing, frozen once the game ends.
    pub fn elapsed(&self) -> Duration {
        match (self.finished_after, self.started_at) {
            (Some(frozen), _) => frozen,
            (None, Some(start)) => start.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }

    pub fn elapsed_millis(&self) -> u128 {
        self.elapsed().as_millis()
    }

    pub fn solve_time(&self) -> Option<Duration> {
        match self.status {
            GameStatus::Won => self.finished_after,
            _ => None,
        }
    }
}

impl<R> fmt::Display for Game<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "time: {}   mines left: {}    tiles left: {}",
            self.elapsed_millis(),
            self.mines_remaining,
            self.tiles_remaining
        )?;
        write!(f, "{}", self.board)
    }
}
