use std::fmt;

use itertools::{iproduct, Itertools};
use rand::RngCore;
use tracing::debug;

use crate::error::{MinesweeperError, Result};
use crate::random::balanced_random;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tile {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    /// Only meaningful on non-mine tiles, fixed once the mines are laid.
    pub adjacent_mines: u8,
}

impl Tile {
    pub fn toggle_flag(&mut self) {
        self.is_flagged = !self.is_flagged;
    }

    /// Marks the tile revealed, returning whether it was a mine.
    pub fn reveal(&mut self) -> bool {
        self.is_revealed = true;
        self.is_mine
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_revealed, self.is_flagged, self.is_mine) {
            (false, false, _) => write!(f, "."),
            (false, true, _) => write!(f, "<"),
            (true, _, true) => write!(f, "X"),
            (true, _, false) if self.adjacent_mines == 0 => write!(f, " "),
            (true, _, false) => write!(f, "{}", self.adjacent_mines),
        }
    }
}

/// Row-major grid of tiles. Mines are laid once, after the first move is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    mine_total: usize,
    tiles: Vec<Tile>,
    laid: bool,
}

impl Board {
    pub fn new(width: usize, height: usize, mine_total: usize) -> Result<Board> {
        let area = validated_area(width, height, mine_total)?;
        Ok(Board {
            width,
            height,
            mine_total,
            tiles: vec![Tile::default(); area],
            laid: false,
        })
    }

    /// Builds an already-laid board with mines at the given linear indices.
    pub fn with_mines(width: usize, height: usize, mine_indices: &[usize]) -> Result<Board> {
        let mine_indices: Vec<usize> = mine_indices.iter().copied().unique().collect();
        let mut board = Board::new(width, height, mine_indices.len())?;
        for &index in &mine_indices {
            board.position_of(index)?;
            board.tiles[index].is_mine = true;
        }
        board.count_adjacent_mines();
        board.laid = true;
        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn area(&self) -> usize {
        self.tiles.len()
    }

    pub fn mine_total(&self) -> usize {
        self.mine_total
    }

    pub fn is_laid(&self) -> bool {
        self.laid
    }

    pub fn index_of(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.height || col >= self.width {
            return Err(MinesweeperError::OutOfBounds { row, col });
        }
        Ok(row * self.width + col)
    }

    pub fn position_of(&self, index: usize) -> Result<(usize, usize)> {
        if index >= self.area() {
            return Err(MinesweeperError::OutOfBounds {
                row: index / self.width,
                col: index % self.width,
            });
        }
        Ok((index / self.width, index % self.width))
    }

    pub fn tile(&self, row: usize, col: usize) -> Result<&Tile> {
        let index = self.index_of(row, col)?;
        Ok(&self.tiles[index])
    }

    pub fn tile_mut(&mut self, row: usize, col: usize) -> Result<&mut Tile> {
        let index = self.index_of(row, col)?;
        Ok(&mut self.tiles[index])
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// The up-to-8 grid neighbours of a position, clamped at the edges.
    pub fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
        let rows = row.saturating_sub(1)..=(row + 1).min(self.height - 1);
        let cols = col.saturating_sub(1)..=(col + 1).min(self.width - 1);
        iproduct!(rows, cols).filter(move |&position| position != (row, col))
    }

    /// Randomly places `mine_total` mines anywhere except `safe_index`, then fills in
    /// the adjacency counts.
    pub fn lay_mines<R: RngCore + ?Sized>(&mut self, safe_index: usize, rng: &mut R) -> Result<()> {
        if self.laid {
            return Err(MinesweeperError::DoubleLay);
        }
        self.position_of(safe_index)?;

        // placeholder so the draw below can never pick the safe tile
        self.tiles[safe_index].is_mine = true;

        let range = self.area() as u32;
        let mut placed = 0;
        let mut draws = 0usize;
        while placed < self.mine_total {
            let index = balanced_random(rng, range) as usize;
            draws += 1;
            if !self.tiles[index].is_mine {
                self.tiles[index].is_mine = true;
                placed += 1;
            }
        }

        self.tiles[safe_index].is_mine = false;
        self.count_adjacent_mines();
        self.laid = true;

        debug!(
            mines = self.mine_total,
            safe_index, draws, "laid mines on {}x{} board", self.width, self.height
        );
        Ok(())
    }

    fn count_adjacent_mines(&mut self) {
        for (row, col) in iproduct!(0..self.height, 0..self.width) {
            let index = row * self.width + col;
            if self.tiles[index].is_mine {
                continue;
            }
            let count = self
                .neighbors(row, col)
                .filter(|&(r, c)| self.tiles[r * self.width + c].is_mine)
                .count();
            self.tiles[index].adjacent_mines = count as u8;
        }
    }
}

fn validated_area(width: usize, height: usize, mine_total: usize) -> Result<usize> {
    let invalid = MinesweeperError::InvalidConfiguration {
        width,
        height,
        mines: mine_total,
    };
    let area = width.checked_mul(height).ok_or(invalid)?;
    // the unbiased draw works on u32 raw values
    if width == 0 || height == 0 || area > u32::MAX as usize {
        return Err(invalid);
    }
    if mine_total == 0 || mine_total >= area {
        return Err(invalid);
    }
    Ok(area)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for col in 0..self.width {
            write!(f, "{:^3}", col)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "___".repeat(self.width))?;
        for (row, tiles) in self.tiles.chunks(self.width).enumerate() {
            for tile in tiles {
                write!(f, " {} ", tile)?;
            }
            writeln!(f, "|{}", row)?;
        }
        Ok(())
    }
}
