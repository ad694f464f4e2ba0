use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MinesweeperError {
    #[error("Invalid configuration: {width}x{height} board with {mines} mines")]
    InvalidConfiguration {
        width: usize,
        height: usize,
        mines: usize,
    },
    #[error("Position ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },
    #[error("Mines have already been laid on this board")]
    DoubleLay,
    #[error("Game already ended, no new moves are accepted")]
    ActionAfterGameOver,
}

pub type Result<T> = std::result::Result<T, MinesweeperError>;
