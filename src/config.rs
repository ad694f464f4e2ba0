use clap::Parser;

pub const DEFAULT_WIDTH: usize = 10;
const GOLDEN_RATIO: f64 = 1.618;
const MINE_DENSITY: f64 = 3.0 / 20.0;

#[derive(Parser, Debug, Default)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
pub struct Cli {
    /// Board width in tiles
    #[arg(short, long)]
    pub width: Option<usize>,

    /// Board height in tiles, defaults to width times the golden ratio
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// Number of mines, defaults to 15% of the board
    #[arg(short, long)]
    pub mines: Option<usize>,

    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
}

impl GameConfig {
    /// Fills in whatever was not given, deriving height from width and mines from the area.
    ///
    /// Oversized values saturate rather than wrap and are left for the board to reject.
    /// A derived mine count is never below one.
    pub fn resolve(width: Option<usize>, height: Option<usize>, mines: Option<usize>) -> GameConfig {
        let width = width.unwrap_or(DEFAULT_WIDTH);
        let height = height.unwrap_or_else(|| (GOLDEN_RATIO * width as f64).round() as usize);
        let mines = mines.unwrap_or_else(|| {
            let area = width.saturating_mul(height);
            ((MINE_DENSITY * area as f64).round() as usize).max(1)
        });
        GameConfig { width, height, mines }
    }
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig::resolve(None, None, None)
    }
}

impl From<&Cli> for GameConfig {
    fn from(cli: &Cli) -> GameConfig {
        GameConfig::resolve(cli.width, cli.height, cli.mines)
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use crate::{Board, Game, MinesweeperError};

    #[test]
    fn defaults_match_classic_board() {
        assert_eq!(GameConfig::default(), GameConfig { width: 10, height: 16, mines: 24 });
    }

    #[test]
    fn derived_values_follow_width() {
        assert_eq!(GameConfig::resolve(Some(20), None, None), GameConfig { width: 20, height: 32, mines: 96 });
        assert_eq!(GameConfig::resolve(Some(5), Some(5), None), GameConfig { width: 5, height: 5, mines: 4 });
        assert_eq!(GameConfig::resolve(None, None, Some(3)), GameConfig { width: 10, height: 16, mines: 3 });
    }

    #[test]
    fn narrow_board_still_gets_a_mine() {
        let config = GameConfig::resolve(Some(1), None, None);
        assert_eq!(config, GameConfig { width: 1, height: 2, mines: 1 });
        assert!(Game::new(config.width, config.height, config.mines).is_ok());
    }

    #[test]
    fn huge_width_is_rejected_by_the_board() {
        let config = GameConfig::resolve(Some(1usize << 33), None, None);
        assert!(config.height > config.width);
        assert!(matches!(
            Board::new(config.width, config.height, config.mines),
            Err(MinesweeperError::InvalidConfiguration { .. })
        ));

        let config = GameConfig::resolve(Some(usize::MAX), Some(usize::MAX), None);
        assert!(config.mines >= 1);
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from(["sweeper", "-w", "8", "-H", "9", "--mines", "10", "--seed", "42"]).unwrap();
        assert_eq!(GameConfig::from(&cli), GameConfig { width: 8, height: 9, mines: 10 });
        assert_eq!(cli.seed, Some(42));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
