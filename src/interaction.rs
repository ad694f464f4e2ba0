use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reveal { row: usize, col: usize },
    Flag { row: usize, col: usize },
    Quit,
}

fn move_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:(f|flag|r|reveal)\s+)?(-?)(\d+)\s*[,\s]\s*(-?)(\d+)\s*$")
            .expect("move pattern is valid")
    })
}

/// Reads one line of player input.
///
/// `row,col` or `row col` reveals, `-row,-col` and `f row col` flag, `q` quits.
/// Coordinates are not checked against any board here.
pub fn parse_command(input: &str) -> Option<Command> {
    let trimmed = input.trim();
    if ["q", "quit", "exit"].iter().any(|word| trimmed.eq_ignore_ascii_case(word)) {
        return Some(Command::Quit);
    }

    let cap = move_pattern().captures(trimmed)?;
    let row: usize = cap[3].parse().ok()?;
    let col: usize = cap[5].parse().ok()?;
    let signs = (!cap[2].is_empty(), !cap[4].is_empty());
    let verb = cap.get(1).map(|verb| verb.as_str().to_ascii_lowercase());

    match (verb.as_deref(), signs) {
        (None | Some("r") | Some("reveal"), (false, false)) => Some(Command::Reveal { row, col }),
        (None, (true, true)) | (Some("f") | Some("flag"), (false, false)) => Some(Command::Flag { row, col }),
        _ => None,
    }
}

#[cfg(test)]
mod interaction_tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reads_reveal_forms() {
        assert_eq!(parse_command("3,4"), Some(Command::Reveal { row: 3, col: 4 }));
        assert_eq!(parse_command("  3 , 4\n"), Some(Command::Reveal { row: 3, col: 4 }));
        assert_eq!(parse_command("3 4"), Some(Command::Reveal { row: 3, col: 4 }));
        assert_eq!(parse_command("reveal 0 9"), Some(Command::Reveal { row: 0, col: 9 }));
        assert_eq!(parse_command("R 1,2"), Some(Command::Reveal { row: 1, col: 2 }));
    }

    #[test]
    fn reads_flag_forms() {
        assert_eq!(parse_command("-3,-4"), Some(Command::Flag { row: 3, col: 4 }));
        assert_eq!(parse_command("-0,-7"), Some(Command::Flag { row: 0, col: 7 }));
        assert_eq!(parse_command("f 3 4"), Some(Command::Flag { row: 3, col: 4 }));
        assert_eq!(parse_command("flag 12,1"), Some(Command::Flag { row: 12, col: 1 }));
    }

    #[test]
    fn reads_quit() {
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("QUIT\n"), Some(Command::Quit));
        assert_eq!(parse_command("exit"), Some(Command::Quit));
    }

    #[test]
    fn rejects_noise() {
        for input in ["", "hello", "3", "3,4,5", "f -3 -4", "3,-4", "-3,4", "-3 4", "chord 1 1", "1.5,2", "99999999999999999999999,1"] {
            assert_eq!(parse_command(input), None, "accepted {:?}", input);
        }
    }

    proptest! {
        #[test]
        fn any_coordinate_pair_parses(row in 0..10_000usize, col in 0..10_000usize) {
            prop_assert_eq!(parse_command(&format!("{},{}", row, col)), Some(Command::Reveal { row, col }));
            prop_assert_eq!(parse_command(&format!("-{},-{}", row, col)), Some(Command::Flag { row, col }));
            prop_assert_eq!(parse_command(&format!("flag {} {}", row, col)), Some(Command::Flag { row, col }));
        }
    }
}
