use gridsel_core::{Block, CellCoords, KeyboardState, Notify, SelectionMode};
use thiserror::Error;

/// Script line that could not be parsed
#[derive(Debug, Error, PartialEq)]
#[error("line {line}: {reason}")]
pub struct CommandError {
    pub line: usize,
    pub reason: String,
}

/// Selection commands understood by the script runner
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Resize the grid
    Size { rows: usize, cols: usize },
    Mode(SelectionMode),
    Row { row: usize, kbd: KeyboardState },
    Col { col: usize, kbd: KeyboardState },
    Block { block: Block, kbd: KeyboardState },
    All,
    /// Remove a block selected exactly as given
    Deselect { block: Block, kbd: KeyboardState },
    /// Remove the cells of a region from whatever covers them
    Carve { block: Block, kbd: KeyboardState },
    Clear,
    /// Extend the current block, as if dragging when `drag` is set
    Extend {
        start: CellCoords,
        end: CellCoords,
        drag: bool,
        kbd: KeyboardState,
    },
    /// Select the cell under a window pixel
    Click { x: i32, y: i32, kbd: KeyboardState },
    Anchor(CellCoords),
    InsertRows { pos: usize, count: usize },
    DeleteRows { pos: usize, count: usize },
    InsertCols { pos: usize, count: usize },
    DeleteCols { pos: usize, count: usize },
    Scroll { x: i32, y: i32 },
    End,
    Cancel,
    Show,
}

impl Command {
    /// Event flavour used when the command selects something
    pub fn notify(&self) -> Notify {
        match self {
            Command::Extend { drag: true, .. } => Notify::Selecting,
            _ => Notify::Selected,
        }
    }
}

/// Parse a whole script, one command per line.
///
/// Blank lines and `#` comments are skipped.
pub fn parse_script(input: &str) -> Result<Vec<Command>, CommandError> {
    let mut commands = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let command = parse_command(line).map_err(|reason| CommandError {
            line: index + 1,
            reason,
        })?;
        commands.push(command);
    }
    Ok(commands)
}

/// Parse a single command.
///
/// Supported commands:
/// - `size <rows> <cols>`
/// - `mode <cells|rows|columns|rows_or_columns|single_block|disabled>`
/// - `row <r>`, `col <c>`, `block <r1> <c1> <r2> <c2>`, `all`
/// - `deselect <r1> <c1> <r2> <c2>`, `carve <r1> <c1> <r2> <c2>`, `clear`
/// - `extend <r1> <c1> <r2> <c2> [drag]`, `click <x> <y>`, `anchor <r> <c>`
/// - `insert-rows|delete-rows|insert-cols|delete-cols <pos> <count>`
/// - `scroll <x> <y>`, `end`, `cancel`, `show`
///
/// Modifier keys are given as trailing `+shift`, `+ctrl`, `+alt`, `+meta`.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words: Vec<&str> = line.split_whitespace().collect();
    let kbd = take_modifiers(&mut words)?;
    let Some((&name, args)) = words.split_first() else {
        return Err("empty command".to_string());
    };

    let command = match name {
        "size" => {
            let [rows, cols] = numbers::<usize, 2>(name, args)?;
            Command::Size { rows, cols }
        }
        "mode" => {
            let [mode] = words_n::<1>(name, args)?;
            Command::Mode(mode.parse::<SelectionMode>().map_err(|e| e.to_string())?)
        }
        "row" => {
            let [row] = numbers::<usize, 1>(name, args)?;
            Command::Row { row, kbd }
        }
        "col" => {
            let [col] = numbers::<usize, 1>(name, args)?;
            Command::Col { col, kbd }
        }
        "block" => Command::Block {
            block: block_arg(name, args)?,
            kbd,
        },
        "all" => no_args(name, args, Command::All)?,
        "deselect" => Command::Deselect {
            block: block_arg(name, args)?,
            kbd,
        },
        "carve" => Command::Carve {
            block: block_arg(name, args)?,
            kbd,
        },
        "clear" => no_args(name, args, Command::Clear)?,
        "extend" => {
            let (args, drag) = match args.split_last() {
                Some((&"drag", rest)) => (rest, true),
                _ => (args, false),
            };
            let [r1, c1, r2, c2] = numbers::<usize, 4>(name, args)?;
            Command::Extend {
                start: CellCoords::new(r1, c1),
                end: CellCoords::new(r2, c2),
                drag,
                kbd,
            }
        }
        "click" => {
            let [x, y] = numbers::<i32, 2>(name, args)?;
            Command::Click { x, y, kbd }
        }
        "anchor" => {
            let [row, col] = numbers::<usize, 2>(name, args)?;
            Command::Anchor(CellCoords::new(row, col))
        }
        "insert-rows" => {
            let [pos, count] = numbers::<usize, 2>(name, args)?;
            Command::InsertRows { pos, count }
        }
        "delete-rows" => {
            let [pos, count] = numbers::<usize, 2>(name, args)?;
            Command::DeleteRows { pos, count }
        }
        "insert-cols" => {
            let [pos, count] = numbers::<usize, 2>(name, args)?;
            Command::InsertCols { pos, count }
        }
        "delete-cols" => {
            let [pos, count] = numbers::<usize, 2>(name, args)?;
            Command::DeleteCols { pos, count }
        }
        "scroll" => {
            let [x, y] = numbers::<i32, 2>(name, args)?;
            Command::Scroll { x, y }
        }
        "end" => no_args(name, args, Command::End)?,
        "cancel" => no_args(name, args, Command::Cancel)?,
        "show" => no_args(name, args, Command::Show)?,
        _ => return Err(format!("unknown command '{}'", name)),
    };
    Ok(command)
}

fn take_modifiers(words: &mut Vec<&str>) -> Result<KeyboardState, String> {
    let mut kbd = KeyboardState::default();
    while let Some(modifier) = words.last().copied().and_then(|word| word.strip_prefix('+')) {
        match modifier {
            "shift" => kbd.shift = true,
            "ctrl" => kbd.ctrl = true,
            "alt" => kbd.alt = true,
            "meta" => kbd.meta = true,
            _ => return Err(format!("unknown modifier '+{}'", modifier)),
        }
        words.pop();
    }
    Ok(kbd)
}

fn words_n<'a, const N: usize>(name: &str, args: &[&'a str]) -> Result<[&'a str; N], String> {
    <[&str; N]>::try_from(args)
        .map_err(|_| format!("'{}' takes {} arguments, got {}", name, N, args.len()))
}

fn numbers<T: std::str::FromStr, const N: usize>(name: &str, args: &[&str]) -> Result<[T; N], String> {
    let words: [&str; N] = words_n(name, args)?;
    let mut values = Vec::with_capacity(N);
    for word in words {
        let value = word
            .parse::<T>()
            .map_err(|_| format!("'{}': invalid number '{}'", name, word))?;
        values.push(value);
    }
    values
        .try_into()
        .map_err(|_| format!("'{}' takes {} arguments", name, N))
}

fn block_arg(name: &str, args: &[&str]) -> Result<Block, String> {
    let [r1, c1, r2, c2] = numbers::<usize, 4>(name, args)?;
    Ok(Block::new(r1, c1, r2, c2))
}

fn no_args(name: &str, args: &[&str], command: Command) -> Result<Command, String> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(format!("'{}' takes no arguments", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block() {
        assert_eq!(
            parse_command("block 4 6 2 1"),
            Ok(Command::Block {
                block: Block::new(2, 1, 4, 6),
                kbd: KeyboardState::default(),
            })
        );
    }

    #[test]
    fn test_parse_modifiers() {
        let cmd = parse_command("row 3 +ctrl +shift").unwrap();
        assert_eq!(
            cmd,
            Command::Row {
                row: 3,
                kbd: KeyboardState {
                    shift: true,
                    ctrl: true,
                    ..Default::default()
                },
            }
        );
        assert!(parse_command("row 3 +hyper").is_err());
    }

    #[test]
    fn test_parse_extend_drag() {
        let cmd = parse_command("extend 1 1 3 4 drag").unwrap();
        assert_eq!(cmd.notify(), Notify::Selecting);
        assert_eq!(
            cmd,
            Command::Extend {
                start: CellCoords::new(1, 1),
                end: CellCoords::new(3, 4),
                drag: true,
                kbd: KeyboardState::default(),
            }
        );
        assert_eq!(parse_command("extend 0 0 1 1").unwrap().notify(), Notify::Selected);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(
            parse_command("mode rows-or-columns"),
            Ok(Command::Mode(SelectionMode::RowsOrColumns))
        );
        assert!(parse_command("mode diagonal").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("block 1 2 3").is_err());
        assert!(parse_command("row x").is_err());
        assert!(parse_command("clear now").is_err());
        assert!(parse_command("scroll -5 10").is_ok());
        assert!(parse_command("paint 1 2").is_err());
    }

    #[test]
    fn test_parse_script_reports_line() {
        let script = "# setup\nsize 10 10\n\nblock 0 0 1 1  # first\nbogus\n";
        let err = parse_script(script).unwrap_err();
        assert_eq!(err.line, 5);
        assert_eq!(err.to_string(), "line 5: unknown command 'bogus'");

        let commands = parse_script("size 10 10\nall\nshow\n").unwrap();
        assert_eq!(
            commands,
            vec![Command::Size { rows: 10, cols: 10 }, Command::All, Command::Show]
        );
    }
}
