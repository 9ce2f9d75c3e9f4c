//! Keyboard navigation commands.

use super::Modifiers;
use crate::types::CellPoint;

/// Keys the grid reacts to, parsed from DOM `KeyboardEvent.key` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Escape,
    Tab,
    Enter,
    Char(char),
    Other,
}

impl Key {
    pub fn parse(key: &str) -> Self {
        match key {
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            "Enter" => Self::Enter,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }
}

/// A cursor movement, applied relative to a cell and clamped to bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Up(u32),
    Down(u32),
    Left(u32),
    Right(u32),
    RowStart,
    RowEnd,
    GridStart,
    GridEnd,
}

impl Motion {
    /// Target of the motion from `from`. `None` for an empty grid.
    pub fn apply(self, from: CellPoint, columns: u32, rows: u32) -> Option<CellPoint> {
        let last_col = columns.checked_sub(1)?;
        let last_row = rows.checked_sub(1)?;
        let col = from.col.min(last_col);
        let row = from.row.min(last_row);
        let (col, row) = match self {
            Self::Up(n) => (col, row.saturating_sub(n)),
            Self::Down(n) => (col, row.saturating_add(n).min(last_row)),
            Self::Left(n) => (col.saturating_sub(n), row),
            Self::Right(n) => (col.saturating_add(n).min(last_col), row),
            Self::RowStart => (0, row),
            Self::RowEnd => (last_col, row),
            Self::GridStart => (0, 0),
            Self::GridEnd => (last_col, last_row),
        };
        Some(CellPoint::new(col, row))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Move the active cell and select it alone.
    Move(Motion),
    /// Grow the cell rectangle from the anchor.
    Extend(Motion),
    Clear,
    SelectAll,
    /// Ask the host to start editing the active cell.
    Edit,
}

/// Map a key press to a command. `None` for keys the grid ignores.
pub fn key_command(key: Key, modifiers: Modifiers, page_rows: u32) -> Option<KeyCommand> {
    let motion = match key {
        Key::ArrowUp => Motion::Up(1),
        Key::ArrowDown => Motion::Down(1),
        Key::ArrowLeft => Motion::Left(1),
        Key::ArrowRight => Motion::Right(1),
        Key::Home if modifiers.command() => Motion::GridStart,
        Key::End if modifiers.command() => Motion::GridEnd,
        Key::Home => Motion::RowStart,
        Key::End => Motion::RowEnd,
        Key::PageUp => Motion::Up(page_rows.max(1)),
        Key::PageDown => Motion::Down(page_rows.max(1)),
        Key::Tab if modifiers.shift => return Some(KeyCommand::Move(Motion::Left(1))),
        Key::Tab => return Some(KeyCommand::Move(Motion::Right(1))),
        Key::Escape => return Some(KeyCommand::Clear),
        Key::Enter => return Some(KeyCommand::Edit),
        Key::Char('a' | 'A') if modifiers.command() => return Some(KeyCommand::SelectAll),
        Key::Char(_) | Key::Other => return None,
    };
    Some(if modifiers.shift {
        KeyCommand::Extend(motion)
    } else {
        KeyCommand::Move(motion)
    })
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        meta: false,
        alt: false,
    };
    const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        meta: false,
        alt: false,
    };
    const META: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        meta: true,
        alt: false,
    };

    #[test_case("ArrowUp", Key::ArrowUp)]
    #[test_case("PageDown", Key::PageDown)]
    #[test_case("a", Key::Char('a'))]
    #[test_case("Shift", Key::Other)]
    fn test_parse(raw: &str, expected: Key) {
        assert_eq!(Key::parse(raw), expected);
    }

    #[test_case(Key::ArrowDown, Modifiers::default(), Some(KeyCommand::Move(Motion::Down(1))))]
    #[test_case(Key::ArrowRight, SHIFT, Some(KeyCommand::Extend(Motion::Right(1))))]
    #[test_case(Key::PageUp, Modifiers::default(), Some(KeyCommand::Move(Motion::Up(10))))]
    #[test_case(Key::Home, CTRL, Some(KeyCommand::Move(Motion::GridStart)))]
    #[test_case(Key::Tab, SHIFT, Some(KeyCommand::Move(Motion::Left(1))))]
    #[test_case(Key::Char('a'), META, Some(KeyCommand::SelectAll))]
    #[test_case(Key::Char('a'), Modifiers::default(), None)]
    #[test_case(Key::Escape, Modifiers::default(), Some(KeyCommand::Clear))]
    fn test_key_command(key: Key, modifiers: Modifiers, expected: Option<KeyCommand>) {
        assert_eq!(key_command(key, modifiers, 10), expected);
    }

    #[test]
    fn test_motion_clamps_to_bounds() {
        let from = CellPoint::new(2, 3);
        assert_eq!(Motion::Up(10).apply(from, 5, 5), Some(CellPoint::new(2, 0)));
        assert_eq!(Motion::Down(10).apply(from, 5, 5), Some(CellPoint::new(2, 4)));
        assert_eq!(Motion::RowEnd.apply(from, 5, 5), Some(CellPoint::new(4, 3)));
        assert_eq!(Motion::Right(1).apply(from, 0, 5), None);
    }
}
