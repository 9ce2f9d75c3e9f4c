use serde::{Deserialize, Serialize};

/// A hit position in grid coordinates.
///
/// Both indices are zero-based. A negative `col` means the row header
/// (row marker) column was hit, a negative `row` means the column header
/// was hit; both negative is the corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPosition {
    pub col: i32,
    pub row: i32,
}

impl CellPosition {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn is_column_header(&self) -> bool {
        self.row < 0 && self.col >= 0
    }

    pub fn is_row_header(&self) -> bool {
        self.col < 0 && self.row >= 0
    }

    pub fn is_corner(&self) -> bool {
        self.col < 0 && self.row < 0
    }

    /// Body cell coordinates, if this position is inside the body.
    pub fn cell(&self) -> Option<CellPoint> {
        let col = u32::try_from(self.col).ok()?;
        let row = u32::try_from(self.row).ok()?;
        Some(CellPoint { col, row })
    }
}

/// A body cell (column, row). Always inside the data area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPoint {
    pub col: u32,
    pub row: u32,
}

impl CellPoint {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    pub fn to_position(self) -> CellPosition {
        CellPosition {
            col: i32::try_from(self.col).unwrap_or(i32::MAX),
            row: i32::try_from(self.row).unwrap_or(i32::MAX),
        }
    }
}

impl From<CellPoint> for CellPosition {
    fn from(p: CellPoint) -> Self {
        p.to_position()
    }
}

/// Rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink on every side by `amount`.
    pub fn inset(&self, amount: f64) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - amount * 2.0).max(0.0),
            height: (self.height - amount * 2.0).max(0.0),
        }
    }

    /// Intersection with another rectangle, `None` when they do not overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_header_regions() {
        assert!(CellPosition::new(3, -1).is_column_header());
        assert!(CellPosition::new(-1, 3).is_row_header());
        assert!(CellPosition::new(-1, -1).is_corner());
        assert_eq!(CellPosition::new(-1, 3).cell(), None);
        assert_eq!(CellPosition::new(2, 3).cell(), Some(CellPoint::new(2, 3)));
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let i = a.intersect(&b);
        assert_eq!(i, Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(a.intersect(&Rect::new(10.0, 0.0, 5.0, 5.0)), None);
    }
}
