//! Bubble grid geometry on the canvas and click hit-testing.

pub const COLUMNS: usize = 5;
/// Fraction of the smaller cell side used as the bubble radius.
const RADIUS_FACTOR: f64 = 0.42;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    pub width: f64,
    pub height: f64,
    pub columns: usize,
    pub rows: usize,
}

impl Grid {
    /// Grid large enough for `count` bubbles in [`COLUMNS`] columns.
    pub fn new(width: f64, height: f64, count: usize) -> Self {
        let columns = COLUMNS.min(count.max(1));
        let rows = count.max(1).div_ceil(columns);
        Self {
            width,
            height,
            columns,
            rows,
        }
    }

    fn cell(&self) -> (f64, f64) {
        (
            self.width / self.columns as f64,
            self.height / self.rows as f64,
        )
    }

    pub fn radius(&self) -> f64 {
        let (cw, ch) = self.cell();
        cw.min(ch) * RADIUS_FACTOR
    }

    /// Center of the bubble drawn at list position `slot`.
    pub fn center(&self, slot: usize) -> (f64, f64) {
        let (cw, ch) = self.cell();
        let col = slot % self.columns;
        let row = slot / self.columns;
        (col as f64 * cw + cw / 2.0, row as f64 * ch + ch / 2.0)
    }

    /// List position of the bubble under `(x, y)`, if any.
    pub fn hit(&self, x: f64, y: f64, count: usize) -> Option<usize> {
        if x < 0.0 || y < 0.0 || x >= self.width || y >= self.height {
            return None;
        }
        let (cw, ch) = self.cell();
        let col = (x / cw).floor() as usize;
        let row = (y / ch).floor() as usize;
        let slot = row * self.columns + col;
        if col >= self.columns || slot >= count {
            return None;
        }
        let (cx, cy) = self.center(slot);
        let r = self.radius();
        if (x - cx).powi(2) + (y - cy).powi(2) <= r * r {
            Some(slot)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_bubbles_fill_five_by_four() {
        let g = Grid::new(800.0, 640.0, 20);
        assert_eq!((g.columns, g.rows), (5, 4));
        assert_eq!(g.center(0), (80.0, 80.0));
        assert_eq!(g.center(7), (400.0, 240.0));
        assert!((g.radius() - 67.2).abs() < 1e-9);
    }

    #[test]
    fn hit_inside_and_between_bubbles() {
        let g = Grid::new(800.0, 640.0, 20);
        assert_eq!(g.hit(80.0, 80.0, 20), Some(0));
        assert_eq!(g.hit(730.0, 570.0, 20), Some(19));
        // cell corner lies outside the circle
        assert_eq!(g.hit(2.0, 2.0, 20), None);
        assert_eq!(g.hit(-1.0, 80.0, 20), None);
        assert_eq!(g.hit(800.0, 80.0, 20), None);
    }

    #[test]
    fn short_last_row_has_no_phantom_bubbles() {
        let g = Grid::new(500.0, 200.0, 7);
        assert_eq!((g.columns, g.rows), (5, 2));
        let (cx, cy) = g.center(9);
        assert_eq!(g.hit(cx, cy, 7), None);
        let (cx, cy) = g.center(6);
        assert_eq!(g.hit(cx, cy, 7), Some(6));
    }
}
