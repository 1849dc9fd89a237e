use std::ops::Range;

use serde::Serialize;

/// Subplot grid: at most [`GridLayout::MAX_COLS`] columns and as many rows
/// as the panels need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    pub panels: usize,
}

impl GridLayout {
    pub const MAX_COLS: usize = 2;

    /// `None` when there is nothing to draw.
    pub fn for_panels(panels: usize) -> Option<Self> {
        if panels == 0 {
            return None;
        }
        Some(GridLayout {
            rows: panels.div_ceil(Self::MAX_COLS),
            cols: panels.min(Self::MAX_COLS),
            panels,
        })
    }

    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    /// `(row, col)` of a slot, row-major.
    pub fn position(&self, slot: usize) -> Option<(usize, usize)> {
        (slot < self.cells()).then(|| (slot / self.cols, slot % self.cols))
    }

    /// Slots left blank after the last panel.
    pub fn unused_cells(&self) -> Range<usize> {
        self.panels..self.cells()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_panels_no_grid() {
        assert_eq!(GridLayout::for_panels(0), None);
    }

    #[test]
    fn grid_sizes() {
        let cases = [(1, 1, 1), (2, 1, 2), (3, 2, 2), (4, 2, 2), (5, 3, 2)];
        for (panels, rows, cols) in cases {
            let layout = GridLayout::for_panels(panels).unwrap();
            assert_eq!((layout.rows, layout.cols), (rows, cols), "{panels} panels");
            assert!(layout.cells() >= panels);
            assert!(layout.cells() - panels < GridLayout::MAX_COLS);
        }
    }

    #[test]
    fn odd_count_leaves_one_blank_cell() {
        let layout = GridLayout::for_panels(3).unwrap();
        assert_eq!(layout.unused_cells(), 3..4);
        assert_eq!(layout.position(2), Some((1, 0)));
        assert_eq!(layout.position(3), Some((1, 1)));
        assert_eq!(layout.position(4), None);
    }
}
