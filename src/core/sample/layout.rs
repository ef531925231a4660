/// Near-square grid used to lay out preview tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridLayout {
    pub cols: usize,
    pub rows: usize,
}

impl GridLayout {
    /// `cols = ceil(sqrt(n))`, `rows = ceil(n / cols)`. Zero tiles give a 0x0 grid.
    pub fn for_count(n: usize) -> Self {
        if n == 0 {
            return Self::default();
        }

        let mut cols = (n as f64).sqrt().ceil() as usize;
        // Float rounding can land one off for large n
        while cols * cols < n {
            cols += 1;
        }
        while cols > 1 && (cols - 1) * (cols - 1) >= n {
            cols -= 1;
        }

        Self {
            cols,
            rows: n.div_ceil(cols),
        }
    }

    pub fn capacity(&self) -> usize {
        self.cols * self.rows
    }

    /// `(row, col)` of the tile at `index`, filled row by row.
    pub fn position(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.capacity() {
            return None;
        }
        Some((index / self.cols, index % self.cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_shapes() {
        assert_eq!(GridLayout::for_count(1), GridLayout { cols: 1, rows: 1 });
        assert_eq!(GridLayout::for_count(2), GridLayout { cols: 2, rows: 1 });
        assert_eq!(GridLayout::for_count(4), GridLayout { cols: 2, rows: 2 });
        assert_eq!(GridLayout::for_count(5), GridLayout { cols: 3, rows: 2 });
        assert_eq!(GridLayout::for_count(9), GridLayout { cols: 3, rows: 3 });
        assert_eq!(GridLayout::for_count(10), GridLayout { cols: 4, rows: 3 });
    }

    #[test]
    fn test_layout_empty() {
        let layout = GridLayout::for_count(0);
        assert_eq!(layout.capacity(), 0);
        assert_eq!(layout.position(0), None);
    }

    #[test]
    fn test_layout_always_fits() {
        for n in 1..200 {
            let layout = GridLayout::for_count(n);
            assert!(layout.capacity() >= n, "n = {}", n);
            assert!(layout.cols >= layout.rows, "n = {}", n);
        }
    }

    #[test]
    fn test_position_fills_rows_first() {
        let layout = GridLayout::for_count(5);
        assert_eq!(layout.position(0), Some((0, 0)));
        assert_eq!(layout.position(2), Some((0, 2)));
        assert_eq!(layout.position(3), Some((1, 0)));
        assert_eq!(layout.position(6), None);
    }
}
