use std::fmt;

use crate::error::GridError;

const WORD_BITS: usize = u64::BITS as usize;

/// Bi-level image with one bit per cell, packed row-major into `u64` words.
///
/// A set bit is black (ink) and a clear bit is white (background). The cell at
/// `(col, row)` lives at bit index `row * width + col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitGrid {
    width: usize,
    height: usize,
    words: Vec<u64>,
}

impl BitGrid {
    /// Create a new all-white grid.
    pub fn new(width: usize, height: usize) -> Self {
        let words = vec![0u64; (width * height).div_ceil(WORD_BITS)];
        Self {
            width,
            height,
            words,
        }
    }

    /// Create a grid from row-major cell values.
    ///
    /// `bits` must yield exactly `width * height` values.
    pub fn from_bits<I>(width: usize, height: usize, bits: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = bool>,
    {
        let mut grid = Self::new(width, height);
        let expected = grid.count();
        let mut actual = 0;
        for bit in bits {
            if actual < expected && bit {
                grid.set_bit(actual, true);
            }
            actual += 1;
        }
        if actual != expected {
            return Err(GridError::LengthMismatch { expected, actual });
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn count(&self) -> usize {
        self.width * self.height
    }

    /// Number of black cells.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Get the cell at `(col, row)`.
    pub fn get(&self, col: usize, row: usize) -> Result<bool, GridError> {
        let idx = self.checked_index(col, row)?;
        Ok(self.bit(idx))
    }

    /// Store `value` at `(col, row)`, returning the value it replaced.
    pub fn put(&mut self, col: usize, row: usize, value: bool) -> Result<bool, GridError> {
        let idx = self.checked_index(col, row)?;
        Ok(self.set_bit(idx, value))
    }

    /// Visit every cell, row by row (`row` outer, `col` inner).
    pub fn map_row_major<F>(&self, mut visit: F)
    where
        F: FnMut(usize, usize, &BitGrid, bool),
    {
        for row in 0..self.height {
            for col in 0..self.width {
                visit(col, row, self, self.bit(row * self.width + col));
            }
        }
    }

    /// Visit every cell, column by column (`col` outer, `row` inner).
    pub fn map_col_major<F>(&self, mut visit: F)
    where
        F: FnMut(usize, usize, &BitGrid, bool),
    {
        for col in 0..self.width {
            for row in 0..self.height {
                visit(col, row, self, self.bit(row * self.width + col));
            }
        }
    }

    fn checked_index(&self, col: usize, row: usize) -> Result<usize, GridError> {
        if col >= self.width || row >= self.height {
            return Err(GridError::IndexOutOfRange {
                col,
                row,
                width: self.width,
                height: self.height,
            });
        }
        Ok(row * self.width + col)
    }

    /// Read the bit at a linear index already known to be in range.
    #[inline]
    pub(crate) fn bit(&self, idx: usize) -> bool {
        debug_assert!(idx < self.count());
        self.words[idx / WORD_BITS] >> (idx % WORD_BITS) & 1 == 1
    }

    /// Write the bit at a linear index already known to be in range.
    #[inline]
    pub(crate) fn set_bit(&mut self, idx: usize, value: bool) -> bool {
        debug_assert!(idx < self.count());
        let word = &mut self.words[idx / WORD_BITS];
        let mask = 1u64 << (idx % WORD_BITS);
        let prev = *word & mask != 0;
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
        prev
    }

    pub(crate) fn words(&self) -> &[u64] {
        &self.words
    }

    pub(crate) fn words_mut(&mut self) -> &mut [u64] {
        &mut self.words
    }
}

/// Rows of `0`/`1` characters, one line per row.
impl fmt::Display for BitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let c = if self.bit(row * self.width + col) { '1' } else { '0' };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_white_grid() {
        let grid = BitGrid::new(10, 8);
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 8);
        assert_eq!(grid.count(), 80);
        assert_eq!(grid.count_ones(), 0);
        assert_eq!(grid.words().len(), 2);
    }

    #[test]
    fn put_returns_previous_value() {
        let mut grid = BitGrid::new(4, 4);
        assert_eq!(grid.put(2, 3, true), Ok(false));
        assert_eq!(grid.put(2, 3, true), Ok(true));
        assert_eq!(grid.get(2, 3), Ok(true));
        assert_eq!(grid.put(2, 3, false), Ok(true));
        assert_eq!(grid.get(2, 3), Ok(false));
        assert_eq!(grid.get(0, 0), Ok(false));
    }

    #[test]
    fn cells_do_not_alias_across_word_boundary() {
        // 9x9 = 81 cells spans two words; index 63 and 64 are neighbors.
        let mut grid = BitGrid::new(9, 9);
        grid.put(0, 7, true).unwrap(); // idx 63
        assert_eq!(grid.get(1, 7), Ok(false)); // idx 64
        grid.put(1, 7, true).unwrap();
        assert_eq!(grid.count_ones(), 2);
        grid.put(0, 7, false).unwrap();
        assert_eq!(grid.get(1, 7), Ok(true));
        assert_eq!(grid.count_ones(), 1);
    }

    #[test]
    fn out_of_range_access_is_an_error() {
        let mut grid = BitGrid::new(3, 2);
        let err = GridError::IndexOutOfRange {
            col: 3,
            row: 0,
            width: 3,
            height: 2,
        };
        assert_eq!(grid.get(3, 0), Err(err.clone()));
        assert_eq!(grid.put(3, 0, true), Err(err));
        assert!(grid.get(0, 2).is_err());
        assert!(grid.put(usize::MAX, 1, false).is_err());
        assert_eq!(grid.count_ones(), 0);
    }

    #[test]
    fn from_bits_is_row_major() {
        #[rustfmt::skip]
        let bits = [
            1, 0, 0,
            0, 1, 1,
        ];
        let grid = BitGrid::from_bits(3, 2, bits.iter().map(|&b| b == 1)).unwrap();
        assert_eq!(grid.get(0, 0), Ok(true));
        assert_eq!(grid.get(1, 0), Ok(false));
        assert_eq!(grid.get(1, 1), Ok(true));
        assert_eq!(grid.get(2, 1), Ok(true));
        assert_eq!(grid.to_string(), "100\n011\n");
    }

    #[test]
    fn from_bits_rejects_wrong_length() {
        let short = BitGrid::from_bits(2, 2, [true, false, true]);
        assert_eq!(
            short,
            Err(GridError::LengthMismatch {
                expected: 4,
                actual: 3
            })
        );
        let long = BitGrid::from_bits(1, 1, [true, true]);
        assert!(long.is_err());
    }

    #[test]
    fn map_row_major_order() {
        let grid = BitGrid::new(3, 2);
        let mut seen = Vec::new();
        grid.map_row_major(|col, row, _, _| seen.push((col, row)));
        assert_eq!(seen, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn map_col_major_order() {
        let grid = BitGrid::new(3, 2);
        let mut seen = Vec::new();
        grid.map_col_major(|col, row, _, _| seen.push((col, row)));
        assert_eq!(seen, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]);
    }

    #[test]
    fn map_passes_grid_and_value() {
        let mut grid = BitGrid::new(4, 3);
        grid.put(3, 2, true).unwrap();
        grid.put(1, 0, true).unwrap();
        let mut ones = Vec::new();
        grid.map_col_major(|col, row, g, bit| {
            assert_eq!(g.get(col, row), Ok(bit));
            if bit {
                ones.push((col, row));
            }
        });
        assert_eq!(ones, vec![(1, 0), (3, 2)]);
    }
}
