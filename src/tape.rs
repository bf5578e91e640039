//! This module defines the `Tape`, a sparse, bidirectionally unbounded strip of cells.
//! Only written cells are stored; every other index reads as the blank symbol.

use crate::types::Symbol;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// A sparse single tape indexed by signed cell positions.
///
/// | _ | 1 | 0 | 1 | _ |
///  -1   0   1   2   3   index
///
/// Cells are kept in a `BTreeMap` so bounds and ordered windows are cheap,
/// no matter how far the head wanders from the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: BTreeMap<i64, Symbol>,
    blank: Symbol,
}

impl Tape {
    /// Creates a tape with `initial` written at consecutive indices starting at 0.
    pub fn new<I, S>(blank: impl Into<Symbol>, initial: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let cells = initial
            .into_iter()
            .enumerate()
            .map(|(i, symbol)| (i as i64, symbol.into()))
            .collect();

        Self {
            cells,
            blank: blank.into(),
        }
    }

    /// Creates a tape from an input string, one symbol per character.
    pub fn from_input(blank: impl Into<Symbol>, input: &str) -> Self {
        Self::new(blank, input.chars().map(String::from))
    }

    /// Returns the symbol at `index`, or the blank symbol if the cell was never written.
    pub fn read(&self, index: i64) -> &str {
        self.cells.get(&index).unwrap_or(&self.blank)
    }

    /// Writes `symbol` at `index`. Cells are never removed, even when the blank is written.
    pub fn write(&mut self, index: i64, symbol: impl Into<Symbol>) {
        self.cells.insert(index, symbol.into());
    }

    /// Returns the blank symbol of this tape.
    pub fn blank(&self) -> &str {
        &self.blank
    }

    /// Returns the number of written cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if no cell has ever been written.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the lowest and highest written indices, if any.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        let min = self.cells.keys().next()?;
        let max = self.cells.keys().next_back()?;
        Some((*min, *max))
    }

    /// Returns the display range around the touched region and `head`, padded by
    /// `margin` cells on both sides.
    pub fn window(&self, head: i64, margin: i64) -> RangeInclusive<i64> {
        let (min, max) = match self.bounds() {
            Some((min, max)) => (min.min(head), max.max(head)),
            None => (head, head),
        };

        min.saturating_sub(margin)..=max.saturating_add(margin)
    }

    /// Iterates over every cell in `range`, blank cells included.
    pub fn cells(&self, range: RangeInclusive<i64>) -> impl Iterator<Item = (i64, &str)> + '_ {
        range.map(move |index| (index, self.read(index)))
    }

    /// Iterates over written cells in index order.
    pub fn written(&self) -> impl Iterator<Item = (i64, &str)> + '_ {
        self.cells.iter().map(|(index, symbol)| (*index, symbol.as_str()))
    }

    /// Renders `range` as a plain string of symbols.
    pub fn contents(&self, range: RangeInclusive<i64>) -> String {
        self.cells(range).map(|(_, symbol)| symbol).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_saturates_at_index_limits() {
        let tape = Tape::from_input("_", "");

        assert_eq!(tape.window(i64::MIN, 2), i64::MIN..=(i64::MIN + 2));
        assert_eq!(tape.window(i64::MAX, 2), (i64::MAX - 2)..=i64::MAX);
    }

    #[test]
    fn test_initial_cells_start_at_zero() {
        let tape = Tape::from_input("_", "101");

        assert_eq!(tape.read(0), "1");
        assert_eq!(tape.read(1), "0");
        assert_eq!(tape.read(2), "1");
        assert_eq!(tape.len(), 3);
        assert_eq!(tape.bounds(), Some((0, 2)));
    }

    #[test]
    fn test_unwritten_cells_read_blank() {
        let tape = Tape::from_input("#", "ab");

        assert_eq!(tape.read(-1), "#");
        assert_eq!(tape.read(2), "#");
        assert_eq!(tape.read(i64::MIN), "#");
        assert_eq!(tape.read(i64::MAX), "#");
    }

    #[test]
    fn test_write_negative_index() {
        let mut tape = Tape::from_input("_", "");
        tape.write(-5, "x");

        assert_eq!(tape.read(-5), "x");
        assert_eq!(tape.read(-4), "_");
        assert_eq!(tape.bounds(), Some((-5, -5)));
    }

    #[test]
    fn test_writing_blank_keeps_cell() {
        let mut tape = Tape::from_input("_", "1");
        tape.write(0, "_");

        assert_eq!(tape.len(), 1);
        assert_eq!(tape.read(0), "_");
    }

    #[test]
    fn test_window_empty_tape_centres_on_head() {
        let tape = Tape::from_input("_", "");

        assert_eq!(tape.window(3, 2), 1..=5);
    }

    #[test]
    fn test_window_includes_head_outside_written_region() {
        let tape = Tape::from_input("_", "11");

        assert_eq!(tape.window(-3, 2), -5..=3);
        assert_eq!(tape.window(7, 2), -2..=9);
        assert_eq!(tape.window(1, 0), 0..=1);
    }

    #[test]
    fn test_contents_pads_with_blank() {
        let tape = Tape::from_input("_", "10");

        assert_eq!(tape.contents(-1..=2), "_10_");
    }

    #[test]
    fn test_multi_character_symbols() {
        let tape = Tape::new("B", vec!["10", "11"]);

        assert_eq!(tape.read(1), "11");
        assert_eq!(
            tape.written().collect::<Vec<_>>(),
            vec![(0, "10"), (1, "11")]
        );
    }
}
