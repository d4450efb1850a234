//! Parsing for the position-list syntax used by `--specific` and `--insert-at`,
//! and for the `--offset START END` walk bounds.
//!
//! A position list holds one segment per item id, separated by `;`. Each
//! segment is a comma separated list of 0-based positions, or `...` to leave
//! that item without explicit positions:
//!
//! ```text
//! "0,2; ...; 5"  =>  [Some([0, 2]), None, Some([5])]
//! ```
//!
//! Segments are aligned left to right with the item ids. Items beyond the last
//! segment get no explicit positions either.

use crate::error::{LibraryError, Result};

const PLACEHOLDERS: [&str; 2] = ["...", "…"];

/// Per-item explicit positions, aligned with a list of item ids.
pub type PositionLists = Vec<Option<Vec<usize>>>;

/// Parses a full position-list argument.
///
/// An empty or all-whitespace input yields an empty list.
pub fn parse_position_lists(input: &str) -> Result<PositionLists> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    input
        .split(';')
        .enumerate()
        .map(|(n, segment)| parse_segment(n, segment))
        .collect()
}

fn parse_segment(n: usize, segment: &str) -> Result<Option<Vec<usize>>> {
    let segment = segment.trim();
    if PLACEHOLDERS.contains(&segment) {
        return Ok(None);
    }
    if segment.is_empty() {
        return Err(LibraryError::InvalidPositionSpec(format!(
            "item {} has an empty position list, use '...' to skip it",
            n + 1
        )));
    }

    segment
        .split(',')
        .map(|p| {
            let p = p.trim();
            p.parse::<usize>().map_err(|_| {
                LibraryError::InvalidPositionSpec(format!(
                    "'{}' in position list {} is not a position",
                    p,
                    n + 1
                ))
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// Explicit positions for the item at `index`, if any were given.
///
/// An empty list counts as none.
pub fn positions_for(lists: &[Option<Vec<usize>>], index: usize) -> Option<&[usize]> {
    lists
        .get(index)
        .and_then(|l| l.as_deref())
        .filter(|l| !l.is_empty())
}

/// Half-open index range `[start, end)` that walk-and-count removal may touch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkRange {
    pub start: usize,
    /// `None` walks to the end of the playlist.
    pub end: Option<usize>,
}

impl WalkRange {
    pub fn new(start: usize, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// Builds a range from command-line bounds, where `end == -1` means
    /// "to the end".
    pub fn from_bounds(start: i64, end: i64) -> Result<Self> {
        if start < 0 {
            return Err(LibraryError::InvalidPositionSpec(format!(
                "offset start {} is negative",
                start
            )));
        }
        let end = match end {
            -1 => None,
            e if e < 0 => {
                return Err(LibraryError::InvalidPositionSpec(format!(
                    "offset end {} is negative; use -1 for the end of the playlist",
                    e
                )));
            }
            e if e < start => {
                return Err(LibraryError::InvalidPositionSpec(format!(
                    "offset end {} is before start {}",
                    e, start
                )));
            }
            e => Some(e as usize),
        };
        Ok(Self {
            start: start as usize,
            end,
        })
    }

    /// Clamps the range to a sequence of `len` items.
    pub fn clamp(&self, len: usize) -> std::ops::Range<usize> {
        let end = self.end.map_or(len, |e| e.min(len));
        let start = self.start.min(end);
        start..end
    }
}
