use serde::{Deserialize, Serialize};

use crate::{DEFAULT_GAP_PENALTY, DEFAULT_MATCH_AWARD, DEFAULT_MISMATCH_PENALTY};

/// Scores applied by one alignment run. Penalties are signed: a negative
/// value lowers the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringScheme {
    pub match_award: i32,
    pub mismatch_penalty: i32,
    pub gap_penalty: i32,
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self {
            match_award: DEFAULT_MATCH_AWARD,
            mismatch_penalty: DEFAULT_MISMATCH_PENALTY,
            gap_penalty: DEFAULT_GAP_PENALTY,
        }
    }
}

impl ScoringScheme {
    pub fn new(match_award: i32, mismatch_penalty: i32, gap_penalty: i32) -> Self {
        Self {
            match_award,
            mismatch_penalty,
            gap_penalty,
        }
    }

    #[inline]
    pub fn pair_score<T: PartialEq>(&self, a: &T, b: &T) -> i32 {
        if a == b {
            self.match_award
        } else {
            self.mismatch_penalty
        }
    }

    /// Score of aligning a prefix of `len` symbols against gaps only.
    #[inline]
    pub fn gap_run(&self, len: usize) -> i32 {
        len as i32 * self.gap_penalty
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub i: usize,
    pub j: usize,
}

/// Row-major `(n+1) x (m+1)` grid of alignment scores. Row `i` follows the
/// second sequence, column `j` the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreMatrix {
    data: Vec<i32>,
    rows: usize,
    cols: usize,
}

impl ScoreMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0; rows * cols],
            rows,
            cols,
        }
    }

    /// Builds a matrix from explicit rows. Ragged input is truncated to the
    /// shortest row.
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Self {
        let cols = rows.iter().map(Vec::len).min().unwrap_or(0);
        let data = rows
            .iter()
            .flat_map(|row| row[..cols].iter().copied())
            .collect();
        Self {
            data,
            rows: rows.len(),
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn try_get(&self, row: usize, col: usize) -> Option<i32> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: i32) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[i32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }

    /// Score in the bottom-right cell, i.e. of the full global alignment.
    pub fn final_score(&self) -> i32 {
        if self.data.is_empty() {
            0
        } else {
            self.get(self.rows - 1, self.cols - 1)
        }
    }
}

/// Column counts of a finished alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentStats {
    pub matches: u32,
    pub mismatches: u32,
    pub gaps: u32,
}

impl AlignmentStats {
    pub fn columns(&self) -> u32 {
        self.matches + self.mismatches + self.gaps
    }

    /// Fraction of columns that are matches, 0.0 for an empty alignment.
    pub fn identity(&self) -> f64 {
        match self.columns() {
            0 => 0.0,
            n => self.matches as f64 / n as f64,
        }
    }
}
