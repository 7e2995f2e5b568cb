//! Needleman-Wunsch matrix construction.
//!
//! The matrix is built one cell at a time behind an [`Iterator`], so a caller
//! can pace the build (for example, one cell per animation frame) without
//! re-running the algorithm. Every yielded [`Snapshot`] owns a copy of the
//! matrix taken at that step.

use std::iter::FusedIterator;

use log::{debug, trace};

use crate::scoring::{Position, ScoreMatrix, ScoringScheme};
use crate::{Sequence, Symbol};

/// What the most recent step of the build did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Row 0 and column 0 hold the cumulative gap penalties.
    Border,
    /// The given cell was just filled.
    Filled(Position),
    /// Every cell is filled; the matrix equals the last `Filled` state.
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub stage: Stage,
    pub matrix: ScoreMatrix,
}

impl Snapshot {
    pub fn into_matrix(self) -> ScoreMatrix {
        self.matrix
    }
}

pub struct AlignmentEngine<T> {
    seq1: Sequence<T>,
    seq2: Sequence<T>,
    scoring: ScoringScheme,
    matrix: ScoreMatrix,
}

impl<T: Symbol> AlignmentEngine<T> {
    pub fn new(seq1: Sequence<T>, seq2: Sequence<T>, scoring: ScoringScheme) -> Self {
        let rows = seq2.len() + 1;
        let cols = seq1.len() + 1;
        debug!(
            "Starting alignment: {} x {} matrix (match={}, mismatch={}, gap={})",
            rows, cols, scoring.match_award, scoring.mismatch_penalty, scoring.gap_penalty
        );
        Self {
            seq1,
            seq2,
            scoring,
            matrix: ScoreMatrix::new(rows, cols),
        }
    }

    pub fn seq1(&self) -> &Sequence<T> {
        &self.seq1
    }

    pub fn seq2(&self) -> &Sequence<T> {
        &self.seq2
    }

    pub fn scoring(&self) -> ScoringScheme {
        self.scoring
    }

    /// Consumes the engine into its lazy snapshot trace.
    pub fn snapshots(self) -> SnapshotSource<T> {
        SnapshotSource {
            engine: self,
            phase: Phase::Border,
            cursor: Position { i: 1, j: 1 },
        }
    }

    /// Builds the full matrix without producing intermediate snapshots.
    pub fn run(self) -> ScoreMatrix {
        self.snapshots().finish()
    }

    fn init_border(&mut self) {
        for i in 0..self.matrix.rows() {
            self.matrix.set(i, 0, self.scoring.gap_run(i));
        }
        for j in 0..self.matrix.cols() {
            self.matrix.set(0, j, self.scoring.gap_run(j));
        }
    }

    fn fill_cell(&mut self, pos: Position) {
        let Position { i, j } = pos;
        let m = &self.matrix;
        let diag = m.get(i - 1, j - 1)
            + self
                .scoring
                .pair_score(&self.seq1.as_slice()[j - 1], &self.seq2.as_slice()[i - 1]);
        let up = m.get(i - 1, j) + self.scoring.gap_penalty;
        let left = m.get(i, j - 1) + self.scoring.gap_penalty;
        let best = diag.max(up).max(left);
        trace!(
            "cell ({}, {}): diag={} up={} left={} -> {}",
            i, j, diag, up, left, best
        );
        self.matrix.set(i, j, best);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Border,
    Filling,
    Complete,
    Done,
}

/// Lazy, single-pass trace of a matrix build: one border snapshot, one
/// snapshot per filled cell in row-major order, then a completion snapshot.
///
/// No work happens until `next` is called, and dropping the source early is
/// always safe.
pub struct SnapshotSource<T> {
    engine: AlignmentEngine<T>,
    phase: Phase,
    cursor: Position,
}

impl<T: Symbol> SnapshotSource<T> {
    pub fn seq1(&self) -> &Sequence<T> {
        self.engine.seq1()
    }

    pub fn seq2(&self) -> &Sequence<T> {
        self.engine.seq2()
    }

    pub fn scoring(&self) -> ScoringScheme {
        self.engine.scoring()
    }

    /// Borrowed view of the live matrix in its current state.
    pub fn current(&self) -> &ScoreMatrix {
        &self.engine.matrix
    }

    /// Drives the remaining steps without copying and returns the final matrix.
    pub fn finish(mut self) -> ScoreMatrix {
        while self.advance().is_some() {}
        self.engine.matrix
    }

    fn cells(&self) -> usize {
        self.engine.seq1.len() * self.engine.seq2.len()
    }

    fn advance(&mut self) -> Option<Stage> {
        match self.phase {
            Phase::Border => {
                self.engine.init_border();
                self.phase = if self.cells() == 0 {
                    Phase::Complete
                } else {
                    Phase::Filling
                };
                Some(Stage::Border)
            }
            Phase::Filling => {
                let pos = self.cursor;
                self.engine.fill_cell(pos);

                let cols = self.engine.seq1.len();
                let rows = self.engine.seq2.len();
                if pos.j < cols {
                    self.cursor.j += 1;
                } else if pos.i < rows {
                    self.cursor = Position { i: pos.i + 1, j: 1 };
                } else {
                    self.phase = Phase::Complete;
                }
                Some(Stage::Filled(pos))
            }
            Phase::Complete => {
                debug!(
                    "Alignment matrix complete: final score {}",
                    self.engine.matrix.final_score()
                );
                self.phase = Phase::Done;
                Some(Stage::Complete)
            }
            Phase::Done => None,
        }
    }

    fn remaining(&self) -> usize {
        match self.phase {
            Phase::Border => self.cells() + 2,
            Phase::Filling => {
                let m = self.engine.seq1.len();
                let n = self.engine.seq2.len();
                let Position { i, j } = self.cursor;
                (n - i) * m + (m - j + 1) + 1
            }
            Phase::Complete => 1,
            Phase::Done => 0,
        }
    }
}

impl<T: Symbol> Iterator for SnapshotSource<T> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        let stage = self.advance()?;
        Some(Snapshot {
            stage,
            matrix: self.engine.matrix.clone(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl<T: Symbol> ExactSizeIterator for SnapshotSource<T> {}

impl<T: Symbol> FusedIterator for SnapshotSource<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(text: &str) -> Sequence {
        Sequence::from(text)
    }

    fn source(a: &str, b: &str) -> SnapshotSource<char> {
        AlignmentEngine::new(seq(a), seq(b), ScoringScheme::default()).snapshots()
    }

    #[test]
    fn border_is_cumulative_gap_penalty() {
        let scoring = ScoringScheme::new(2, -3, -2);
        let mut src = AlignmentEngine::new(seq("ACG"), seq("AT"), scoring).snapshots();
        let first = src.next().unwrap();
        assert_eq!(first.stage, Stage::Border);
        assert_eq!(first.matrix.row(0), &[0, -2, -4, -6]);
        assert_eq!(first.matrix.get(1, 0), -2);
        assert_eq!(first.matrix.get(2, 0), -4);
        // Interior is untouched until filled.
        assert_eq!(first.matrix.get(1, 1), 0);
    }

    #[test]
    fn cells_fill_in_row_major_order() {
        let stages: Vec<Stage> = source("AC", "GA").map(|s| s.stage).collect();
        let pos = |i, j| Stage::Filled(Position { i, j });
        assert_eq!(
            stages,
            vec![
                Stage::Border,
                pos(1, 1),
                pos(1, 2),
                pos(2, 1),
                pos(2, 2),
                Stage::Complete,
            ]
        );
    }

    #[test]
    fn completion_snapshot_repeats_last_fill() {
        let snaps: Vec<Snapshot> = source("GCATGCU", "GATTACA").collect();
        let last = &snaps[snaps.len() - 1];
        let before = &snaps[snaps.len() - 2];
        assert_eq!(last.stage, Stage::Complete);
        assert_eq!(last.matrix, before.matrix);
        assert_eq!(last.matrix.final_score(), 0);
    }

    #[test]
    fn known_matrix_for_small_pair() {
        let matrix = source("AC", "GA").finish();
        assert_eq!(
            matrix.to_rows(),
            vec![vec![0, -1, -2], vec![-1, -1, -2], vec![-2, 0, -1]]
        );
    }

    #[test]
    fn size_hint_is_exact_throughout() {
        let mut src = source("ACGT", "AGT");
        let mut expected = 1 + 4 * 3 + 1;
        assert_eq!(src.len(), expected);
        while src.next().is_some() {
            expected -= 1;
            assert_eq!(src.len(), expected);
        }
        assert_eq!(expected, 0);
        assert!(src.next().is_none());
    }

    #[test]
    fn empty_inputs_yield_border_and_completion_only() {
        let snaps: Vec<Snapshot> = source("", "").collect();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].matrix.to_rows(), vec![vec![0]]);
        assert_eq!(snaps[1].stage, Stage::Complete);

        let snaps: Vec<Snapshot> = source("AC", "").collect();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[1].matrix.row(0), &[0, -1, -2]);
    }

    #[test]
    fn partial_consumption_then_finish_matches_full_run() {
        let mut src = source("GCATGCU", "GATTACA");
        for _ in 0..10 {
            src.next();
        }
        let finished = src.finish();
        let full =
            AlignmentEngine::new(seq("GCATGCU"), seq("GATTACA"), ScoringScheme::default()).run();
        assert_eq!(finished, full);
    }

    #[test]
    fn current_tracks_live_matrix() {
        let mut src = source("A", "A");
        src.next();
        assert_eq!(src.current().get(1, 1), 0);
        src.next();
        assert_eq!(src.current().get(1, 1), 1);
    }
}
