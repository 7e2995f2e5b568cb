use log::debug;

use crate::scoring::{AlignmentStats, ScoreMatrix, ScoringScheme};
use crate::{Symbol, GAP_SYMBOL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracebackOperation {
    Match,
    Mismatch,
    /// Symbol of the first sequence against a gap (step left).
    Insertion,
    /// Gap against a symbol of the second sequence (step up).
    Deletion,
}

impl TracebackOperation {
    pub fn is_gap(self) -> bool {
        matches!(self, Self::Insertion | Self::Deletion)
    }
}

/// One optimal global alignment. `None` marks a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentResult<T = char> {
    pub score: i32,
    pub aligned_seq1: Vec<Option<T>>,
    pub aligned_seq2: Vec<Option<T>>,
    pub operations: Vec<TracebackOperation>,
    pub stats: AlignmentStats,
}

impl<T: Symbol> AlignmentResult<T> {
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Both aligned rows as text, gaps drawn as `-`.
    pub fn to_strings(&self) -> (String, String) {
        (render_row(&self.aligned_seq1), render_row(&self.aligned_seq2))
    }
}

fn render_row<T: Symbol>(row: &[Option<T>]) -> String {
    row.iter()
        .map(|s| s.as_ref().map_or(GAP_SYMBOL, T::glyph))
        .collect()
}

/// Walks a completed score matrix from the bottom-right corner back to the
/// origin. Where several moves reproduce a cell's score, the diagonal wins,
/// then up, then left; this fixes which optimal alignment is returned.
pub struct TracebackResolver<'a, T> {
    seq1: &'a [T],
    seq2: &'a [T],
    scoring: ScoringScheme,
}

impl<'a, T: Symbol> TracebackResolver<'a, T> {
    pub fn new(seq1: &'a [T], seq2: &'a [T], scoring: ScoringScheme) -> Self {
        Self {
            seq1,
            seq2,
            scoring,
        }
    }

    /// Reconstructs the alignment. A matrix that was not built from these
    /// sequences gives a meaningless alignment, but the walk still ends at
    /// the origin without panicking.
    pub fn reconstruct_alignment(&self, matrix: &ScoreMatrix) -> AlignmentResult<T> {
        let capacity = self.seq1.len() + self.seq2.len();
        let mut aligned_seq1 = Vec::with_capacity(capacity);
        let mut aligned_seq2 = Vec::with_capacity(capacity);
        let mut operations = Vec::with_capacity(capacity);

        let gap = self.scoring.gap_penalty;
        let mut i = self.seq2.len();
        let mut j = self.seq1.len();

        while i > 0 || j > 0 {
            let current = matrix.try_get(i, j);
            let from = |row: usize, col: usize, delta: i32| {
                matrix.try_get(row, col).and_then(|v| v.checked_add(delta))
            };

            if i > 0 && j > 0 {
                let (a, b) = (&self.seq1[j - 1], &self.seq2[i - 1]);
                let pair = self.scoring.pair_score(a, b);
                if current.is_some() && current == from(i - 1, j - 1, pair) {
                    operations.push(if a == b {
                        TracebackOperation::Match
                    } else {
                        TracebackOperation::Mismatch
                    });
                    aligned_seq1.push(Some(a.clone()));
                    aligned_seq2.push(Some(b.clone()));
                    i -= 1;
                    j -= 1;
                    continue;
                }
            }

            let up = i > 0 && current.is_some() && current == from(i - 1, j, gap);
            if up || j == 0 {
                operations.push(TracebackOperation::Deletion);
                aligned_seq1.push(None);
                aligned_seq2.push(Some(self.seq2[i - 1].clone()));
                i -= 1;
            } else {
                operations.push(TracebackOperation::Insertion);
                aligned_seq1.push(Some(self.seq1[j - 1].clone()));
                aligned_seq2.push(None);
                j -= 1;
            }
        }

        // Built from the corner back to the origin
        aligned_seq1.reverse();
        aligned_seq2.reverse();
        operations.reverse();

        let (score, stats) = self.tally(&aligned_seq1, &aligned_seq2, &operations);
        debug!(
            "Traceback finished: {} columns, score {} ({} matches, {} mismatches, {} gaps)",
            operations.len(),
            score,
            stats.matches,
            stats.mismatches,
            stats.gaps
        );

        AlignmentResult {
            score,
            aligned_seq1,
            aligned_seq2,
            operations,
            stats,
        }
    }

    fn tally(
        &self,
        row1: &[Option<T>],
        row2: &[Option<T>],
        operations: &[TracebackOperation],
    ) -> (i32, AlignmentStats) {
        let mut stats = AlignmentStats::default();
        let mut score = 0i32;
        for ((op, a), b) in operations.iter().zip(row1).zip(row2) {
            match op {
                TracebackOperation::Match => stats.matches += 1,
                TracebackOperation::Mismatch => stats.mismatches += 1,
                TracebackOperation::Insertion | TracebackOperation::Deletion => stats.gaps += 1,
            }
            let delta = match (a, b) {
                (Some(a), Some(b)) => self.scoring.pair_score(a, b),
                _ => self.scoring.gap_penalty,
            };
            score = score.saturating_add(delta);
        }
        (score, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AlignmentEngine;
    use crate::Sequence;

    fn align(a: &str, b: &str, scoring: ScoringScheme) -> AlignmentResult<char> {
        let seq1: Sequence = a.into();
        let seq2: Sequence = b.into();
        let matrix = AlignmentEngine::new(seq1.clone(), seq2.clone(), scoring).run();
        TracebackResolver::new(seq1.as_slice(), seq2.as_slice(), scoring)
            .reconstruct_alignment(&matrix)
    }

    #[test]
    fn classic_pair_follows_diagonal_first_precedence() {
        let result = align("GCATGCU", "GATTACA", ScoringScheme::default());
        let (a1, a2) = result.to_strings();
        assert_eq!(a1, "GCA-TGCU");
        assert_eq!(a2, "G-ATTACA");
        assert_eq!(result.score, 0);
        assert_eq!(
            result.stats,
            AlignmentStats {
                matches: 4,
                mismatches: 2,
                gaps: 2
            }
        );
    }

    #[test]
    fn swapped_inputs_change_which_row_gets_gaps() {
        let (a1, a2) = align("GATTACA", "GCATGCU", ScoringScheme::default()).to_strings();
        assert_eq!(a1, "G-ATTACA");
        assert_eq!(a2, "GCA-TGCU");
    }

    #[test]
    fn identical_sequences_align_without_gaps() {
        let result = align("AAAA", "AAAA", ScoringScheme::default());
        assert_eq!(result.to_strings(), ("AAAA".to_string(), "AAAA".to_string()));
        assert_eq!(result.score, 4);
        assert!(result.operations.iter().all(|op| *op == TracebackOperation::Match));
    }

    #[test]
    fn one_empty_side_is_all_gaps() {
        let result = align("AC", "", ScoringScheme::default());
        assert_eq!(result.to_strings(), ("AC".to_string(), "--".to_string()));
        assert_eq!(result.operations, vec![TracebackOperation::Insertion; 2]);

        let result = align("", "AC", ScoringScheme::default());
        assert_eq!(result.to_strings(), ("--".to_string(), "AC".to_string()));
        assert_eq!(result.operations, vec![TracebackOperation::Deletion; 2]);
    }

    #[test]
    fn both_empty_is_empty_alignment() {
        let result = align("", "", ScoringScheme::default());
        assert!(result.is_empty());
        assert_eq!(result.to_strings(), (String::new(), String::new()));
    }

    #[test]
    fn trailing_gaps_take_the_left_fallback() {
        let (a1, a2) = align("ACGT", "A", ScoringScheme::default()).to_strings();
        assert_eq!(a1, "ACGT");
        assert_eq!(a2, "A---");
    }

    #[test]
    fn inconsistent_matrix_still_terminates() {
        let seq1 = ['A', 'C', 'G'];
        let seq2 = ['T', 'T'];
        let bogus = ScoreMatrix::from_rows(vec![vec![5, 5], vec![5, 5]]);
        let result = TracebackResolver::new(&seq1, &seq2, ScoringScheme::default())
            .reconstruct_alignment(&bogus);
        assert_eq!(result.aligned_seq1.len(), result.aligned_seq2.len());
        assert!(result.len() >= 3);
        let (a1, a2) = result.to_strings();
        assert_eq!(a1.replace('-', ""), "ACG");
        assert_eq!(a2.replace('-', ""), "TT");
    }

    #[test]
    fn byte_symbols_render_as_ascii() {
        let seq1: Sequence<u8> = Sequence::new(b"ACGT");
        let seq2: Sequence<u8> = Sequence::new(b"AGT");
        let scoring = ScoringScheme::default();
        let matrix = AlignmentEngine::new(seq1.clone(), seq2.clone(), scoring).run();
        let result = TracebackResolver::new(seq1.as_slice(), seq2.as_slice(), scoring)
            .reconstruct_alignment(&matrix);
        assert_eq!(result.to_strings(), ("ACGT".to_string(), "A-GT".to_string()));
    }
}
