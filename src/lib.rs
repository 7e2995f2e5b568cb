use std::fmt;
use thiserror::Error;

pub mod config;
pub mod engine;
pub mod render;
pub mod scoring;
pub mod traceback;

pub use crate::config::{AppConfig, ReplayConfig};
pub use crate::engine::{AlignmentEngine, Snapshot, SnapshotSource, Stage};
pub use crate::scoring::{AlignmentStats, Position, ScoreMatrix, ScoringScheme};
pub use crate::traceback::{AlignmentResult, TracebackOperation, TracebackResolver};

// Default scoring parameters
pub const DEFAULT_MATCH_AWARD: i32 = 1;
pub const DEFAULT_MISMATCH_PENALTY: i32 = -1;
pub const DEFAULT_GAP_PENALTY: i32 = -1;

/// Glyph used for a gap in rendered alignments.
pub const GAP_SYMBOL: char = '-';

#[derive(Debug, Error)]
pub enum AlignerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AlignerError>;

/// A symbol that can be aligned and drawn as a single glyph.
pub trait Symbol: PartialEq + Clone + fmt::Debug {
    fn glyph(&self) -> char;
}

impl Symbol for char {
    fn glyph(&self) -> char {
        *self
    }
}

impl Symbol for u8 {
    fn glyph(&self) -> char {
        char::from(*self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence<T = char> {
    data: Vec<T>,
}

impl<T: Symbol> Sequence<T> {
    pub fn new(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.data.get(idx)
    }
}

impl Sequence<char> {
    /// Parses typed text into a sequence.
    ///
    /// The gap glyph and control characters are rejected, since either would
    /// make the rendered alignment ambiguous.
    pub fn parse(text: &str) -> Result<Self> {
        if let Some((pos, c)) = text
            .chars()
            .enumerate()
            .find(|(_, c)| *c == GAP_SYMBOL || c.is_control())
        {
            return Err(AlignerError::InvalidInput(format!(
                "symbol {:?} at position {} is not allowed in a sequence",
                c, pos
            )));
        }
        Ok(Self {
            data: text.chars().collect(),
        })
    }
}

impl From<&str> for Sequence<char> {
    fn from(text: &str) -> Self {
        Self {
            data: text.chars().collect(),
        }
    }
}

impl From<&[u8]> for Sequence<u8> {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl<T: Symbol> fmt::Display for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.data.iter().try_for_each(|s| write!(f, "{}", s.glyph()))
    }
}

/// Starts an alignment run and returns the lazy snapshot trace of the matrix build.
pub fn begin_alignment<T: Symbol>(
    seq1: Sequence<T>,
    seq2: Sequence<T>,
    scoring: ScoringScheme,
) -> SnapshotSource<T> {
    AlignmentEngine::new(seq1, seq2, scoring).snapshots()
}

/// Recovers one optimal alignment from a completed matrix as two gapped strings.
///
/// The matrix must come from the same sequences and scoring scheme; this is
/// not checked, and inconsistent inputs yield an arbitrary (but finite) result.
pub fn resolve<T: Symbol>(
    matrix: &ScoreMatrix,
    seq1: &Sequence<T>,
    seq2: &Sequence<T>,
    scoring: &ScoringScheme,
) -> (String, String) {
    TracebackResolver::new(seq1.as_slice(), seq2.as_slice(), *scoring)
        .reconstruct_alignment(matrix)
        .to_strings()
}
