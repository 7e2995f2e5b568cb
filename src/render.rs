//! Plain-text rendering of score matrices and alignments for the terminal
//! replay. Functions return lines without terminators so the caller can join
//! them for cooked (`\n`) or raw (`\r\n`) terminal modes.

use crossterm::style::Stylize;

use crate::scoring::{Position, ScoreMatrix};
use crate::traceback::{AlignmentResult, TracebackOperation};
use crate::{Sequence, Symbol, GAP_SYMBOL};

const MIN_CELL_WIDTH: usize = 3;

fn cell_width(matrix: &ScoreMatrix) -> usize {
    (0..matrix.rows())
        .flat_map(|i| matrix.row(i).iter())
        .map(|v| v.to_string().len() + 1)
        .max()
        .unwrap_or(0)
        .max(MIN_CELL_WIDTH)
}

/// Grid of scores with `seq1` across the top and `seq2` down the left side.
/// With `color` set, the cell at `highlight` is emphasised.
pub fn render_matrix<T: Symbol>(
    matrix: &ScoreMatrix,
    seq1: &Sequence<T>,
    seq2: &Sequence<T>,
    highlight: Option<Position>,
    color: bool,
) -> Vec<String> {
    let w = cell_width(matrix);
    let mut lines = Vec::with_capacity(matrix.rows() + 1);

    let mut header = format!("  {:>w$}", "", w = w);
    for s in seq1.as_slice() {
        header.push_str(&format!("{:>w$}", s.glyph(), w = w));
    }
    lines.push(header);

    for i in 0..matrix.rows() {
        let label = match i {
            0 => ' ',
            _ => seq2.get(i - 1).map_or('?', T::glyph),
        };
        let mut line = format!("{} ", label);
        for (j, value) in matrix.row(i).iter().enumerate() {
            let cell = format!("{:>w$}", value, w = w);
            if color && highlight == Some(Position { i, j }) {
                line.push_str(&cell.bold().yellow().to_string());
            } else {
                line.push_str(&cell);
            }
        }
        lines.push(line);
    }
    lines
}

fn styled(glyph: char, op: TracebackOperation, color: bool) -> String {
    if !color {
        return glyph.to_string();
    }
    let text = glyph.to_string();
    match op {
        TracebackOperation::Match => text.green().to_string(),
        TracebackOperation::Mismatch => text.red().to_string(),
        TracebackOperation::Insertion | TracebackOperation::Deletion => {
            text.dark_grey().to_string()
        }
    }
}

/// The two aligned rows, color-coded per column (match green, mismatch red,
/// gap grey), followed by a summary line.
pub fn render_alignment<T: Symbol>(result: &AlignmentResult<T>, color: bool) -> Vec<String> {
    let row = |cells: &[Option<T>]| -> String {
        cells
            .iter()
            .zip(&result.operations)
            .map(|(s, op)| styled(s.as_ref().map_or(GAP_SYMBOL, T::glyph), *op, color))
            .collect()
    };

    let stats = &result.stats;
    vec![
        row(result.aligned_seq1.as_slice()),
        row(result.aligned_seq2.as_slice()),
        format!(
            "score {} | {} matches, {} mismatches, {} gaps | identity {:.1}%",
            result.score,
            stats.matches,
            stats.mismatches,
            stats.gaps,
            stats.identity() * 100.0
        ),
    ]
}
