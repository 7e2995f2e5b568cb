use nw_aligner::render::{render_alignment, render_matrix};
use nw_aligner::{begin_alignment, resolve, ScoringScheme, Sequence, Stage, TracebackResolver};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let seq1 = Sequence::parse("GCATGCU")?;
    let seq2 = Sequence::parse("GATTACA")?;
    let scoring = ScoringScheme::default();

    // Print every row-completing snapshot of the build
    let mut last = None;
    for snapshot in begin_alignment(seq1.clone(), seq2.clone(), scoring) {
        let show = match snapshot.stage {
            Stage::Border => true,
            Stage::Filled(pos) => pos.j == seq1.len(),
            Stage::Complete => false,
        };
        if show {
            println!("{:?}", snapshot.stage);
            for line in render_matrix(&snapshot.matrix, &seq1, &seq2, None, false) {
                println!("{}", line);
            }
            println!();
        }
        last = Some(snapshot.into_matrix());
    }

    let matrix = last.ok_or("alignment produced no snapshots")?;
    let (align1, align2) = resolve(&matrix, &seq1, &seq2, &scoring);
    println!("Aligned sequence 1: {}", align1);
    println!("Aligned sequence 2: {}", align2);

    let result = TracebackResolver::new(seq1.as_slice(), seq2.as_slice(), scoring)
        .reconstruct_alignment(&matrix);
    println!("Operations: {:?}", result.operations);
    println!("{}", render_alignment(&result, false)[2]);

    Ok(())
}
