use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::{cursor, execute, terminal};
use log::{info, warn};

use nw_aligner::render::{render_alignment, render_matrix};
use nw_aligner::{
    begin_alignment, AppConfig, ReplayConfig, Sequence, SnapshotSource, Stage, TracebackResolver,
};

#[derive(Parser)]
#[command(name = "nw-trace")]
#[command(about = "Replay a Needleman-Wunsch score matrix cell by cell")]
#[command(version)]
struct Cli {
    /// First sequence (across the top). Prompted for when omitted.
    seq1: Option<String>,

    /// Second sequence (down the side). Prompted for when omitted.
    seq2: Option<String>,

    /// TOML configuration file with [scoring] and [replay] sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Score for a matching pair
    #[arg(long = "match", allow_hyphen_values = true)]
    match_award: Option<i32>,

    /// Score for a mismatching pair
    #[arg(long = "mismatch", allow_hyphen_values = true)]
    mismatch_penalty: Option<i32>,

    /// Score for a symbol aligned against a gap
    #[arg(long = "gap", allow_hyphen_values = true)]
    gap_penalty: Option<i32>,

    /// Delay between frames in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Show only the finished matrix
    #[arg(long)]
    no_trace: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                AppConfig::load(path)
                    .with_context(|| format!("failed to load {}", path.display()))?
            }
            None => AppConfig::default(),
        };

        if let Some(v) = self.match_award {
            config.scoring.match_award = v;
        }
        if let Some(v) = self.mismatch_penalty {
            config.scoring.mismatch_penalty = v;
        }
        if let Some(v) = self.gap_penalty {
            config.scoring.gap_penalty = v;
        }
        if let Some(v) = self.delay_ms {
            config.replay.frame_delay_ms = v;
            config.replay.min_frame_delay_ms = config.replay.min_frame_delay_ms.min(v);
        }
        if self.no_color {
            config.replay.color = false;
        }
        if self.no_trace {
            config.replay.show_trace = false;
        }
        Ok(config)
    }
}

fn read_sequence(arg: Option<&str>, prompt: &str) -> Result<Sequence> {
    let text = match arg {
        Some(text) => text.to_string(),
        None => {
            print!("{}: ", prompt);
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(&['\r', '\n'][..]).to_string()
        }
    };
    Sequence::parse(&text).with_context(|| format!("invalid {}", prompt))
}

enum Control {
    Continue,
    Stop,
}

/// Waits out one frame, reacting to keys when attached to a terminal.
fn pace(replay: &mut ReplayConfig, interactive: bool) -> Result<Control> {
    let delay = Duration::from_millis(replay.frame_delay_ms);
    if !interactive {
        thread::sleep(delay);
        return Ok(Control::Continue);
    }
    if event::poll(delay)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char(' ') => {
                        let ms = replay.accelerate();
                        info!("Frame delay now {} ms", ms);
                    }
                    KeyCode::Esc | KeyCode::Char('q') => return Ok(Control::Stop),
                    _ => {}
                }
            }
        }
    }
    Ok(Control::Continue)
}

#[derive(Clone, Copy)]
struct Screen {
    /// Raw mode is active, so lines need an explicit carriage return.
    raw: bool,
    /// Redraw in place instead of appending frames.
    clear: bool,
}

fn draw(frame: &[String], screen: Screen) -> Result<()> {
    let mut out = io::stdout();
    if screen.clear {
        execute!(
            out,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::All)
        )?;
    }
    let eol = if screen.raw { "\r\n" } else { "\n" };
    for line in frame {
        write!(out, "{}{}", line, eol)?;
    }
    out.flush()?;
    Ok(())
}

/// Plays snapshots until the source runs dry or the user stops the replay.
/// Returns the source so the caller can finish the matrix.
fn play(
    mut source: SnapshotSource<char>,
    settings: &mut ReplayConfig,
    screen: Screen,
) -> Result<SnapshotSource<char>> {
    let seq1 = source.seq1().clone();
    let seq2 = source.seq2().clone();
    while let Some(snapshot) = source.next() {
        let highlight = match snapshot.stage {
            Stage::Filled(pos) => Some(pos),
            Stage::Border | Stage::Complete => None,
        };
        let frame = render_matrix(&snapshot.matrix, &seq1, &seq2, highlight, settings.color);
        draw(&frame, screen)?;
        if snapshot.stage == Stage::Complete {
            break;
        }
        if let Control::Stop = pace(settings, screen.raw)? {
            info!("Replay stopped with {} snapshots left", source.len());
            break;
        }
    }
    Ok(source)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = cli.resolve_config()?;
    if config.replay.color && !io::stdout().is_terminal() {
        warn!("stdout is not a terminal, disabling color");
        config.replay.color = false;
    }

    let seq1 = read_sequence(cli.seq1.as_deref(), "Seq1")?;
    let seq2 = read_sequence(cli.seq2.as_deref(), "Seq2")?;
    let scoring = config.scoring;

    let source = begin_alignment(seq1.clone(), seq2.clone(), scoring);
    let matrix = if config.replay.show_trace {
        let tty = io::stdout().is_terminal();
        let interactive = tty && io::stdin().is_terminal();
        if interactive {
            terminal::enable_raw_mode().context("failed to enter raw mode")?;
        }
        let screen = Screen {
            raw: interactive,
            clear: tty,
        };
        let played = play(source, &mut config.replay, screen);
        if interactive {
            terminal::disable_raw_mode().context("failed to leave raw mode")?;
        }
        played?.finish()
    } else {
        source.finish()
    };

    if !config.replay.show_trace {
        for line in render_matrix(&matrix, &seq1, &seq2, None, config.replay.color) {
            println!("{}", line);
        }
    }

    let result = TracebackResolver::new(seq1.as_slice(), seq2.as_slice(), scoring)
        .reconstruct_alignment(&matrix);
    println!();
    for line in render_alignment(&result, config.replay.color) {
        println!("{}", line);
    }

    Ok(())
}
