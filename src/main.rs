use clap::Parser;
use std::path::PathBuf;
use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pgnreport::report::html::{DEFAULT_ANALYSIS_URL, DEFAULT_TITLE};
use pgnreport::{default_output_path, ReportGenerator};

/// PGN Match Report - render a match record as an HTML results page
///
/// Reads the PGN file written by a match runner, replays every game to
/// produce standard short-form notation, and writes a report with one
/// win/draw/loss bar per participant followed by every game's moves.
///
/// ## Usage Examples:
/// ```bash
/// # Writes engine1-vs-engine2.html next to the input
/// ./pgnreport engine1-vs-engine2.pgn
///
/// # Only the first 10 games, custom output file
/// ./pgnreport --max-games 10 -o report.html engine1-vs-engine2.pgn
/// ```
#[derive(Parser)]
#[command(name = "pgnreport")]
#[command(about = "Render a PGN match record as an HTML results report")]
#[command(version = "0.1.0")]
struct Args {
    /// Path to the PGN match record
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output HTML file (if not specified, writes <INPUT stem>.html in the input's
    /// directory, not the current directory; an existing file is kept unless --force)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Force overwrite existing output file
    #[arg(short, long)]
    force: bool,

    /// Maximum number of games to render (0 = all games)
    #[arg(long, default_value = "0")]
    max_games: usize,

    /// Report title
    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,

    /// Page opened by each game's "Open Analysis" button
    #[arg(long, value_name = "URL", default_value = DEFAULT_ANALYSIS_URL)]
    analysis_url: String,

    /// Leave out the "Open Analysis" button
    #[arg(long)]
    no_analysis_link: bool,

    /// Log per-game detail
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    info!(input = %args.input.display(), output = %output_path.display(), "generating report");

    let analysis_url = if args.no_analysis_link {
        None
    } else {
        Some(args.analysis_url.clone())
    };

    let mut generator = ReportGenerator::new()
        .with_title(args.title.clone())
        .with_analysis_url(analysis_url)
        .with_overwrite(args.force);

    if args.max_games > 0 {
        generator = generator.with_max_games(args.max_games);
    }

    match generator.generate(&args.input, &output_path) {
        Ok(summary) => {
            println!(
                "Rendered {} games ({} skipped, {} participants) to '{}'",
                summary.games_rendered,
                summary.games_skipped,
                summary.participants,
                output_path.display()
            );
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
