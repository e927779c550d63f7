pub mod html;
pub mod tally;
pub mod transcript;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{GameError, ReportError};
use crate::pgn::parse_games;

pub use html::{render, render_to_string, RenderOptions};
pub use tally::{ParticipantTally, Tallies};
pub use transcript::{MoveRow, Transcript, TranscriptEntry};

/// Everything the renderer needs, built in one forward pass over the record
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub tallies: Tallies,
    pub transcripts: Vec<Transcript>,
    /// Games left out of the report, with the reason
    pub skipped: Vec<GameError>,
}

impl Report {
    /// Parse, replay and tally every game in the record text.
    ///
    /// A game that fails to parse or replay is skipped and contributes
    /// neither a transcript nor a tally. `max_games` caps the number of
    /// games kept.
    pub fn build(text: &str, max_games: Option<usize>) -> Report {
        let mut report = Report::default();

        for parsed in parse_games(text) {
            if max_games.map_or(false, |max| report.transcripts.len() >= max) {
                break;
            }

            let transcript = parsed.and_then(|game| Transcript::from_game(&game));
            match transcript {
                Ok(transcript) => {
                    report
                        .tallies
                        .record(&transcript.white, &transcript.black, transcript.result);
                    report.transcripts.push(transcript);
                }
                Err(e) => {
                    warn!(game = e.game(), "skipping game: {}", e);
                    report.skipped.push(e);
                }
            }
        }

        report
    }

    pub fn render_html(&self, options: &RenderOptions) -> String {
        render_to_string(&self.tallies, &self.transcripts, options)
    }
}

/// Outcome of a report run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub games_rendered: usize,
    pub games_skipped: usize,
    pub participants: usize,
}

/// Output path next to the input: same stem, `html` extension
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("html")
}

/// Reads a record file and writes its HTML report
pub struct ReportGenerator {
    options: RenderOptions,
    max_games: Option<usize>,
    overwrite: bool,
}

impl ReportGenerator {
    pub fn new() -> Self {
        ReportGenerator {
            options: RenderOptions::default(),
            max_games: None,
            overwrite: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options.title = title.into();
        self
    }

    pub fn with_analysis_url(mut self, url: Option<String>) -> Self {
        self.options.analysis_url = url;
        self
    }

    pub fn with_max_games(mut self, max: usize) -> Self {
        self.max_games = Some(max);
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Read `input`, build the report and write it to `output`.
    ///
    /// The whole input is read before processing and the document is written
    /// only once every game has been handled.
    pub fn generate(&self, input: &Path, output: &Path) -> Result<ReportSummary, ReportError> {
        if output.exists() && !self.overwrite {
            return Err(ReportError::OutputExists(output.to_path_buf()));
        }

        let text = fs::read_to_string(input).map_err(|source| ReportError::Read {
            path: input.to_path_buf(),
            source,
        })?;
        info!(input = %input.display(), bytes = text.len(), "read match record");

        let report = Report::build(&text, self.max_games);

        let write_error = |source: io::Error| ReportError::Write {
            path: output.to_path_buf(),
            source,
        };
        let file = File::create(output).map_err(write_error)?;
        let mut writer = BufWriter::new(file);
        render(&mut writer, &report.tallies, &report.transcripts, &self.options)
            .map_err(write_error)?;
        writer.flush().map_err(write_error)?;

        let summary = ReportSummary {
            games_rendered: report.transcripts.len(),
            games_skipped: report.skipped.len(),
            participants: report.tallies.tallied().count(),
        };
        info!(
            output = %output.display(),
            rendered = summary.games_rendered,
            skipped = summary.games_skipped,
            "wrote report"
        );
        Ok(summary)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pgn::GameResult;

    const MIXED: &str = "[White \"A\"]\n[Black \"B\"]\n[Result \"1-0\"]\n\n\
        1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0\n\n\
        [White \"B\"]\n[Black \"A\"]\n[Result \"0-1\"]\n\n\
        1. e4 e5 2. Nf3 Nc6 3. Nxe4 0-1\n\n\
        [White \"A\"]\n[Black \"C\"]\n[Result \"1/2-1/2\"]\n\n\
        1. d4 d5 2. c4 e6 1/2-1/2\n";

    #[test]
    fn test_build_skips_illegal_game() {
        let report = Report::build(MIXED, None);
        assert_eq!(report.transcripts.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].game(), 2);

        let a = report.tallies.get("A").unwrap();
        assert_eq!((a.wins, a.draws, a.losses), (1, 1, 0));
        assert_eq!(report.tallies.get("B").unwrap().losses, 1);
        assert_eq!(report.tallies.get("C").unwrap().draws, 1);
    }

    #[test]
    fn test_build_respects_max_games() {
        let report = Report::build(MIXED, Some(1));
        assert_eq!(report.transcripts.len(), 1);
        assert_eq!(report.transcripts[0].result, Some(GameResult::WhiteWins));
        assert!(report.tallies.get("C").is_none());
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("matches/engine1-vs-engine2.pgn")),
            PathBuf::from("matches/engine1-vs-engine2.html")
        );
        assert_eq!(default_output_path(Path::new("games")), PathBuf::from("games.html"));
    }
}
