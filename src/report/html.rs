//! HTML report renderer
//!
//! A pure mapping from tallies and transcripts to one self-contained
//! document. Nothing is kept between calls.

use std::io::{self, Write};

use super::tally::{ParticipantTally, Tallies};
use super::transcript::Transcript;

pub const DEFAULT_TITLE: &str = "Chess Game Report";
pub const DEFAULT_ANALYSIS_URL: &str = "https://www.chess.com/analysis?tab=analysis";

const STYLE: &str = r#"  <style>
    body {
      font-family: sans-serif;
      max-width: 800px;
      margin: 2rem auto;
      padding: 1rem;
      background: #fdfdfd;
      color: #222;
    }
    h2 { margin-top: 2rem; }
    hr { margin: 2rem 0; }
    .merged-bar {
      display: flex;
      height: 20px;
      width: 300px;
      border: 1px solid #aaa;
      margin: 8px 0;
    }
    .bar-segment { height: 100%; }
    .win  { background-color: #4caf50; }
    .draw { background-color: #9e9e9e; }
    .loss { background-color: #f44336; }
    table.moves { border-collapse: collapse; font-family: monospace; }
    table.moves td { padding: 2px 12px 2px 0; }
    table.moves td.number { color: #777; text-align: right; }
    textarea {
      width: 100%;
      height: 200px;
      font-family: monospace;
      font-size: 14px;
    }
    button {
      margin-top: 10px;
      padding: 6px 12px;
    }
  </style>
"#;

const SCRIPT: &str = r#"  <script>
    function copyPGN(num) {
      const textarea = document.getElementById("pgn-" + num);
      textarea.select();
      document.execCommand("copy");
    }
    function openAnalysis(url) {
      window.open(url, "_blank");
    }
  </script>
"#;

/// Presentation settings for the rendered document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub title: String,
    /// Target of the per-game "Open Analysis" button; no button when `None`
    pub analysis_url: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            title: DEFAULT_TITLE.to_string(),
            analysis_url: Some(DEFAULT_ANALYSIS_URL.to_string()),
        }
    }
}

/// Escape text for use in element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Write the full report: participant bars first, then one section per game
pub fn render<W: Write>(
    writer: &mut W,
    tallies: &Tallies,
    transcripts: &[Transcript],
    options: &RenderOptions,
) -> io::Result<()> {
    write_head(writer, options)?;

    for (name, tally) in tallies.tallied() {
        writeln!(writer, "<h2>{} Results</h2>", escape_html(name))?;
        write_result_bar(writer, tally)?;
    }

    for transcript in transcripts {
        write_game(writer, transcript, options)?;
    }

    writer.write_all(SCRIPT.as_bytes())?;
    writeln!(writer, "</body>")?;
    writeln!(writer, "</html>")?;
    Ok(())
}

/// Render into an in-memory string
pub fn render_to_string(
    tallies: &Tallies,
    transcripts: &[Transcript],
    options: &RenderOptions,
) -> String {
    let mut buffer = Vec::new();
    // writing into a Vec cannot fail
    let _ = render(&mut buffer, tallies, transcripts, options);
    String::from_utf8_lossy(&buffer).into_owned()
}

fn write_head<W: Write>(writer: &mut W, options: &RenderOptions) -> io::Result<()> {
    let title = escape_html(&options.title);
    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html lang=\"en\">")?;
    writeln!(writer, "<head>")?;
    writeln!(writer, "  <meta charset=\"UTF-8\">")?;
    writeln!(writer, "  <title>{}</title>", title)?;
    writer.write_all(STYLE.as_bytes())?;
    writeln!(writer, "</head>")?;
    writeln!(writer, "<body>")?;
    writeln!(writer, "<h1>{}</h1>", title)?;
    Ok(())
}

/// Three flex segments sized by the win, draw and loss counts
fn write_result_bar<W: Write>(writer: &mut W, tally: &ParticipantTally) -> io::Result<()> {
    writeln!(writer, "<div class=\"merged-bar\">")?;
    writeln!(writer, "  <div class=\"bar-segment win\" style=\"flex: {};\"></div>", tally.wins)?;
    writeln!(writer, "  <div class=\"bar-segment draw\" style=\"flex: {};\"></div>", tally.draws)?;
    writeln!(writer, "  <div class=\"bar-segment loss\" style=\"flex: {};\"></div>", tally.losses)?;
    writeln!(writer, "</div>")?;
    writeln!(
        writer,
        "<div>Wins: {} &nbsp; Draws: {} &nbsp; Losses: {}</div>",
        tally.wins, tally.draws, tally.losses
    )?;
    Ok(())
}

fn write_game<W: Write>(
    writer: &mut W,
    transcript: &Transcript,
    options: &RenderOptions,
) -> io::Result<()> {
    let number = transcript.game_number;
    writeln!(
        writer,
        "<h2>Game {}: {} vs {} ({})</h2>",
        number,
        escape_html(&transcript.white),
        escape_html(&transcript.black),
        escape_html(&transcript.summary())
    )?;
    writeln!(writer, "<ul>")?;
    writeln!(writer, "  <li><strong>Date</strong>: {}</li>", escape_html(&transcript.date))?;
    writeln!(
        writer,
        "  <li><strong>Result</strong>: {}</li>",
        escape_html(&transcript.result_text)
    )?;
    writeln!(writer, "</ul>")?;

    writeln!(writer, "<table class=\"moves\">")?;
    for row in transcript.rows() {
        writeln!(
            writer,
            "  <tr><td class=\"number\">{}.</td><td>{}</td><td>{}</td></tr>",
            row.number,
            row.white.map(escape_html).unwrap_or_else(|| "...".to_string()),
            row.black.map(escape_html).unwrap_or_default()
        )?;
    }
    writeln!(writer, "</table>")?;

    writeln!(
        writer,
        "<textarea id=\"pgn-{}\" readonly>{}</textarea>",
        number,
        escape_html(&transcript.pgn())
    )?;
    writeln!(writer, "<button onclick=\"copyPGN({})\">Copy PGN</button>", number)?;
    if let Some(url) = &options.analysis_url {
        writeln!(
            writer,
            "<button data-url=\"{}\" onclick=\"openAnalysis(this.dataset.url)\">\
             Open Analysis</button>",
            escape_html(url)
        )?;
    }
    writeln!(writer, "<hr>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pgn::GameResult;

    fn transcript(
        number: usize,
        white: &str,
        black: &str,
        result: Option<GameResult>,
    ) -> Transcript {
        Transcript {
            game_number: number,
            white: white.to_string(),
            black: black.to_string(),
            date: "2025.01.15".to_string(),
            result,
            result_text: result.map_or("*", GameResult::as_token).to_string(),
            fen: None,
            moves: Vec::new(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_bars_only_for_tallied_participants() {
        let mut tallies = Tallies::new();
        tallies.record("Alpha", "Beta", Some(GameResult::WhiteWins));
        tallies.record("Gamma", "Delta", None);

        let html = render_to_string(&tallies, &[], &RenderOptions::default());
        assert!(html.contains("<h2>Alpha Results</h2>"));
        assert!(html.contains("<h2>Beta Results</h2>"));
        assert!(!html.contains("Gamma Results"));
        assert!(html.contains("Wins: 1 &nbsp; Draws: 0 &nbsp; Losses: 0"));
        assert!(html.contains("style=\"flex: 1;\""));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_bars_precede_game_sections() {
        let mut tallies = Tallies::new();
        tallies.record("Alpha", "Beta", Some(GameResult::Draw));
        let games = [transcript(3, "Alpha", "Beta", Some(GameResult::Draw))];

        let html = render_to_string(&tallies, &games, &RenderOptions::default());
        let bar = html.find("Alpha Results").unwrap();
        let game = html.find("<h2>Game 3: Alpha vs Beta (Draw)</h2>").unwrap();
        assert!(bar < game);
        assert!(html.contains("<textarea id=\"pgn-3\" readonly>"));
        assert!(html.contains("onclick=\"copyPGN(3)\""));
        assert!(html.contains(DEFAULT_ANALYSIS_URL));
    }

    #[test]
    fn test_user_text_is_escaped_and_analysis_link_optional() {
        let tallies = Tallies::new();
        let games = [transcript(1, "<script>", "Bob & Co", None)];
        let options = RenderOptions {
            title: "Round <1>".to_string(),
            analysis_url: None,
        };

        let html = render_to_string(&tallies, &games, &options);
        assert!(html.contains("<title>Round &lt;1&gt;</title>"));
        assert!(html.contains("Game 1: &lt;script&gt; vs Bob &amp; Co (Unfinished)"));
        assert!(!html.contains("Open Analysis"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let mut tallies = Tallies::new();
        tallies.record("A", "B", Some(GameResult::BlackWins));
        let games = [transcript(1, "A", "B", Some(GameResult::BlackWins))];
        let options = RenderOptions::default();
        assert_eq!(
            render_to_string(&tallies, &games, &options),
            render_to_string(&tallies, &games, &options)
        );
    }
}
