use std::fs;
use std::path::{Path, PathBuf};

use pgnreport::report::RenderOptions;
use pgnreport::{parse_games, GameError, GameResult, Report, ReportError, ReportGenerator};

// Integration tests for the report pipeline
// These drive the full workflow from a match record file to the HTML document

const MATCH_PGN: &str = "test/data/match.pgn";

fn scratch_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pgnreport-tests-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("Failed to create scratch directory");
    dir.join(name)
}

/// Test data validation - ensures the fixture holds the games the other tests expect
#[test]
fn test_fixture_parses_into_six_games() {
    let text = fs::read_to_string(MATCH_PGN).expect("Failed to read match.pgn fixture");
    let parsed = parse_games(&text);

    assert_eq!(parsed.len(), 6, "Expected exactly 6 games in the fixture");
    assert!(parsed[0].is_ok());
    assert!(matches!(parsed[3], Err(GameError::MalformedRecord { game: 4, .. })));
    // game 5 parses, but its moves cannot be replayed
    assert!(parsed[4].is_ok());
}

#[test]
fn test_report_from_fixture() {
    let text = fs::read_to_string(MATCH_PGN).unwrap();
    let report = Report::build(&text, None);

    assert_eq!(report.transcripts.len(), 4, "Games 1, 2, 3 and 6 should be rendered");
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped[0].game(), 4);
    assert_eq!(report.skipped[1].game(), 5);
    assert!(matches!(report.skipped[1], GameError::IllegalMoveReference { ply: 3, .. }));

    let a = report.tallies.get("Engine A").unwrap();
    assert_eq!((a.wins, a.draws, a.losses), (2, 1, 0));
    let b = report.tallies.get("Engine B").unwrap();
    assert_eq!((b.wins, b.draws, b.losses), (0, 1, 2));
    let c = report.tallies.get("Engine C").unwrap();
    assert_eq!(c.total(), 0, "Unfinished games are not tallied");
}

#[test]
fn test_transcripts_match_recorded_notation() {
    let text = fs::read_to_string(MATCH_PGN).unwrap();
    let report = Report::build(&text, None);

    let opera = &report.transcripts[0];
    assert_eq!(opera.game_number, 1);
    assert_eq!(opera.moves.len(), 33);
    assert_eq!(
        opera.movetext(),
        "1. e4 e5 2. Nf3 d6 3. d4 Bg4 4. dxe5 Bxf3 5. Qxf3 dxe5 6. Bc4 Nf6 7. Qb3 Qe7 \
         8. Nc3 c6 9. Bg5 b5 10. Nxb5 cxb5 11. Bxb5+ Nbd7 12. O-O-O Rd8 13. Rxd7 Rxd7 \
         14. Rd1 Qe6 15. Bxd7+ Nxd7 16. Qb8+ Nxb8 17. Rd8#"
    );

    let fools_mate = &report.transcripts[1];
    assert_eq!(fools_mate.moves.last().unwrap().san, "Qh4#");
    assert_eq!(fools_mate.summary(), "Engine A wins");

    let draw = &report.transcripts[2];
    assert_eq!(draw.result, Some(GameResult::Draw));
    assert!(draw.movetext().ends_with("5. O-O Be7"));

    let unfinished = &report.transcripts[3];
    assert_eq!(unfinished.game_number, 6);
    assert_eq!(unfinished.date, "Unknown");
    assert_eq!(unfinished.result, Some(GameResult::Unfinished));
}

#[test]
fn test_html_structure() {
    let text = fs::read_to_string(MATCH_PGN).unwrap();
    let html = Report::build(&text, None).render_html(&RenderOptions::default());

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert_eq!(html.matches("class=\"merged-bar\"").count(), 2, "Only A and B have tallied games");
    assert!(html.contains("<h2>Engine A Results</h2>"));
    assert!(!html.contains("Engine C Results"));
    assert!(html.contains("Wins: 2 &nbsp; Draws: 1 &nbsp; Losses: 0"));

    assert_eq!(html.matches("<textarea").count(), 4);
    assert!(html.contains("<h2>Game 1: Engine A vs Engine B (Engine A wins)</h2>"));
    assert!(html.contains("<h2>Game 6: Engine B vs Engine C (Unfinished)</h2>"));
    assert!(!html.contains("Game 4:"));
    assert!(!html.contains("Game 5:"));
    assert!(html.contains("<td class=\"number\">12.</td><td>O-O-O</td><td>Rd8</td>"));

    let bars_end = html.rfind("Results</h2>").unwrap();
    let first_game = html.find("<h2>Game 1:").unwrap();
    assert!(bars_end < first_game, "Bars come before game sections");
}

/// One well-formed game and one with an unrecognized move token
#[test]
fn test_malformed_game_isolation() {
    let text = "[White \"A\"]\n[Black \"B\"]\n[Result \"1-0\"]\n\n\
                1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0\n\n\
                [White \"B\"]\n[Black \"A\"]\n[Result \"1-0\"]\n\n1. e4 e5 2. Bogus Nc6 1-0\n";
    let report = Report::build(text, None);

    assert_eq!(report.transcripts.len(), 1);
    let a = report.tallies.get("A").unwrap();
    let b = report.tallies.get("B").unwrap();
    assert_eq!((a.wins, a.draws, a.losses), (1, 0, 0));
    assert_eq!((b.wins, b.draws, b.losses), (0, 0, 1));

    let html = report.render_html(&RenderOptions::default());
    assert_eq!(html.matches("<textarea").count(), 1);
}

/// Records saved by some Windows tools start with a byte-order mark
#[test]
fn test_record_with_byte_order_mark() {
    let text = fs::read_to_string(MATCH_PGN).unwrap();
    let report = Report::build(&format!("\u{feff}{}", text), None);

    assert_eq!(report.transcripts.len(), 4);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.transcripts[0].game_number, 1);
    assert_eq!(report.transcripts[0].white, "Engine A");
}

#[test]
fn test_generate_writes_output_file() {
    let output = scratch_path("match.html");
    let _ = fs::remove_file(&output);

    let summary = ReportGenerator::new()
        .with_title("Engine Match")
        .generate(Path::new(MATCH_PGN), &output)
        .expect("Report generation should succeed");

    assert_eq!(summary.games_rendered, 4);
    assert_eq!(summary.games_skipped, 2);
    assert_eq!(summary.participants, 2);

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("<h1>Engine Match</h1>"));
    assert!(html.trim_end().ends_with("</html>"));
}

#[test]
fn test_generate_refuses_to_overwrite_without_force() {
    let output = scratch_path("existing.html");
    fs::write(&output, "keep me").unwrap();

    let result = ReportGenerator::new().generate(Path::new(MATCH_PGN), &output);
    assert!(matches!(result, Err(ReportError::OutputExists(_))));
    assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");

    let result = ReportGenerator::new()
        .with_overwrite(true)
        .with_max_games(1)
        .generate(Path::new(MATCH_PGN), &output);
    assert_eq!(result.unwrap().games_rendered, 1);
}

/// Fatal errors abort the batch
#[test]
fn test_generate_error_handling() {
    let result = ReportGenerator::new().generate(
        Path::new("test/data/nonexistent.pgn"),
        &scratch_path("nonexistent.html"),
    );
    assert!(matches!(result, Err(ReportError::Read { .. })));

    let unwritable = scratch_path("no-such-dir").join("deeper").join("out.html");
    let result = ReportGenerator::new().generate(Path::new(MATCH_PGN), &unwritable);
    assert!(matches!(result, Err(ReportError::Write { .. })));
}
