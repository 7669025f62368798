//! Transcript output for completed games.
//!
//! Each game produces two files: a PGN record of the accepted moves for
//! chess software, and a JSON dump of the full report (every attempt,
//! rejections included) for later analysis.

use chrono::Utc;
use match_referee::{GameReport, Winner};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

fn result_tag(report: &GameReport) -> &'static str {
    match report.winner {
        Winner::White => "1-0",
        Winner::Black => "0-1",
        Winner::Draw => "1/2-1/2",
        Winner::Undecided => "*",
    }
}

/// Writes the accepted moves of a finished game as a PGN file.
///
/// Moves are written in coordinate notation, which most chess software
/// accepts alongside SAN.
pub fn write_pgn<P: AsRef<Path>>(path: P, report: &GameReport) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;

    writeln!(file, "[Event \"Proposer match\"]")?;
    writeln!(file, "[Site \"local\"]")?;
    writeln!(file, "[Date \"{}\"]", Utc::now().format("%Y.%m.%d"))?;
    writeln!(file, "[White \"{}\"]", report.white)?;
    writeln!(file, "[Black \"{}\"]", report.black)?;
    writeln!(file, "[Result \"{}\"]", result_tag(report))?;
    writeln!(file)?;

    let mut text = String::new();
    let accepted = report.turns.iter().filter(|t| t.outcome.accepted);
    for (i, record) in accepted.enumerate() {
        if i % 2 == 0 {
            text.push_str(&format!("{}. ", i / 2 + 1));
        }
        text.push_str(&record.token);
        text.push(' ');
    }
    text.push_str(result_tag(report));
    writeln!(file, "{}", text)?;
    Ok(())
}

#[derive(Serialize)]
struct ReportJson<'a> {
    id: &'a str,
    created_at: String,
    #[serde(flatten)]
    report: &'a GameReport,
}

/// Writes the full structured report as pretty-printed JSON.
pub fn write_json<P: AsRef<Path>>(path: P, id: &str, report: &GameReport) -> std::io::Result<()> {
    let json = ReportJson {
        id,
        created_at: Utc::now().to_rfc3339(),
        report,
    };
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use match_referee::{Completion, GameStatus, MoveOutcome, TurnRecord, Winner};
    use std::fs;

    fn sample_report() -> GameReport {
        GameReport {
            white: "white".to_string(),
            black: "black".to_string(),
            completion: Completion::TurnLimit,
            status: GameStatus::InProgress,
            winner: Winner::Undecided,
            final_fen: "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1".to_string(),
            plies_played: 1,
            forfeited_plies: 0,
            turns: vec![TurnRecord {
                side: chess_model::Color::White,
                token: "e2e4".to_string(),
                outcome: MoveOutcome {
                    accepted: true,
                    reject_reason: None,
                    is_check: false,
                    is_checkmate: false,
                    is_stalemate: false,
                    description: "Moved white pawn from e2 to e4.".to_string(),
                },
            }],
        }
    }

    #[test]
    fn pgn_contains_headers_and_moves() {
        let path = std::env::temp_dir().join("match-runner-test.pgn");
        write_pgn(&path, &sample_report()).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[Event \"Proposer match\"]"));
        assert!(contents.contains("[White \"white\"]"));
        assert!(contents.contains("[Result \"*\"]"));
        assert!(contents.contains("1. e2e4 *"));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn json_contains_id_and_turns() {
        let path = std::env::temp_dir().join("match-runner-test.json");
        write_json(&path, "game-1", &sample_report()).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"id\": \"game-1\""));
        assert!(contents.contains("\"created_at\""));
        assert!(contents.contains("\"token\": \"e2e4\""));
        assert!(contents.contains("\"completion\": \"turn_limit\""));
        fs::remove_file(&path).ok();
    }
}
