//! The `xlquiz interview` command.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use xlquiz_core::bank::{Question, QuestionBank};
use xlquiz_core::config::load_config_from;
use xlquiz_core::confidence::Confidence;
use xlquiz_core::error::SessionError;
use xlquiz_core::session::Session;
use xlquiz_core::table::Table;
use xlquiz_report::html::write_html_report;
use xlquiz_report::markdown::write_markdown_report;

use super::report::render_text;

const SKIP: &str = ":skip";
const UPLOAD: &str = ":upload";

pub fn execute(
    candidate: Option<String>,
    output: Option<PathBuf>,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let candidate = candidate.unwrap_or(config.candidate_name);
    let output = output.unwrap_or(config.output_dir);
    let formats: Vec<String> = match format {
        Some(f) if f == "all" => vec!["json".into(), "html".into(), "markdown".into()],
        Some(f) => f.split(',').map(|s| s.trim().to_string()).collect(),
        None if config.formats.iter().any(|f| f == "all") => {
            vec!["json".into(), "html".into(), "markdown".into()]
        }
        None => config.formats,
    };

    let mut session = Session::new(QuestionBank::standard()).with_preview_rows(config.preview_rows);
    session.start(candidate, chrono::Utc::now());

    print_intro(&session);
    let stdin = std::io::stdin();
    run(&mut session, stdin.lock())?;

    if !session.has_responses() {
        eprintln!("No answers recorded; nothing to export.");
        return Ok(());
    }

    let report = session.report();
    println!("\n{}", render_text(session.candidate(), &report));

    let transcript = session.transcript(chrono::Utc::now())?;
    let bank = session.bank();
    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create output directory {}", output.display()))?;
    let timestamp = transcript.finished_at.format("%Y-%m-%dT%H%M%S");

    // The JSON transcript is always written.
    let path = output.join(format!("transcript-{timestamp}.json"));
    transcript.save_json(&path)?;
    eprintln!("Transcript saved to: {}", path.display());

    for fmt in &formats {
        match fmt.as_str() {
            "json" => {}
            "html" => {
                let path = output.join(format!("report-{timestamp}.html"));
                write_html_report(&transcript, bank, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            "markdown" | "md" => {
                let path = output.join(format!("report-{timestamp}.md"));
                write_markdown_report(&transcript, bank, &path)?;
                eprintln!("Markdown report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

fn print_intro(session: &Session) {
    let bank = session.bank();
    println!("Excel Mock Interview");
    println!(
        "Candidate: {} | {} questions (formulas, debugging, concepts, hands-on)",
        session.candidate(),
        bank.len()
    );
    println!("Type one answer per line. `{SKIP}` skips a question.");
    println!("On the hands-on question, `{UPLOAD} PATH` attaches a CSV/XLSX with Date and Sales columns.");
    println!("Scores are keyword-based; low-confidence answers are flagged for human review.");
}

fn print_question(question: &Question, index: usize, total: usize) {
    println!("\nQ{}/{} [{}] {}", index + 1, total, question.kind, question.prompt);
    println!("  Example: {}", question.example_answer);
}

/// Feed input lines to the session until it completes or input runs out.
fn run<R: BufRead>(session: &mut Session, input: R) -> Result<()> {
    let total = session.bank().len();
    let mut lines = input.lines();

    'questions: while let Some(question) = session.current_question().cloned() {
        print_question(&question, session.answered(), total);

        loop {
            let Some(line) = lines.next() else {
                eprintln!(
                    "Input ended after {} of {} questions.",
                    session.answered(),
                    total
                );
                break 'questions;
            };
            let line = line.context("failed to read answer from stdin")?;
            let command = line.trim();

            if command == SKIP {
                session.skip()?;
                println!("  Skipped.");
                break;
            }

            if let Some(path) = command.strip_prefix(UPLOAD) {
                upload(session, Path::new(path.trim()))?;
                continue;
            }

            let grade = session.submit(&line)?;
            println!(
                "  Recorded. Score {:.2} ({})",
                grade.score,
                Confidence::from_score(grade.score)
            );
            break;
        }
    }

    Ok(())
}

/// Attach a CSV or spreadsheet to the current question. Problems with the
/// file are reported and the interview carries on.
fn upload(session: &mut Session, path: &Path) -> Result<()> {
    let table = match Table::from_path(path) {
        Ok(table) => table,
        Err(e) => {
            println!("  Could not read {}: {e}", path.display());
            return Ok(());
        }
    };

    match session.upload(&table) {
        Ok(validation) => {
            println!("  Loaded {} rows. {}", table.len(), validation.note);
            println!("  Now type your answer for this question.");
            Ok(())
        }
        Err(e @ SessionError::UploadNotAccepted { .. }) => {
            println!("  {e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> Session {
        let mut session = Session::new(QuestionBank::standard());
        session.start("Test", chrono::Utc::now());
        session
    }

    #[test]
    fn full_input_completes_interview() {
        let mut session = started();
        let input: String = session
            .bank()
            .questions()
            .iter()
            .map(|q| format!("{}\n", q.example_answer))
            .collect();

        run(&mut session, input.as_bytes()).unwrap();
        assert!(session.is_complete());
        assert_eq!(session.answered(), 10);
    }

    #[test]
    fn skip_command_records_zero() {
        let mut session = started();
        run(&mut session, ":skip\n".as_bytes()).unwrap();
        assert_eq!(session.answered(), 1);
        assert_eq!(session.grades()["q1"].notes, vec!["skipped".to_string()]);
        assert_eq!(session.responses()["q1"], "");
    }

    #[test]
    fn eof_stops_early() {
        let mut session = started();
        run(&mut session, "=SUMIFS(B:B,A:A,\"x\")\n".as_bytes()).unwrap();
        assert!(!session.is_complete());
        assert_eq!(session.answered(), 1);
    }

    #[test]
    fn upload_outside_hands_on_does_not_advance() {
        let mut session = started();
        run(&mut session, ":upload nowhere.csv\n".as_bytes()).unwrap();
        assert_eq!(session.answered(), 0);
    }

    #[test]
    fn upload_on_hands_on_adds_validator_note() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("sales.csv");
        std::fs::write(&csv, "Date,Sales\n2024-01-05,100\n2024-02-10,50\n").unwrap();

        let mut session = started();
        let mut input = ":skip\n".repeat(9);
        input.push_str(&format!(":upload {}\n", csv.display()));
        input.push_str("pivot with month in rows and sum of sales in values, then a line chart\n");

        run(&mut session, input.as_bytes()).unwrap();
        assert!(session.is_complete());
        let notes = &session.grades()["q10"].notes;
        assert_eq!(notes.len(), 2);
        assert!(notes[1].starts_with("Pivot OK: found 2 months"));
        assert!(session.monthly().is_some());
    }
}
