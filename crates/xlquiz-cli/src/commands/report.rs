//! The `xlquiz report` command.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use xlquiz_core::bank::QuestionBank;
use xlquiz_core::report::{InterviewReport, Transcript};
use xlquiz_report::html::generate_html;
use xlquiz_report::markdown::to_markdown;

pub fn execute(transcript_path: PathBuf, format: String, out: Option<PathBuf>) -> Result<()> {
    let transcript = Transcript::load_json(&transcript_path)?;
    let bank = QuestionBank::standard();

    let rendered = match format.as_str() {
        "markdown" | "md" => to_markdown(&transcript, &bank),
        "html" => generate_html(&transcript, &bank),
        "text" => render_text(&transcript.candidate, &transcript.report(&bank)),
        other => anyhow::bail!("unknown format '{other}' (expected text, markdown or html)"),
    };

    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            eprintln!("Report written to: {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Plain-text summary: a per-question table followed by the constructive summary.
pub fn render_text(candidate: &str, report: &InterviewReport) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Question", "Score", "Confidence", "Notes"]);
    for o in &report.outcomes {
        table.add_row(vec![
            Cell::new(&o.question_id),
            Cell::new(format!("{:.2}", o.score)),
            Cell::new(o.confidence),
            Cell::new(o.notes.join("; ")),
        ]);
    }

    let mut out = String::new();
    let _ = writeln!(out, "Candidate: {candidate}");
    let _ = writeln!(out, "{table}");

    let _ = writeln!(out, "\nStrengths:");
    if report.strengths.is_empty() {
        let _ = writeln!(out, "  (none detected)");
    }
    for s in &report.strengths {
        let _ = writeln!(out, "  + {s}");
    }

    let _ = writeln!(out, "\nAreas to improve:");
    if report.weaknesses.is_empty() {
        let _ = writeln!(out, "  (none detected)");
    }
    for (prompt, tip) in &report.weaknesses {
        let _ = writeln!(out, "  - {prompt}\n    Suggested next step: {tip}");
    }

    let _ = writeln!(out, "\nFlagged for human review: {}", report.review_queue.len());
    for r in &report.review_queue {
        let _ = writeln!(out, "  ! {}", r.question);
    }

    let _ = write!(out, "\nOverall score: {:.1} / 100", report.overall);
    out
}
