//! Markdown report generator.

use std::path::Path;

use anyhow::{Context, Result};

use xlquiz_core::bank::QuestionBank;
use xlquiz_core::report::Transcript;

use crate::{MONTHLY_PREVIEW_ROWS, NEXT_STEPS};

/// Keep table cells on one line and stop `|` from splitting columns.
fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Format a transcript as a Markdown report.
pub fn to_markdown(transcript: &Transcript, bank: &QuestionBank) -> String {
    let report = transcript.report(bank);
    let mut md = String::new();

    md.push_str("# Excel Mock Interview\n\n");
    md.push_str(&format!(
        "**Candidate:** {} | **Started:** {} | **Finished:** {}\n\n",
        transcript.candidate,
        transcript.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        transcript.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
    ));
    md.push_str(&format!(
        "**Overall score:** {:.1} / 100\n\n",
        transcript.overall
    ));

    md.push_str("## Answers\n\n");
    md.push_str("| Question | Answer | Score | Confidence | Notes |\n");
    md.push_str("|----------|--------|-------|------------|-------|\n");
    for o in &report.outcomes {
        let answer = if o.answer.is_empty() {
            "(skipped)".to_string()
        } else {
            format!("`{}`", cell(&o.answer))
        };
        md.push_str(&format!(
            "| {} | {} | {:.3} | {} | {} |\n",
            cell(&o.prompt),
            answer,
            o.score,
            o.confidence,
            cell(&o.notes.join("; "))
        ));
    }
    md.push('\n');

    md.push_str("## Constructive Summary\n\n");

    md.push_str("### Strengths\n\n");
    if report.strengths.is_empty() {
        md.push_str("- (none detected)\n");
    }
    for s in &report.strengths {
        md.push_str(&format!("- {s}\n"));
    }
    md.push('\n');

    md.push_str("### Areas to improve\n\n");
    if report.weaknesses.is_empty() {
        md.push_str("- (none detected)\n");
    }
    for (prompt, tip) in &report.weaknesses {
        md.push_str(&format!("- {prompt}\n  - Suggested next step: {tip}\n"));
    }
    md.push('\n');

    md.push_str("### Flagged for human review\n\n");
    if report.review_queue.is_empty() {
        md.push_str("None\n\n");
    } else {
        md.push_str(&format!(
            "{} answers flagged as Low confidence:\n\n",
            report.review_queue.len()
        ));
        for r in &report.review_queue {
            let answer = if r.answer.is_empty() {
                "(skipped)"
            } else {
                r.answer.as_str()
            };
            md.push_str(&format!(
                "- {}\n  - Answer: {}\n  - Notes: {}\n",
                r.question,
                answer,
                r.notes.join("; ")
            ));
        }
        md.push('\n');
    }

    md.push_str("### Next steps / Resources\n\n");
    for step in NEXT_STEPS {
        md.push_str(&format!("- {step}\n"));
    }

    if let Some(monthly) = &transcript.monthly_totals {
        md.push_str("\n## Hands-on monthly totals\n\n");
        md.push_str("| Month | Total |\n");
        md.push_str("|-------|-------|\n");
        for m in monthly.iter().take(MONTHLY_PREVIEW_ROWS) {
            md.push_str(&format!("| {} | {} |\n", m.month.format("%Y-%m"), m.total));
        }
    }

    md
}

/// Write a Markdown report to a file.
pub fn write_markdown_report(
    transcript: &Transcript,
    bank: &QuestionBank,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_markdown(transcript, bank))
        .with_context(|| format!("failed to write markdown report to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use chrono::NaiveDate;
    use xlquiz_core::table::MonthlyTotal;

    #[test]
    fn markdown_output() {
        let md = to_markdown(&fixtures::transcript(), &QuestionBank::standard());

        assert!(md.starts_with("# Excel Mock Interview"));
        assert!(md.contains("**Candidate:** Ada & Co"));
        assert!(md.contains("**Overall score:** 50.0 / 100"));
        assert!(md.contains("| 1.000 | High |"));
        assert!(md.contains("(skipped)"));
        assert!(md.contains("### Flagged for human review"));
        assert!(md.contains("1 answers flagged as Low confidence"));
        assert!(md.contains(NEXT_STEPS[2]));
        assert!(!md.contains("Hands-on monthly totals"));
    }

    #[test]
    fn pipes_in_answers_do_not_break_tables() {
        let mut transcript = fixtures::transcript();
        transcript
            .responses
            .insert("q1".into(), "=SUMIFS(B:B|A:A)\nline two".into());
        let md = to_markdown(&transcript, &QuestionBank::standard());
        assert!(md.contains("`=SUMIFS(B:B\\|A:A) line two`"));
    }

    #[test]
    fn monthly_totals_are_capped() {
        let mut transcript = fixtures::transcript();
        transcript.monthly_totals = Some(
            (1..=12)
                .chain(1..=6)
                .enumerate()
                .map(|(i, m)| MonthlyTotal {
                    month: NaiveDate::from_ymd_opt(2023 + (i / 12) as i32, m, 1).unwrap(),
                    total: 10.0,
                })
                .collect(),
        );
        let md = to_markdown(&transcript, &QuestionBank::standard());
        assert!(md.contains("| 2023-12 | 10 |"));
        assert!(!md.contains("| 2024-01 | 10 |"));
    }

    #[test]
    fn markdown_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        write_markdown_report(&fixtures::transcript(), &QuestionBank::standard(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Constructive Summary"));
    }
}
