//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use xlquiz_core::bank::QuestionBank;
use xlquiz_core::report::Transcript;

use crate::{MONTHLY_PREVIEW_ROWS, NEXT_STEPS};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn list_items(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("<li><code>{}</code></li>", html_escape(s)))
        .collect::<Vec<_>>()
        .join("")
}

/// Generate an HTML report from a transcript.
pub fn generate_html(transcript: &Transcript, bank: &QuestionBank) -> String {
    let report = transcript.report(bank);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Excel Mock Interview: {}</title>\n",
        html_escape(&transcript.candidate)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Excel Mock Interview</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Candidate: <strong>{}</strong> | {} of {} questions | {} to {}</p>\n",
        html_escape(&transcript.candidate),
        report.outcomes.len(),
        bank.len(),
        transcript.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        transcript.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
    ));
    html.push_str(&format!(
        "<p><span class=\"badge\">Overall: {:.1} / 100</span></p>\n",
        transcript.overall
    ));
    html.push_str("</header>\n");

    // Per-question detail
    html.push_str("<section class=\"detail\">\n");
    html.push_str("<h2>Answers &amp; notes</h2>\n");
    for o in &report.outcomes {
        let answer = if o.answer.is_empty() {
            "(skipped)".to_string()
        } else {
            html_escape(&o.answer)
        };
        html.push_str("<div class=\"card\">\n");
        html.push_str(&format!("<p><strong>Q:</strong> {}</p>\n", html_escape(&o.prompt)));
        html.push_str(&format!("<p>Answer: <code>{answer}</code></p>\n"));
        html.push_str(&format!(
            "<p class=\"small\">Confidence: <span class=\"{}\">{}</span> | Score (0–1): {:.3}</p>\n",
            o.confidence.css_class(),
            o.confidence,
            o.score
        ));
        html.push_str(&format!("<ul class=\"notes\">{}</ul>\n", list_items(&o.notes)));
        html.push_str(&format!(
            "<p>Feedback: {}</p>\n",
            html_escape(&o.feedback)
        ));
        html.push_str("</div>\n");
    }
    html.push_str("</section>\n");

    // Constructive summary
    html.push_str("<section class=\"summary\">\n");
    html.push_str("<h2>Constructive Summary</h2>\n");

    html.push_str("<h3>Strengths</h3>\n<ul>\n");
    if report.strengths.is_empty() {
        html.push_str("<li>(none detected)</li>\n");
    }
    for s in &report.strengths {
        html.push_str(&format!("<li>{}</li>\n", html_escape(s)));
    }
    html.push_str("</ul>\n");

    html.push_str("<h3>Areas to improve</h3>\n<ul>\n");
    if report.weaknesses.is_empty() {
        html.push_str("<li>(none detected)</li>\n");
    }
    for (prompt, tip) in &report.weaknesses {
        html.push_str(&format!(
            "<li>{}<br><span class=\"small\">Suggested next step: {}</span></li>\n",
            html_escape(prompt),
            html_escape(tip)
        ));
    }
    html.push_str("</ul>\n");

    html.push_str("<h3>Flagged for human review</h3>\n");
    if report.review_queue.is_empty() {
        html.push_str("<p>None</p>\n");
    } else {
        html.push_str(&format!(
            "<p>{} answers flagged as Low confidence:</p>\n<table class=\"review\">\n",
            report.review_queue.len()
        ));
        html.push_str("<thead><tr><th>Question</th><th>Answer</th><th>Notes</th></tr></thead>\n<tbody>\n");
        for r in &report.review_queue {
            let answer = if r.answer.is_empty() {
                "(skipped)".to_string()
            } else {
                html_escape(&r.answer)
            };
            html.push_str(&format!(
                "<tr class=\"low\"><td>{}</td><td>{}</td><td><ul>{}</ul></td></tr>\n",
                html_escape(&r.question),
                answer,
                list_items(&r.notes)
            ));
        }
        html.push_str("</tbody></table>\n");
    }

    html.push_str("<h3>Next steps / Resources</h3>\n<ul>\n");
    for step in NEXT_STEPS {
        html.push_str(&format!("<li>{}</li>\n", html_escape(step)));
    }
    html.push_str("</ul>\n");
    html.push_str("</section>\n");

    // Hands-on monthly totals
    if let Some(monthly) = &transcript.monthly_totals {
        html.push_str("<section class=\"hands-on\">\n");
        html.push_str("<h2>Hands-on monthly totals (preview)</h2>\n");
        html.push_str("<table>\n<thead><tr><th>Month</th><th>Total</th></tr></thead>\n<tbody>\n");
        for m in monthly.iter().take(MONTHLY_PREVIEW_ROWS) {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>\n",
                m.month.format("%Y-%m"),
                m.total
            ));
        }
        html.push_str("</tbody></table>\n</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Transcript JSON</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(transcript).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(transcript: &Transcript, bank: &QuestionBank, path: &Path) -> Result<()> {
    let html = generate_html(transcript, bank);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fbfdff; --fg: #1a1a1a; --border: #e5e7eb; --card: #fff; --low: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --card: #1f2937; --low: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta, .small { color: #6b7280; font-size: 0.85rem; }
.badge { background: #eef2ff; color: #1e3a8a; padding: 6px 10px; border-radius: 999px; font-weight: 600; }
.card { background: var(--card); border: 1px solid var(--border); border-radius: 12px; padding: 1rem; margin-bottom: 0.75rem; }
.conf-high { color: #065f46; font-weight: 700; }
.conf-med { color: #b45309; font-weight: 700; }
.conf-low { color: #b91c1c; font-weight: 700; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; vertical-align: top; }
th { background: var(--border); }
.low { background: var(--low); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;
