//! xlquiz-report — Render interview transcripts as HTML or Markdown.

pub mod html;
pub mod markdown;

/// Closing advice printed under every report.
pub const NEXT_STEPS: [&str; 3] = [
    "Review Excel tables & structured references (official docs / Microsoft Learn).",
    "Practice PivotTables and grouping by month (try sample datasets).",
    "For formulas, practice exact syntax and edge cases (COUNTIF/AVERAGEIF/SUMIFS).",
];

/// Monthly totals shown in the hands-on preview.
pub const MONTHLY_PREVIEW_ROWS: usize = 12;
