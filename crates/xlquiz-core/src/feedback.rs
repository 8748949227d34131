//! Turns grading notes into short, human-readable tips.

/// Questions whose fallback tip asks for exact formula syntax.
const FORMULA_QUESTIONS: [&str; 5] = ["q1", "q2", "q3", "q4", "q5"];

const MAX_TIPS: usize = 2;

const FORMULA_FALLBACK: &str = "If unsure, include the exact formula syntax (e.g., =SUMIFS(...)).";
const GENERAL_FALLBACK: &str =
    "Try to mention concrete functions or steps (keywords help the grader).";

/// Build the feedback line for a question from its notes.
pub fn feedback(question_id: &str, notes: &[String]) -> String {
    let joined = notes.join(" ").to_lowercase();
    let has = |needle: &str| joined.contains(needle);

    let mut tips: Vec<&str> = Vec::new();
    if has("sumifs") {
        tips.push("Good: you used SUMIFS. Tip: consider using Table references for robustness.");
    }
    if has("sumif") && !has("sumifs") {
        tips.push(
            "Partial: SUMIF works for single conditions; SUMIFS handles multiple conditions.",
        );
    }
    if has("xlookup") || has("index") {
        tips.push("Good: using XLOOKUP/INDEX+MATCH is robust to column re-ordering.");
    }
    if has("countif") || has("counta") {
        tips.push("COUNTIF / COUNTA are good for counting text/non-empty cells.");
    }
    if has("average") {
        tips.push("AVERAGE ignores blanks; AVERAGEIF can help with conditions.");
    }
    if has("year") {
        tips.push("YEAR() extracts year from dates, useful for grouping by year.");
    }
    if has("div0") || has("divide") {
        tips.push(
            "Check denominators and handle zero or blank cases (IFERROR or conditional checks).",
        );
    }
    if has("pivot") || has("chart") {
        tips.push("Good: use PivotTables or Group by Month to summarize time-series data.");
    }

    if tips.is_empty() {
        if FORMULA_QUESTIONS.contains(&question_id) {
            tips.push(FORMULA_FALLBACK);
        } else {
            tips.push(GENERAL_FALLBACK);
        }
    }

    tips.truncate(MAX_TIPS);
    tips.join(" ")
}
