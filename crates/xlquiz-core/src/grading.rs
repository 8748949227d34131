//! Keyword grading rules.
//!
//! Each question id maps to one pure rule function. Formula questions are
//! matched against a normalized answer (whitespace stripped, uppercased);
//! prose questions are matched against the lowercased answer.

use serde::{Deserialize, Serialize};

use crate::bank::Question;

/// Outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    /// Score in `[0, 1]`.
    pub score: f64,
    /// Short evidence notes, in the order they were produced.
    pub notes: Vec<String>,
}

impl Grade {
    pub fn new(score: f64, notes: Vec<String>) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
            notes,
        }
    }

    fn single(score: f64, note: impl Into<String>) -> Self {
        Self::new(score, vec![note.into()])
    }

    /// The grade recorded for a skipped question.
    pub fn skipped() -> Self {
        Self::single(0.0, "skipped")
    }
}

/// A grading rule: answer text in, grade out.
pub type Rule = fn(&str) -> Grade;

/// Dispatch table from question id to rule.
pub const RULES: &[(&str, Rule)] = &[
    ("q1", check_sumifs),
    ("q2", check_lookup),
    ("q3", check_count_text),
    ("q4", check_average),
    ("q5", check_year),
    ("q6", check_div0),
    ("q7", check_sum_zero),
    ("q8", check_references),
    ("q9", check_lookup_differences),
    ("q10", check_pivot_steps),
];

/// Find the rule for a question id.
pub fn rule_for(question_id: &str) -> Option<Rule> {
    RULES
        .iter()
        .find(|(id, _)| *id == question_id)
        .map(|(_, rule)| *rule)
}

/// Grade an answer to a question. Never fails.
pub fn grade(question: &Question, answer: &str) -> Grade {
    grade_by_id(&question.id, answer)
}

/// Grade an answer given only the question id.
pub fn grade_by_id(question_id: &str, answer: &str) -> Grade {
    let grade = match rule_for(question_id) {
        Some(rule) => rule(answer),
        None => Grade::single(0.0, "no rule"),
    };
    tracing::debug!(question = question_id, score = grade.score, "graded answer");
    grade
}

/// Strip all whitespace and uppercase, for formula matching.
pub fn normalize(answer: &str) -> String {
    answer
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Count how many keyword groups have at least one member present.
fn count_groups(text: &str, groups: &[&[&str]]) -> usize {
    groups
        .iter()
        .filter(|group| group.iter().any(|w| text.contains(w)))
        .count()
}

fn check_sumifs(answer: &str) -> Grade {
    let a = normalize(answer);
    if a.contains("SUMIFS") {
        Grade::single(1.0, "Uses SUMIFS")
    } else if a.contains("SUMIF") {
        Grade::single(0.9, "Uses SUMIF (acceptable)")
    } else {
        Grade::single(0.0, "SUMIF(S) not detected")
    }
}

fn check_lookup(answer: &str) -> Grade {
    let a = normalize(answer);
    if a.contains("XLOOKUP") || (a.contains("INDEX") && a.contains("MATCH")) {
        Grade::single(1.0, "Uses XLOOKUP / INDEX+MATCH")
    } else {
        Grade::single(0.0, "XLOOKUP / INDEX+MATCH not detected")
    }
}

fn check_count_text(answer: &str) -> Grade {
    let a = normalize(answer);
    if a.contains("COUNTIF") || a.contains("COUNTA") {
        Grade::single(1.0, "Uses COUNTIF/COUNTA")
    } else {
        Grade::single(0.0, "COUNTIF/COUNTA not detected")
    }
}

fn check_average(answer: &str) -> Grade {
    // AVERAGEIF contains AVERAGE, so one check covers both.
    if normalize(answer).contains("AVERAGE") {
        Grade::single(1.0, "Uses AVERAGE/AVERAGEIF")
    } else {
        Grade::single(0.0, "AVERAGE not detected")
    }
}

fn check_year(answer: &str) -> Grade {
    if normalize(answer).contains("YEAR(") {
        Grade::single(1.0, "Uses YEAR()")
    } else {
        Grade::single(0.0, "YEAR() not detected")
    }
}

fn check_div0(answer: &str) -> Grade {
    let t = answer.to_lowercase();
    let hits = count_groups(&t, &[&["zero", "divide"], &["blank", "empty"]]);
    Grade::single(hits as f64 / 2.0, format!("matched {hits} causes"))
}

fn check_sum_zero(answer: &str) -> Grade {
    let t = answer.to_lowercase();
    let hits = count_groups(
        &t,
        &[&["text"], &["format", "formatted"], &["hidden", "space"]],
    );
    Grade::single(hits as f64 / 3.0, format!("matched {hits} reasons"))
}

fn check_references(answer: &str) -> Grade {
    let t = answer.to_lowercase();
    if ["absolute", "relative", "$a$1", "a1"]
        .iter()
        .any(|w| t.contains(w))
    {
        Grade::single(1.0, "Explains absolute vs relative")
    } else {
        Grade::single(0.0, "Does not explain absolute vs relative")
    }
}

fn check_lookup_differences(answer: &str) -> Grade {
    let t = answer.to_lowercase();
    if ["xlookup", "vlookup", "index", "match", "both directions"]
        .iter()
        .any(|w| t.contains(w))
    {
        Grade::single(1.0, "Mentions key differences")
    } else {
        Grade::single(0.0, "Does not mention differences")
    }
}

const PIVOT_KEYWORDS: [&str; 8] = [
    "pivot", "chart", "rows", "columns", "values", "month", "sum", "line",
];

fn check_pivot_steps(answer: &str) -> Grade {
    let t = answer.to_lowercase();
    let hits = PIVOT_KEYWORDS.iter().filter(|w| t.contains(*w)).count();
    Grade::single(
        (hits as f64 / 4.0).min(1.0),
        format!("matched {hits} chart/pivot keywords"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionBank;

    fn score(id: &str, answer: &str) -> f64 {
        grade_by_id(id, answer).score
    }

    #[test]
    fn normalize_strips_whitespace_and_uppercases() {
        assert_eq!(normalize(" =sumifs( B:B ,\tA:A )\n"), "=SUMIFS(B:B,A:A)");
    }

    #[test]
    fn sumifs_scores_full() {
        let g = grade_by_id("q1", "=SUMIFS(B:B, A:A, \"Sales\")");
        assert_eq!(g.score, 1.0);
        assert!(g.notes[0].contains("SUMIFS"));
    }

    #[test]
    fn sumif_scores_partial() {
        assert_eq!(score("q1", "=SUMIF(B:B,A:A,\"Sales\")"), 0.9);
        assert_eq!(score("q1", "=sum if(a:a)"), 0.9);
        assert_eq!(score("q1", "=SUM(B:B)"), 0.0);
    }

    #[test]
    fn lookup_needs_xlookup_or_index_and_match() {
        assert_eq!(score("q2", "=xlookup(C2,A:A,B:B)"), 1.0);
        assert_eq!(score("q2", "=INDEX(B:B, MATCH(C2, A:A, 0))"), 1.0);
        assert_eq!(score("q2", "=INDEX(B:B, 3)"), 0.0);
        assert_eq!(score("q2", "=VLOOKUP(C2,A:B,2,FALSE)"), 0.0);
    }

    #[test]
    fn formula_rules() {
        assert_eq!(score("q3", "=COUNTIF(D2:D100,\"*\")"), 1.0);
        assert_eq!(score("q3", "=counta(D2:D100)"), 1.0);
        assert_eq!(score("q4", "=AVERAGEIF(E:E,\"<>\")"), 1.0);
        assert_eq!(score("q4", "=SUM(E:E)/COUNT(E:E)"), 0.0);
        assert_eq!(score("q5", "= year ( F2 )"), 1.0);
        assert_eq!(score("q5", "=YEARFRAC(F2,TODAY())"), 0.0);
    }

    #[test]
    fn div0_counts_cause_groups() {
        let g = grade_by_id(
            "q6",
            "#DIV/0! is caused by dividing by zero or a blank denominator",
        );
        assert_eq!(g.score, 1.0);
        assert_eq!(g.notes, vec!["matched 2 causes".to_string()]);
        assert_eq!(score("q6", "The denominator is zero"), 0.5);
        assert_eq!(score("q6", "no idea"), 0.0);
    }

    #[test]
    fn sum_zero_counts_reason_groups() {
        let g = grade_by_id("q7", "Numbers stored as TEXT, cells formatted wrong, hidden spaces");
        assert_eq!(g.score, 1.0);
        assert_eq!(g.notes, vec!["matched 3 reasons".to_string()]);
        assert!((score("q7", "they are text") - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn concept_rules() {
        assert_eq!(score("q8", "Absolute refs stay fixed"), 1.0);
        assert_eq!(score("q8", "the dollar sign pins it"), 0.0);
        assert_eq!(score("q9", "XLOOKUP can search in both directions"), 1.0);
        assert_eq!(score("q9", "one is newer"), 0.0);
    }

    #[test]
    fn pivot_keywords_cap_at_one() {
        let g = grade_by_id("q10", "Insert a pivot, put month in rows, sum of sales in values, then a line chart");
        assert_eq!(g.score, 1.0);
        assert!(g.notes[0].starts_with("matched 7"));
        assert_eq!(score("q10", "make a chart"), 0.25);
    }

    #[test]
    fn blank_answers_score_zero_everywhere() {
        let bank = QuestionBank::standard();
        for q in bank.questions() {
            for answer in ["", "   ", "\n\t "] {
                let g = grade(q, answer);
                assert_eq!(g.score, 0.0, "question {} answer {answer:?}", q.id);
                assert!(!g.notes.is_empty());
            }
        }
    }

    #[test]
    fn grading_is_deterministic() {
        let bank = QuestionBank::standard();
        for q in bank.questions() {
            assert_eq!(grade(q, &q.example_answer), grade(q, &q.example_answer));
        }
    }

    #[test]
    fn every_bank_question_has_a_rule() {
        for q in QuestionBank::standard().questions() {
            assert!(rule_for(&q.id).is_some(), "missing rule for {}", q.id);
        }
    }

    #[test]
    fn unknown_question_has_no_rule() {
        let g = grade_by_id("q99", "=SUMIFS(B:B)");
        assert_eq!(g.score, 0.0);
        assert_eq!(g.notes, vec!["no rule".to_string()]);
    }

    #[test]
    fn skipped_grade() {
        let g = Grade::skipped();
        assert_eq!(g.score, 0.0);
        assert_eq!(g.notes, vec!["skipped".to_string()]);
    }
}
