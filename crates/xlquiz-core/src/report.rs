//! Interview report and transcript with JSON persistence.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::bank::QuestionBank;
use crate::confidence::{Confidence, HIGH_THRESHOLD, LOW_THRESHOLD};
use crate::feedback::feedback;
use crate::grading::Grade;
use crate::table::MonthlyAggregate;

/// Per-question detail shown in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub prompt: String,
    /// Empty when the question was skipped.
    pub answer: String,
    pub score: f64,
    pub notes: Vec<String>,
    pub confidence: Confidence,
    pub feedback: String,
}

/// A low-scoring answer flagged for a human to re-grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub question: String,
    pub answer: String,
    pub notes: Vec<String>,
}

/// Aggregate view over every answered or skipped question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewReport {
    pub outcomes: Vec<QuestionOutcome>,
    /// Prompts scored at or above 0.8.
    pub strengths: Vec<String>,
    /// (prompt, tip) for prompts scored at or below 0.4.
    pub weaknesses: Vec<(String, String)>,
    /// Answers scored strictly below 0.4.
    pub review_queue: Vec<ReviewItem>,
    /// Weighted score out of 100.
    pub overall: f64,
}

impl InterviewReport {
    /// Build the report in bank order from recorded responses and grades.
    ///
    /// Weaknesses use `score <= 0.4` while the review queue uses
    /// `score < 0.4`: an answer at exactly 0.4 is listed as an area to
    /// improve but is not queued for human review.
    pub fn build(
        bank: &QuestionBank,
        responses: &BTreeMap<String, String>,
        grades: &BTreeMap<String, Grade>,
    ) -> Self {
        let mut outcomes = Vec::new();
        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();
        let mut review_queue = Vec::new();

        for q in bank.questions() {
            let Some(grade) = grades.get(&q.id) else {
                continue;
            };
            let answer = responses.get(&q.id).cloned().unwrap_or_default();
            let tip = feedback(&q.id, &grade.notes);

            if grade.score >= HIGH_THRESHOLD {
                strengths.push(q.prompt.clone());
            }
            if grade.score <= LOW_THRESHOLD {
                weaknesses.push((q.prompt.clone(), tip.clone()));
            }
            if grade.score < LOW_THRESHOLD {
                review_queue.push(ReviewItem {
                    question: q.prompt.clone(),
                    answer: answer.clone(),
                    notes: grade.notes.clone(),
                });
            }

            outcomes.push(QuestionOutcome {
                question_id: q.id.clone(),
                prompt: q.prompt.clone(),
                answer,
                score: grade.score,
                notes: grade.notes.clone(),
                confidence: Confidence::from_score(grade.score),
                feedback: tip,
            });
        }

        Self {
            outcomes,
            strengths,
            weaknesses,
            review_queue,
            overall: overall_score(bank, grades),
        }
    }
}

/// Weighted score out of 100 over questions that have a grade, rounded to
/// one decimal. Ungraded questions are left out of both sums.
pub fn overall_score(bank: &QuestionBank, grades: &BTreeMap<String, Grade>) -> f64 {
    let (weighted, weight) = bank
        .questions()
        .iter()
        .filter_map(|q| grades.get(&q.id).map(|g| (g.score, q.weight)))
        .fold((0.0f64, 0u32), |(sum, w), (score, weight)| {
            (sum + score * weight as f64, w + weight)
        });

    if weight == 0 {
        return 0.0;
    }
    round1(100.0 * weighted / weight as f64)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The exported record of one interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub candidate: String,
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub responses: BTreeMap<String, String>,
    pub scores: BTreeMap<String, f64>,
    pub notes: BTreeMap<String, Vec<String>>,
    pub overall: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<(String, String)>,
    pub review_queue: Vec<ReviewItem>,
    /// First rows of the uploaded table, if any.
    #[serde(default)]
    pub upload_preview: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub monthly_totals: Option<MonthlyAggregate>,
}

impl Transcript {
    /// Grades reassembled from the stored scores and notes.
    pub fn grades(&self) -> BTreeMap<String, Grade> {
        self.scores
            .iter()
            .map(|(id, &score)| {
                let notes = self.notes.get(id).cloned().unwrap_or_default();
                (id.clone(), Grade::new(score, notes))
            })
            .collect()
    }

    /// Rebuild the detailed report, e.g. for rendering a saved transcript.
    pub fn report(&self, bank: &QuestionBank) -> InterviewReport {
        InterviewReport::build(bank, &self.responses, &self.grades())
    }

    /// Save the transcript as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("failed to serialize transcript")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write transcript to {}", path.display()))?;
        Ok(())
    }

    /// Load a transcript from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read transcript from {}", path.display()))?;
        let transcript: Transcript =
            serde_json::from_str(&content).context("failed to parse transcript JSON")?;
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::{Question, QuestionKind};

    fn synthetic_bank(weights: &[u32]) -> QuestionBank {
        QuestionBank::new(
            weights
                .iter()
                .enumerate()
                .map(|(i, &weight)| Question {
                    id: format!("s{}", i + 1),
                    kind: QuestionKind::Concept,
                    prompt: format!("prompt {}", i + 1),
                    example_answer: String::new(),
                    weight,
                })
                .collect(),
        )
    }

    fn grades(entries: &[(&str, f64)]) -> BTreeMap<String, Grade> {
        entries
            .iter()
            .map(|&(id, score)| (id.to_string(), Grade::new(score, vec![format!("note {id}")])))
            .collect()
    }

    #[test]
    fn overall_is_weighted_mean() {
        let bank = synthetic_bank(&[1, 2, 3]);
        let g = grades(&[("s1", 1.0), ("s2", 0.5), ("s3", 0.0)]);
        assert_eq!(overall_score(&bank, &g), 33.3);
    }

    #[test]
    fn overall_ignores_unanswered() {
        let bank = synthetic_bank(&[1, 2, 3]);
        let g = grades(&[("s2", 0.5)]);
        assert_eq!(overall_score(&bank, &g), 50.0);
        assert_eq!(overall_score(&bank, &BTreeMap::new()), 0.0);
    }

    #[test]
    fn threshold_boundaries_are_asymmetric() {
        let bank = synthetic_bank(&[1, 1, 1, 1]);
        let g = grades(&[("s1", 0.8), ("s2", 0.4), ("s3", 0.39), ("s4", 0.5)]);
        let report = InterviewReport::build(&bank, &BTreeMap::new(), &g);

        assert_eq!(report.strengths, vec!["prompt 1".to_string()]);
        let weak: Vec<&str> = report.weaknesses.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(weak, vec!["prompt 2", "prompt 3"]);
        let queued: Vec<&str> = report
            .review_queue
            .iter()
            .map(|r| r.question.as_str())
            .collect();
        assert_eq!(queued, vec!["prompt 3"]);
    }

    #[test]
    fn outcomes_follow_bank_order() {
        let bank = synthetic_bank(&[1, 1, 1]);
        let g = grades(&[("s3", 1.0), ("s1", 0.0)]);
        let mut responses = BTreeMap::new();
        responses.insert("s3".to_string(), "answer three".to_string());
        responses.insert("s1".to_string(), String::new());

        let report = InterviewReport::build(&bank, &responses, &g);
        let ids: Vec<&str> = report
            .outcomes
            .iter()
            .map(|o| o.question_id.as_str())
            .collect();
        assert_eq!(ids, vec!["s1", "s3"]);
        assert_eq!(report.outcomes[0].confidence, Confidence::Low);
        assert_eq!(report.outcomes[1].confidence, Confidence::High);
        assert_eq!(report.outcomes[1].answer, "answer three");
        assert_eq!(report.review_queue[0].answer, "");
    }

    fn sample_transcript() -> Transcript {
        let bank = QuestionBank::standard();
        let g = grades(&[("q1", 1.0), ("q6", 0.0)]);
        let mut responses = BTreeMap::new();
        responses.insert("q1".to_string(), "=SUMIFS(B:B,A:A,\"Sales\")".to_string());
        responses.insert("q6".to_string(), String::new());
        let report = InterviewReport::build(&bank, &responses, &g);

        Transcript {
            candidate: "Ada".into(),
            session_id: Uuid::nil(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            responses,
            scores: g.iter().map(|(k, v)| (k.clone(), v.score)).collect(),
            notes: g.iter().map(|(k, v)| (k.clone(), v.notes.clone())).collect(),
            overall: report.overall,
            strengths: report.strengths,
            weaknesses: report.weaknesses,
            review_queue: report.review_queue,
            upload_preview: None,
            monthly_totals: None,
        }
    }

    #[test]
    fn transcript_json_roundtrip() {
        let transcript = sample_transcript();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("transcript.json");

        transcript.save_json(&path).unwrap();
        let loaded = Transcript::load_json(&path).unwrap();
        assert_eq!(loaded, transcript);
    }

    #[test]
    fn transcript_field_layout() {
        let json = serde_json::to_value(sample_transcript()).unwrap();
        for field in [
            "candidate",
            "started_at",
            "finished_at",
            "responses",
            "scores",
            "notes",
            "overall",
            "strengths",
            "weaknesses",
            "review_queue",
            "upload_preview",
        ] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert!(json["upload_preview"].is_null());
        assert!(json["weaknesses"][0].is_array());
        assert_eq!(json["review_queue"][0]["answer"], "");
    }

    #[test]
    fn transcript_rebuilds_report() {
        let transcript = sample_transcript();
        let report = transcript.report(&QuestionBank::standard());
        assert_eq!(report.overall, transcript.overall);
        assert_eq!(report.strengths, transcript.strengths);
        assert_eq!(report.outcomes.len(), 2);
    }

    #[test]
    fn load_missing_transcript_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Transcript::load_json(&dir.path().join("missing.json")).is_err());
    }
}
