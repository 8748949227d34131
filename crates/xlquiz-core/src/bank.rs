//! Question bank types.
//!
//! The interview uses a fixed, ordered bank of Excel questions. Each question
//! carries a weight that feeds the overall score.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single interview question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier (e.g. "q1").
    pub id: String,
    /// What kind of answer the question expects.
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// The text shown to the candidate.
    pub prompt: String,
    /// A reference answer shown as a hint.
    pub example_answer: String,
    /// Relative weight in the overall score. Always positive.
    pub weight: u32,
}

/// Question categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Objective,
    Debug,
    Concept,
    HandsOn,
}

impl QuestionKind {
    /// Only hands-on questions accept an uploaded table.
    pub fn accepts_upload(self) -> bool {
        matches!(self, QuestionKind::HandsOn)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Objective => write!(f, "objective"),
            QuestionKind::Debug => write!(f, "debug"),
            QuestionKind::Concept => write!(f, "concept"),
            QuestionKind::HandsOn => write!(f, "hands_on"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "objective" => Ok(QuestionKind::Objective),
            "debug" => Ok(QuestionKind::Debug),
            "concept" => Ok(QuestionKind::Concept),
            "hands_on" | "hands-on" | "handson" => Ok(QuestionKind::HandsOn),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// An ordered collection of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from an explicit list, in presentation order.
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// The standard ten-question Excel interview.
    pub fn standard() -> Self {
        Self::new(
            STANDARD
                .iter()
                .map(|&(id, kind, prompt, example_answer, weight)| Question {
                    id: id.to_string(),
                    kind,
                    prompt: prompt.to_string(),
                    example_answer: example_answer.to_string(),
                    weight,
                })
                .collect(),
        )
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Look up a question by id.
    pub fn find(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Sum of all question weights.
    pub fn total_weight(&self) -> u32 {
        self.questions.iter().map(|q| q.weight).sum()
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::standard()
    }
}

type QuestionRow = (&'static str, QuestionKind, &'static str, &'static str, u32);

const STANDARD: &[QuestionRow] = &[
    (
        "q1",
        QuestionKind::Objective,
        "Write an Excel formula that returns the SUM of column B only for rows where column A equals 'Sales'.",
        "=SUMIFS(B:B, A:A, \"Sales\")",
        2,
    ),
    (
        "q2",
        QuestionKind::Objective,
        "Give a formula to lookup value in C2 from a table where key is in column A, robust to column re-ordering.",
        "XLOOKUP(C2, A:A, B:B)",
        2,
    ),
    (
        "q3",
        QuestionKind::Objective,
        "Write an Excel formula to count how many cells in range D2:D100 contain text.",
        "=COUNTIF(D2:D100,\"*\")",
        2,
    ),
    (
        "q4",
        QuestionKind::Objective,
        "Write a formula to calculate the average of numbers in column E, ignoring blanks.",
        "=AVERAGE(E:E)",
        2,
    ),
    (
        "q5",
        QuestionKind::Objective,
        "Write a formula that extracts the year from a date in cell F2.",
        "=YEAR(F2)",
        1,
    ),
    (
        "q6",
        QuestionKind::Debug,
        "You get #DIV/0! error in Excel. What are two common causes?",
        "Dividing by zero; blank denominator.",
        2,
    ),
    (
        "q7",
        QuestionKind::Debug,
        "Your SUM formula =SUM(A1:A10) is returning 0 even though numbers are visible. List likely causes.",
        "Cells formatted as text; hidden characters/spaces; not actually numeric values.",
        3,
    ),
    (
        "q8",
        QuestionKind::Concept,
        "Explain difference between Absolute ($A$1) and Relative (A1) references in formulas.",
        "Absolute stays fixed when copied; Relative shifts with cell position.",
        2,
    ),
    (
        "q9",
        QuestionKind::Concept,
        "Explain difference between VLOOKUP and XLOOKUP in Excel.",
        "XLOOKUP is more flexible, can search both directions, no need for column index, handles errors.",
        3,
    ),
    (
        "q10",
        QuestionKind::HandsOn,
        "Upload a CSV/XLSX with Date and Sales columns. How would you create a chart to show monthly sales trend?",
        "Insert → Line chart, set X=Month(Date), Y=Sum(Sales).",
        4,
    ),
];
