//! The `xlquiz grade` command.

use anyhow::Result;

use xlquiz_core::bank::QuestionBank;
use xlquiz_core::confidence::Confidence;
use xlquiz_core::feedback::feedback;
use xlquiz_core::grading::grade;

pub fn execute(question_id: String, answer: String) -> Result<()> {
    let bank = QuestionBank::standard();
    let Some(question) = bank.find(&question_id) else {
        anyhow::bail!(
            "unknown question id '{question_id}'. Run `xlquiz questions` to list them."
        );
    };

    let result = grade(question, &answer);

    println!("{} [{}]: {}", question.id, question.kind, question.prompt);
    println!(
        "Score: {:.3} ({})",
        result.score,
        Confidence::from_score(result.score)
    );
    println!("Notes:");
    for note in &result.notes {
        println!("  - {note}");
    }
    println!("Feedback: {}", feedback(&question.id, &result.notes));

    Ok(())
}
