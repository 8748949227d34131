//! The `xlquiz questions` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use xlquiz_core::bank::QuestionBank;

pub fn execute() -> Result<()> {
    let bank = QuestionBank::standard();

    let mut table = Table::new();
    table.set_header(vec!["ID", "Type", "Weight", "Prompt"]);
    for q in bank.questions() {
        table.add_row(vec![
            Cell::new(&q.id),
            Cell::new(q.kind),
            Cell::new(q.weight),
            Cell::new(&q.prompt),
        ]);
    }

    println!("{table}");
    println!(
        "{} questions, total weight {}",
        bank.len(),
        bank.total_weight()
    );

    Ok(())
}
