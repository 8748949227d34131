//! The `xlquiz init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    let path = std::path::Path::new("xlquiz.toml");
    if path.exists() {
        println!("xlquiz.toml already exists, skipping.");
    } else {
        std::fs::write(path, SAMPLE_CONFIG)?;
        println!("Created xlquiz.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit xlquiz.toml with the candidate name and output formats");
    println!("  2. Run: xlquiz questions");
    println!("  3. Run: xlquiz interview");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# xlquiz configuration

candidate_name = "Candidate"
output_dir = "./xlquiz-results"

# Any of: json, html, markdown, all
formats = ["json", "html"]

# Uploaded rows kept in the transcript
preview_rows = 50
"#;
