//! xlquiz CLI — run and grade Excel mock interviews from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "xlquiz", version, about = "Excel mock-interview grader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interview, reading one answer per line from stdin
    Interview {
        /// Candidate name (default: from config)
        #[arg(long)]
        candidate: Option<String>,

        /// Output directory (default: from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output formats: json, html, markdown, all (comma-separated)
        #[arg(long)]
        format: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a single answer
    Grade {
        /// Question id (e.g. "q1")
        #[arg(long)]
        question: String,

        /// Answer text
        #[arg(long)]
        answer: String,
    },

    /// Validate a CSV for the hands-on question
    CheckTable {
        /// Path to the CSV file
        #[arg(long)]
        file: PathBuf,
    },

    /// List the question bank
    Questions,

    /// Render a saved transcript
    Report {
        /// Transcript JSON
        #[arg(long)]
        transcript: PathBuf,

        /// Output format: text, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Create a starter xlquiz.toml
    Init,
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "xlquiz=info".parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Interview {
            candidate,
            output,
            format,
            config,
        } => commands::interview::execute(candidate, output, format, config),
        Commands::Grade { question, answer } => commands::grade::execute(question, answer),
        Commands::CheckTable { file } => commands::check_table::execute(file),
        Commands::Questions => commands::questions::execute(),
        Commands::Report {
            transcript,
            format,
            out,
        } => commands::report::execute(transcript, format, out),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
