use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::filter::LevelFilter;

use textflow::config::{load_config, ErrorHandling, PipelineConfig};
use textflow::linguistic::select_backend;
use textflow::logging::{init_tracing, parse_level};
use textflow::{Pipeline, ProcessingResult, StepRegistry};

const PREVIEW_CHARS: usize = 100;

/// Text Processing Pipeline - process text through configurable steps.
#[derive(Debug, Parser)]
#[command(name = "textflow", version, author, about)]
struct Cli {
    /// Text to process.
    text: Option<String>,

    /// Configuration file path (JSON or YAML).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Comma-separated list of steps to apply.
    #[arg(short, long)]
    steps: Option<String>,

    /// Error handling strategy: continue or stop.
    #[arg(short, long, value_name = "POLICY")]
    error_handling: Option<ErrorHandling>,

    /// Interactive mode.
    #[arg(short, long)]
    interactive: bool,

    /// Read texts from stdin, one per line, and process them as a batch.
    #[arg(long, conflicts_with = "text")]
    stdin: bool,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// Log as JSON lines.
    #[arg(long)]
    log_json: bool,

    /// Prefer the enhanced linguistic backend when it is compiled in.
    #[arg(long)]
    nlp: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = build_config(&cli)?;
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        parse_level(&config.logging_level)?
    };
    init_tracing(level, cli.log_json);

    let registry = StepRegistry::with_backend(select_backend(cli.nlp));
    let mut pipeline =
        Pipeline::with_registry(config, registry).context("Failed to create pipeline")?;

    if cli.interactive {
        return run_interactive(&mut pipeline, cli.json);
    }

    if cli.stdin {
        let texts: Vec<String> = io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .context("Failed to read stdin")?
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect();

        let results = pipeline.process_batch(&texts)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
        } else {
            for result in &results {
                display_results(result, cli.verbose);
            }
        }
        return Ok(());
    }

    let Some(text) = cli.text.as_deref() else {
        bail!("Text input required unless using interactive mode or --stdin");
    };

    process_text(&mut pipeline, text, cli.verbose, cli.json)
}

/// Config file (if any) with command line overrides applied on top.
fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(steps) = &cli.steps {
        config.steps = steps
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }
    if let Some(error_handling) = cli.error_handling {
        config.error_handling = error_handling;
    }

    Ok(config)
}

fn run_interactive(pipeline: &mut Pipeline, json: bool) -> Result<()> {
    println!("Text Processing Pipeline - Interactive Mode");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\nEnter text to process (or 'quit' to exit): ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let text = line?;

        if matches!(text.trim().to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }

        if text.trim().is_empty() {
            println!("Please enter some text.");
            continue;
        }

        if let Err(e) = process_text(pipeline, &text, true, json) {
            println!("Error: {:#}", e);
        }
    }

    Ok(())
}

fn process_text(pipeline: &mut Pipeline, text: &str, verbose: bool, json: bool) -> Result<()> {
    let result = pipeline.process(text)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("\nProcessing text: {}", preview(text));
        display_results(&result, verbose);
    }

    Ok(())
}

fn display_results(result: &ProcessingResult, verbose: bool) {
    let mut rows: Vec<(String, String)> = vec![
        ("Processed Text".to_string(), preview(&result.processed_text)),
        ("Tokenized Text".to_string(), result.tokenized_text.join(", ")),
        ("Steps Applied".to_string(), result.steps_applied.join(", ")),
        (
            "Steps Skipped".to_string(),
            if result.steps_skipped.is_empty() {
                "None".to_string()
            } else {
                result.steps_skipped.join(", ")
            },
        ),
        (
            "Processing Time".to_string(),
            format!("{:.4}s", result.processing_secs()),
        ),
    ];

    for (key, value) in &result.analysis {
        rows.push((title_case(key), display_value(value)));
    }

    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    println!("\nProcessing Results");
    for (key, value) in &rows {
        println!("  {:<width$}  {}", key, value, width = width);
    }

    if result.has_errors() {
        println!("\nErrors encountered:");
        for error in &result.errors {
            println!("  • {}", error);
        }
    }

    if verbose {
        println!("\nFull processed text:\n{}", result.processed_text);
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", k, display_value(v)))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("word_count"), "Word Count");
        assert_eq!(title_case("character_count_no_spaces"), "Character Count No Spaces");
    }

    #[test]
    fn test_preview_truncates() {
        let long = "x".repeat(150);
        assert_eq!(preview(&long).len(), PREVIEW_CHARS + 3);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_display_nested_value() {
        let value = json!({"flesch_score": 88.5, "difficulty": "Easy"});
        assert_eq!(display_value(&value), "difficulty: Easy, flesch_score: 88.5");
    }

    #[test]
    fn test_steps_override() {
        let cli = Cli::parse_from(["textflow", "-s", "clean, analyze", "-e", "stop", "hi"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.steps, vec!["clean", "analyze"]);
        assert_eq!(config.error_handling, ErrorHandling::Stop);
    }
}
