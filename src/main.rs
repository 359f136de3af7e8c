//! `logfield-extract`: augment a JSON array of log records with extracted fields.

use anyhow::Context;
use clap::Parser;
use logfield_engine::{batch, ExtractionEngineBuilder};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "logfield-extract", version, about = "Extract structured fields from log records")]
struct Args {
    /// JSON array of records, each with a `logText` string
    #[arg(long, alias = "input_file")]
    input_file: PathBuf,

    /// Where to write the records augmented with `logField`
    #[arg(long, alias = "output_file")]
    output_file: PathBuf,

    /// JSON array of extraction rules
    #[arg(long, alias = "rules_file", default_value = "classified_rules.json")]
    rules_file: PathBuf,

    /// Also write unmatched records and their reasons here
    #[arg(long)]
    unmatched_report: Option<PathBuf>,

    /// Reject fallback candidates at or below this similarity
    #[arg(long)]
    min_similarity: Option<f64>,

    /// Exact matching only
    #[arg(long)]
    no_fallback: bool,

    /// Process records on the current thread
    #[arg(long)]
    sequential: bool,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logfield_engine=info,logfield_extract=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let engine = ExtractionEngineBuilder::new()
        .with_fallback(!args.no_fallback)
        .with_min_similarity(args.min_similarity)
        .with_parallel_processing(!args.sequential)
        .build_from_path(&args.rules_file)
        .with_context(|| format!("failed to load rules from {}", args.rules_file.display()))?;

    batch::process_files(
        &engine,
        &args.input_file,
        &args.output_file,
        args.unmatched_report.as_deref(),
    )
    .with_context(|| format!("failed to process {}", args.input_file.display()))?;

    println!("Extraction complete, results saved to {}", args.output_file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_kebab_case_flags() {
        let args = Args::try_parse_from([
            "logfield-extract",
            "--input-file",
            "logs.json",
            "--output-file",
            "parsed.json",
        ])
        .unwrap();
        assert_eq!(args.input_file, PathBuf::from("logs.json"));
        assert_eq!(args.output_file, PathBuf::from("parsed.json"));
        assert_eq!(args.rules_file, PathBuf::from("classified_rules.json"));
        assert!(!args.no_fallback);
    }

    #[test]
    fn test_snake_case_flags_still_accepted() {
        let args = Args::try_parse_from([
            "logfield-extract",
            "--input_file",
            "logs.json",
            "--output_file",
            "parsed.json",
            "--rules_file",
            "rules.json",
            "--min-similarity",
            "0.25",
        ])
        .unwrap();
        assert_eq!(args.input_file, PathBuf::from("logs.json"));
        assert_eq!(args.output_file, PathBuf::from("parsed.json"));
        assert_eq!(args.rules_file, PathBuf::from("rules.json"));
        assert_eq!(args.min_similarity, Some(0.25));
    }

    #[test]
    fn test_input_file_is_required() {
        let result = Args::try_parse_from(["logfield-extract", "--output-file", "out.json"]);
        assert!(result.is_err());
    }
}
