//! CLI tool for compiling generated slide content into an operation plan.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use slides_core::{
    BuildConfig, BuildReport, ContentNormalizer, LayoutDecision, PlanRecorder,
    PresentationBuilder, RecordedBatch, Theme, ThemeRegistry,
};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Compile generated presentation content into document API operations.
#[derive(Parser, Debug)]
#[command(name = "slides-plan")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Generated content file(s) (JSON with "title" and "slides")
    #[arg(required_unless_present = "list_themes")]
    input: Vec<PathBuf>,

    /// Theme name
    #[arg(short, long, default_value = "modern")]
    theme: String,

    /// JSON file with additional themes, keyed by name
    #[arg(long)]
    themes_file: Option<PathBuf>,

    /// Maximum bullets per list (default: 10)
    #[arg(long, default_value = "10")]
    max_points: usize,

    /// Maximum characters per bullet before truncation (default: 200)
    #[arg(long, default_value = "200")]
    max_point_length: usize,

    /// Sentences kept when a long paragraph is summarized (default: 3)
    #[arg(long, default_value = "3")]
    max_sentences: usize,

    /// Paragraphs longer than this many characters are summarized (default: 200)
    #[arg(long, default_value = "200")]
    summarize_threshold: usize,

    /// Skip slides not started within this many seconds
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the plan to stdout instead of writing to file
    #[arg(short, long)]
    print: bool,

    /// List available themes and exit
    #[arg(long)]
    list_themes: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Plan written for one input file.
#[derive(Serialize)]
struct PlanOutput<'a> {
    title: &'a str,
    theme: &'a str,
    presentation_id: &'a str,
    slides: Vec<SlideSummary<'a>>,
    skipped: Vec<FailureSummary>,
    batches: &'a [RecordedBatch],
}

#[derive(Serialize)]
struct SlideSummary<'a> {
    index: usize,
    slide_id: &'a str,
    layout: LayoutDecision,
}

#[derive(Serialize)]
struct FailureSummary {
    index: usize,
    error: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let registry = load_themes(args.themes_file.as_deref())?;

    if args.list_themes {
        for name in registry.names() {
            let display = registry.get(name).map(|t| t.name.as_str()).unwrap_or("");
            println!("{:<16} {}", name, display);
        }
        return Ok(());
    }

    let theme = registry.resolve(&args.theme)?;

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        match process_file(input_path, &args, theme) {
            Ok(output) => {
                if args.print {
                    println!("{}", output);
                } else {
                    let output_path = get_output_path(input_path, args.output.as_ref())?;
                    write_output(&output_path, &output)?;
                    if args.verbose {
                        eprintln!("Written to: {}", output_path.display());
                    }
                }
            }
            Err(e) => {
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
            }
        }
    }

    Ok(())
}

/// Built-in themes, extended or overridden by a themes file.
fn load_themes(themes_file: Option<&Path>) -> Result<ThemeRegistry> {
    let mut registry = ThemeRegistry::builtin();

    if let Some(path) = themes_file {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let extra = ThemeRegistry::from_json(&json)
            .with_context(|| format!("Invalid themes file {}", path.display()))?;

        for name in extra.names() {
            if let Some(theme) = extra.get(name) {
                registry.insert(name, theme.clone());
            }
        }
    }

    log::debug!("{} themes available", registry.len());
    Ok(registry)
}

/// Compile a single content file into a JSON plan.
fn process_file(input_path: &Path, args: &Args, theme: &Theme) -> Result<String> {
    log::debug!("Compiling {} with theme {}", input_path.display(), args.theme);
    let raw = std::fs::read_to_string(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?;

    let normalizer = ContentNormalizer::new()
        .with_max_points(args.max_points)
        .with_max_point_length(args.max_point_length)
        .with_max_sentences(args.max_sentences)
        .with_summarize_threshold(args.summarize_threshold);

    let content = normalizer
        .parse_presentation(&raw)
        .with_context(|| format!("Failed to parse {}", input_path.display()))?;

    if args.verbose {
        eprintln!(
            "  Found {} slides ({} with diagrams)",
            content.slides.len(),
            content.diagram_count()
        );
    }

    let mut config = BuildConfig::new();
    if let Some(secs) = args.deadline_secs {
        config = config.with_deadline(Duration::from_secs(secs));
    }

    let builder = PresentationBuilder::new(theme)
        .with_normalizer(normalizer)
        .with_config(config);

    let mut recorder = PlanRecorder::new();
    let report = builder
        .build(&content, &mut recorder)
        .context("Failed to build presentation")?;

    for failure in &report.skipped {
        log::warn!(
            "{}: skipped slide {}: {}",
            input_path.display(),
            failure.index + 1,
            failure.error
        );
    }
    for failure in &report.diagram_failures {
        log::warn!(
            "{}: no diagram on slide {}: {}",
            input_path.display(),
            failure.index + 1,
            failure.error
        );
    }
    if report.is_complete() {
        log::debug!("Built slides {}", report.slide_ids().join(", "));
    }

    let output = PlanOutput {
        title: &content.title,
        theme: &args.theme,
        presentation_id: &report.presentation_id,
        slides: summarize_slides(&report),
        skipped: report
            .skipped
            .iter()
            .map(|f| FailureSummary {
                index: f.index,
                error: f.error.to_string(),
            })
            .collect(),
        batches: recorder.batches(),
    };

    serde_json::to_string_pretty(&output).context("Failed to serialize plan")
}

fn summarize_slides(report: &BuildReport) -> Vec<SlideSummary<'_>> {
    report
        .succeeded
        .iter()
        .map(|s| SlideSummary {
            index: s.index,
            slide_id: &s.slide_id,
            layout: s.layout,
        })
        .collect()
}

/// Determine the output path for a processed file.
fn get_output_path(input_path: &Path, output_dir: Option<&PathBuf>) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = format!("{}.plan.json", stem);

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => match input_path.parent() {
            Some(parent) => parent.join(output_filename),
            None => PathBuf::from(output_filename),
        },
    };

    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    writeln!(file, "{}", content).with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_next_to_input() {
        let path = get_output_path(Path::new("decks/rust.json"), None).unwrap();
        assert_eq!(path, PathBuf::from("decks/rust.plan.json"));
    }

    #[test]
    fn test_load_builtin_themes() {
        let registry = load_themes(None).unwrap();
        assert!(registry.get("modern").is_some());
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["slides-plan", "deck.json", "--theme", "dark", "-p"]);
        assert_eq!(args.input, vec![PathBuf::from("deck.json")]);
        assert_eq!(args.theme, "dark");
        assert!(args.print);
        assert_eq!(args.max_points, 10);
        assert_eq!(args.max_sentences, 3);
        assert_eq!(args.summarize_threshold, 200);
    }

    #[test]
    fn test_process_file_keeps_valid_slides() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("deck.json");
        std::fs::write(
            &input,
            r#"{"title": "Deck", "slides": [
                {"title": "One", "content": [{"type": "paragraph", "text": "Hi."}]},
                {"title": "Two", "content": "not a list"}
            ]}"#,
        )
        .unwrap();
        let args = Args::parse_from(["slides-plan", "deck.json"]);
        let registry = load_themes(None).unwrap();

        let output = process_file(&input, &args, registry.get("modern").unwrap()).unwrap();
        let plan: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(plan["slides"].as_array().unwrap().len(), 1);
        assert_eq!(plan["skipped"][0]["index"], 1);
        assert_eq!(
            plan["batches"][0]["operations"][0]["predefined_layout"],
            "TITLE_AND_BODY"
        );
    }

    #[test]
    fn test_list_themes_needs_no_input() {
        let args = Args::parse_from(["slides-plan", "--list-themes"]);
        assert!(args.list_themes);
        assert!(args.input.is_empty());
    }
}
