//! untoc CLI - table of contents reconstruction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use untoc::batch::extract_batch_with_progress;
use untoc::{
    AttemptResult, BatchOptions, FallbackLadder, FileSource, JsonFormat, Leader, OutlineConfig,
    TextSource, Untoc,
};

#[derive(Parser)]
#[command(name = "untoc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rebuild tables of contents from extracted document text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the outline of one document
    Extract {
        /// Input text or JSON source file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// JSON file with outline configuration
        #[arg(long, value_name = "FILE", env = "UNTOC_CONFIG")]
        config: Option<PathBuf>,

        /// Outlines with this many entries or fewer are rejected
        #[arg(long)]
        min_outline_lines: Option<usize>,

        /// Lines searched for the contents heading
        #[arg(long)]
        max_scan_lines: Option<usize>,

        /// Keep the largest rejected outline when nothing is accepted
        #[arg(long)]
        keep_rejected: bool,

        /// Keep document order of entries on the same page
        #[arg(long)]
        preserve_order: bool,

        /// Pad the dot leader to a fixed line width
        #[arg(long)]
        padded: bool,
    },

    /// Extract outlines of every source file in a directory
    Batch {
        /// Input directory
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// JSON file with outline configuration
        #[arg(long, value_name = "FILE", env = "UNTOC_CONFIG")]
        config: Option<PathBuf>,

        /// Process documents one at a time
        #[arg(long)]
        sequential: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show how an outline was found
    Info {
        /// Input text or JSON source file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// JSON file with outline configuration
        #[arg(long, value_name = "FILE", env = "UNTOC_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Indented outline file with dot leaders
    Text,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            format,
            config,
            min_outline_lines,
            max_scan_lines,
            keep_rejected,
            preserve_order,
            padded,
        } => load_config(config.as_deref()).and_then(|mut cfg| {
            if let Some(n) = min_outline_lines {
                cfg = cfg.with_min_outline_lines(n);
            }
            if let Some(n) = max_scan_lines {
                cfg = cfg.with_max_scan_lines(n);
            }
            if preserve_order {
                cfg = cfg.preserve_order();
            }
            cmd_extract(&input, output.as_deref(), format, cfg, keep_rejected, padded)
        }),
        Commands::Batch {
            input,
            output,
            config,
            sequential,
            format,
        } => load_config(config.as_deref())
            .and_then(|cfg| cmd_batch(&input, output.as_deref(), cfg, sequential, format)),
        Commands::Info { input, config } => {
            load_config(config.as_deref()).and_then(|cfg| cmd_info(&input, cfg))
        }
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<OutlineConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => OutlineConfig::from_json(&fs::read_to_string(path)?)?,
        None => OutlineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    config: OutlineConfig,
    keep_rejected: bool,
    padded: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut untoc = Untoc::new().with_config(config).keep_rejected(keep_rejected);
    if padded {
        untoc = untoc.with_leader(Leader::padded());
    }
    let result = untoc.extract(input)?;

    if result.salvaged {
        eprintln!(
            "{} outline failed the quality gate, kept {} entries",
            "Warning:".yellow().bold(),
            result.entries().len()
        );
    }

    let rendered = match format {
        OutputFormat::Text => result.to_text(),
        OutputFormat::Json => result.to_json(JsonFormat::Pretty)?,
    };

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", rendered);
    }

    Ok(())
}

fn collect_sources(dir: &Path) -> Result<Vec<FileSource>, Box<dyn std::error::Error>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && untoc::is_supported(path))
        .collect();
    paths.sort();
    Ok(paths.into_iter().map(FileSource::new).collect())
}

fn cmd_batch(
    input: &Path,
    output: Option<&Path>,
    config: OutlineConfig,
    sequential: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let sources = collect_sources(input)?;
    if sources.is_empty() {
        println!("{}", "No source files found".yellow());
        return Ok(());
    }

    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| input.join("toc"));
    fs::create_dir_all(&output_dir)?;

    let mut options = BatchOptions::new().with_config(config);
    if sequential {
        options = options.sequential();
    }

    let pb = ProgressBar::new(sources.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = extract_batch_with_progress(&sources, &options, |doc| {
        pb.set_message(doc.name.clone());
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    for doc in &report.documents {
        let outcome = match &doc.result {
            Ok(outcome) if outcome.is_accepted() => outcome,
            Ok(outcome) => {
                let reason = outcome
                    .failure()
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                println!("  {} {}: {}", "✗".red(), doc.name, reason);
                continue;
            }
            Err(e) => {
                println!("  {} {}: {}", "✗".red(), doc.name, e);
                continue;
            }
        };

        let rendered = match format {
            OutputFormat::Text => {
                untoc::render::to_text(&outcome.entries, &untoc::RenderOptions::default())
            }
            OutputFormat::Json => untoc::render::to_json(&outcome.entries, JsonFormat::Pretty)?,
        };
        let filename = format!("{}_toc.{}", doc.name, format.extension());
        fs::write(output_dir.join(&filename), rendered)?;
    }

    println!();
    println!("{}", "Batch Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Documents".bold(), report.total());
    println!(
        "{}: {}",
        "Succeeded".bold(),
        report.succeeded().to_string().as_str().green()
    );
    println!("{}: {}", "Failed".bold(), report.failed().to_string().as_str().red());
    for (strategy, count) in report.strategy_counts() {
        println!("  {} {}: {}", "├─".dimmed(), strategy, count);
    }
    println!("{}: {}", "Output".bold(), output_dir.display());

    Ok(())
}

fn cmd_info(input: &Path, config: OutlineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let source = FileSource::new(input);
    let doc = source.load()?;
    let outcome = FallbackLadder::with_config(config).run_document(&doc)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), untoc::detect_format_from_path(input)?);
    println!("{}: {}", "Pages".bold(), doc.page_count());
    match &doc.outline {
        Some(outline) => println!("{}: {}", "Bookmarks".bold(), outline.total_items()),
        None => println!("{}: none", "Bookmarks".bold()),
    }

    if let Some(details) = &outcome.details {
        println!();
        println!("{}", "Contents Section".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        println!(
            "{}: line {} (\"{}\")",
            "Title".bold(),
            details.section.line_index + 1,
            details.section.phrase
        );
        let stats = &details.stats;
        println!("{}: {}", "Window lines".bold(), stats.input_lines);
        println!("{}: {}", "Skipped".bold(), stats.skipped);
        println!("{}: {}", "Dot-cluster noise".bold(), stats.dot_cluster_dropped);
        println!(
            "{}: {} blocks ({} lines) dropped, {} kept",
            "Prose".bold(),
            stats.prose_blocks_dropped,
            stats.prose_lines_dropped,
            stats.prose_blocks_kept
        );
        if let Some(t) = &stats.truncation {
            println!(
                "{}: {:?} at line {} ({} discarded)",
                "Truncated".bold(),
                t.rule,
                t.at_line + 1,
                t.discarded
            );
        }
        println!("{}: {}", "Kept".bold(), stats.kept);
        if details.aborted {
            println!("{}", "Assembly stopped on unmatched lines".yellow());
        }
        if details.recovered {
            println!("{}", "Recovered by clean re-extraction".yellow());
        }
    }

    println!();
    println!("{}", "Strategies".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for attempt in &outcome.attempts {
        let status = match &attempt.result {
            AttemptResult::Accepted { entries } => {
                format!("accepted ({} entries)", entries).as_str().green()
            }
            AttemptResult::Rejected { reason, candidate } => {
                format!("rejected ({} entries): {}", candidate.len(), reason)
                    .as_str()
                    .yellow()
            }
            AttemptResult::Failed { error } => format!("failed: {}", error).as_str().red(),
        };
        println!("{}: {}", attempt.strategy.to_string().as_str().bold(), status);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "untoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Table of contents reconstruction tool");
    println!("License: MIT");
}
