use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use span_align::report::{AlignmentReport, ExpansionReport, RangeReport};
use span_align::{output, tasks, Aligner, Analysis, CodeRangeTask};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "span-align")]
#[command(about = "Resolve macro expansions and code ranges to syntax-tree nodes", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every expansion in a bundle, plus optional code-range tasks
    Resolve {
        /// Analysis bundle (sources + tree + expansions) to resolve against
        #[arg(short, long)]
        bundle: PathBuf,

        /// Task list file, or a directory of .json task lists
        #[arg(short, long)]
        tasks: Option<PathBuf>,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON report
        #[arg(short, long)]
        pretty: bool,
    },

    /// Validate task lists without resolving anything
    Check {
        /// Task list file, or a directory of .json task lists
        tasks: PathBuf,
    },

    /// List the expansions a bundle carries, without resolving
    List {
        /// Analysis bundle to inspect
        #[arg(short, long)]
        bundle: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            bundle,
            tasks,
            output,
            pretty,
        } => cmd_resolve(&bundle, tasks.as_deref(), output.as_deref(), pretty),

        Commands::Check { tasks } => cmd_check(&tasks),

        Commands::List { bundle } => cmd_list(&bundle),
    }
}

/// Helper: collect task list files. A file is taken as-is; a directory is
/// scanned one level deep for .json files, in sorted order.
fn discover_task_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|s| s.to_str()) == Some("json")
        {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();

    if files.is_empty() {
        anyhow::bail!("no .json task lists found in {}", path.display());
    }
    Ok(files)
}

fn load_tasks(path: &Path) -> Result<Vec<CodeRangeTask>> {
    let mut all = Vec::new();
    for file in discover_task_files(path)? {
        let list = tasks::load_from_path(&file)
            .with_context(|| format!("loading tasks from {}", file.display()))?;
        all.extend(list.tasks);
    }
    Ok(all)
}

fn cmd_resolve(
    bundle: &Path,
    tasks: Option<&Path>,
    out: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let analysis = Analysis::from_path(bundle)
        .with_context(|| format!("loading bundle from {}", bundle.display()))?;
    let range_tasks = match tasks {
        Some(path) => load_tasks(path)?,
        None => Vec::new(),
    };

    let aligner = Aligner::new(&analysis.tree, &analysis.map);
    let mut expansions = analysis.expansions;
    aligner.resolve_expansions(&mut expansions);
    let range_results = aligner.resolve_ranges(&range_tasks, analysis.main_buffer);

    let report = AlignmentReport {
        expansions: expansions
            .iter()
            .map(|exp| ExpansionReport::new(exp, &analysis.tree, &analysis.map))
            .collect(),
        ranges: range_tasks
            .iter()
            .zip(&range_results)
            .map(|(task, roots)| RangeReport::new(task, roots, &analysis.tree, &analysis.map))
            .collect(),
    };

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match out {
        Some(path) => {
            output::atomic_write(path, json.as_bytes())
                .with_context(|| format!("writing report to {}", path.display()))?;
            let aligned = report.expansions.iter().filter(|e| e.aligned).count();
            println!(
                "{} {} of {} expansions aligned, {} ranges resolved -> {}",
                "done:".green().bold(),
                aligned,
                report.expansions.len(),
                report.ranges.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn cmd_check(tasks_path: &Path) -> Result<()> {
    let mut failed = false;
    for file in discover_task_files(tasks_path)? {
        match tasks::load_from_path(&file) {
            Ok(list) => {
                println!(
                    "{} {} ({} tasks)",
                    "ok:".green(),
                    file.display(),
                    list.tasks.len()
                );
            }
            Err(err) => {
                failed = true;
                eprintln!("{} {}", "error:".red().bold(), err);
            }
        }
    }
    if failed {
        anyhow::bail!("one or more task lists are invalid");
    }
    Ok(())
}

fn cmd_list(bundle: &Path) -> Result<()> {
    let analysis = Analysis::from_path(bundle)
        .with_context(|| format!("loading bundle from {}", bundle.display()))?;

    println!("{}", "Sources:".bold());
    for buf in analysis.map.buffers() {
        println!("  {} ({} bytes)", buf.name(), buf.text().len());
    }

    println!("{}", "Expansions:".bold());
    if analysis.expansions.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for exp in &analysis.expansions {
        let begin = exp.spelling_range.begin.spelling();
        let pos = analysis
            .map
            .line_col(begin)
            .map(|(l, c)| format!("{l}:{c}"))
            .unwrap_or_else(|| "?".into());
        println!(
            "  {} at {} ({} args, {} definition tokens)",
            exp.name,
            pos,
            exp.arguments.len(),
            exp.definition_tokens.len()
        );
    }

    println!(
        "{} {} nodes in tree",
        "Tree:".bold(),
        analysis.tree.len()
    );
    Ok(())
}
