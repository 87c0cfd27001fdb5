use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use restyle::format::{Formatter, FormatterCommand};
use restyle::input::read_list_file;
use restyle::resolve::{resolve, resolve_simple, FileDecision};
use restyle::rules::RuleSet;
use std::fmt::Display;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Check or fix source formatting for files selected by glob patterns and rules",
    long_about = None
)]
struct Args {
    /// Files to check or fix (the shell resolves any globs; directories are not walked)
    files: Vec<String>,

    /// Exclude files matching this CODEOWNERS-style pattern (repeatable)
    #[arg(long, short = 'x', value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Read additional exclude patterns from a file, one per line
    #[arg(long, value_name = "FILE")]
    exclude_list: Option<PathBuf>,

    /// Pass an option through to the formatter (repeatable)
    #[arg(long, value_name = "OPT", allow_hyphen_values = true)]
    fmt: Vec<String>,

    /// Read formatter options from a file, one per line
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Per-path rule document (YAML); replaces the exclude/option flags
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["exclude", "exclude_list", "fmt", "options"]
    )]
    rules: Option<PathBuf>,

    /// Report files that need formatting instead of rewriting them
    #[arg(long)]
    dry_run: bool,

    /// Print the selected files and their options, then exit
    #[arg(long)]
    list: bool,

    /// Formatter executable to invoke
    #[arg(long, value_name = "PROG", default_value = "astyle")]
    formatter: PathBuf,

    /// Suppress per-file progress messages
    #[arg(long, short)]
    quiet: bool,

    /// Show each file as it is checked
    #[arg(long, short)]
    verbose: bool,
}

/// Resolve the candidate files into decisions, from either the rule
/// document or the flat exclude/option lists.
fn collect_decisions(args: &Args) -> Result<Vec<FileDecision>> {
    if let Some(rules_path) = &args.rules {
        let text = fs::read_to_string(rules_path)
            .with_context(|| format!("Failed to read rules file {}", rules_path.display()))?;
        let rule_set = RuleSet::from_yaml(&text)
            .with_context(|| format!("Invalid rules file {}", rules_path.display()))?;
        Ok(resolve(&args.files, &rule_set).collect())
    } else {
        let mut excludes = args.exclude.clone();
        if let Some(path) = &args.exclude_list {
            excludes.extend(read_list_file(path)?);
        }

        let mut options = args.fmt.clone();
        if let Some(path) = &args.options {
            options.extend(read_list_file(path)?);
        }

        let decisions = resolve_simple(&args.files, &excludes, &options)?.collect();
        Ok(decisions)
    }
}

fn diag(quiet: bool, message: impl Display) {
    if !quiet {
        eprintln!("{}", message);
    }
}

fn run(args: &Args) -> Result<i32> {
    let decisions = collect_decisions(args)?;

    if args.list {
        for decision in &decisions {
            println!("{}\t{}", decision.filename, decision.options.join(" "));
        }
        return Ok(0);
    }

    let formatter = FormatterCommand::new(&args.formatter);
    let mut files_formatted = 0usize;
    let mut files_with_errors = 0usize;

    for decision in &decisions {
        let option_string = decision.options.join(" ");
        if args.verbose {
            eprintln!(
                "Checking {} with options: {}",
                decision.filename, option_string
            );
        }

        let original = fs::read_to_string(&decision.filename)
            .with_context(|| format!("Failed to read {}", decision.filename))?;
        let formatted = formatter
            .format(&original, &option_string)
            .with_context(|| format!("Formatter failed on {}", decision.filename))?;

        if formatted == original {
            continue;
        }

        if args.dry_run {
            diag(
                args.quiet,
                format!("Formatting error in {}", decision.filename).red(),
            );
            files_with_errors += 1;
        } else {
            diag(args.quiet, format!("Formatting {}", decision.filename));
            fs::write(&decision.filename, &formatted)
                .with_context(|| format!("Failed to write {}", decision.filename))?;
            files_formatted += 1;
        }
    }

    if args.dry_run {
        if files_with_errors > 0 {
            diag(
                args.quiet,
                format!("Formatting errors found in {} files", files_with_errors).bold(),
            );
            return Ok(1);
        }
    } else if files_formatted > 0 {
        diag(
            args.quiet,
            format!("Formatted {} files", files_formatted).bold(),
        );
    }

    Ok(0)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let code = run(&args)?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
