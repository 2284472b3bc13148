use crate::config::DEFAULT_CONFIG_NAME;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagekit_blocks::{validate as checks, BlockType};
use pagekit_render::TypeCounter;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Page document (.json) or directory of documents
    pub input: PathBuf,

    /// Print per-type block counts
    #[arg(short, long)]
    pub verbose: bool,
}

/// Outcome of checking one document
#[derive(Debug, Default, PartialEq)]
pub struct Report {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub blocks: usize,
}

pub fn validate(args: ValidateArgs, _cwd: &str) -> Result<()> {
    let files = if args.input.is_file() {
        vec![args.input.clone()]
    } else if args.input.is_dir() {
        find_documents(&args.input)
    } else {
        anyhow::bail!("Input path does not exist: {}", args.input.display());
    };

    let mut failed = 0;
    for file in &files {
        let report = check_file(file, args.verbose);
        if report.errors.is_empty() {
            println!(
                "{} {} ({} blocks)",
                "✓".green(),
                file.display(),
                report.blocks
            );
        } else {
            failed += 1;
            println!("{} {}", "✗".red(), file.display());
        }
        for error in &report.errors {
            println!("  {} {}", "error".red().bold(), error);
        }
        for warning in &report.warnings {
            println!("  {} {}", "warning".yellow().bold(), warning);
        }
    }

    println!();
    println!("   Documents checked: {}", files.len());

    if failed > 0 {
        anyhow::bail!("{} of {} documents failed validation", failed, files.len());
    }
    Ok(())
}

/// Parse and check a stored document
pub fn check_file(path: &Path, verbose: bool) -> Report {
    let mut report = Report::default();

    let doc = match super::read_document(path) {
        Ok(doc) => doc,
        Err(err) => {
            report.errors.push(format!("{:#}", err));
            return report;
        }
    };

    for id in checks::duplicate_ids(&doc) {
        report.errors.push(format!("duplicate block id {}", id));
    }

    let counter = TypeCounter::count(&doc);
    report.blocks = counter.total();

    for (tag, count) in &counter.counts {
        if tag.parse::<BlockType>().is_err() {
            let warning = format!("{} block(s) of unknown type {} (kept as is)", count, tag);
            report.warnings.push(warning);
        }
        if verbose {
            println!("    {:<16} {}", tag, count);
        }
    }

    if verbose && (counter.hidden > 0 || counter.protected > 0) {
        println!(
            "    {} hidden, {} protected",
            counter.hidden, counter.protected
        );
    }

    report
}

fn find_documents(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| {
            path.is_file()
                && path.extension().is_some_and(|e| e == "json")
                && path.file_name().is_some_and(|n| n != DEFAULT_CONFIG_NAME)
        })
        .collect()
}
