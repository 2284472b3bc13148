use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagekit_blocks::BlockList;
use pagekit_editor::{EditSession, Mutation};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Page document (.json)
    pub file: PathBuf,

    /// JSON array of edit commands
    pub script: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Result of running a script against a document
#[derive(Debug)]
pub struct ScriptRun {
    pub document: BlockList,
    pub applied: usize,
    pub skipped: usize,
}

pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let doc = super::read_document(&args.file)?;
    let script = read_script(&args.script)?;

    eprintln!(
        "✏️  {} {} commands",
        "Applying".green().bold(),
        script.len()
    );
    let run = run_script(&config, doc, script)?;

    let json = serde_json::to_string_pretty(&run.document)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))?;
            eprintln!("   Output: {}", path.display());
        }
        None => println!("{}", json),
    }

    eprintln!(
        "✨ {} {} applied, {} without effect",
        "Done".green().bold(),
        run.applied,
        run.skipped
    );
    Ok(())
}

fn read_script(path: &Path) -> Result<Vec<Mutation>> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&source)
        .with_context(|| format!("{} is not an edit script", path.display()))
}

/// Apply `script` in order; the first failing command aborts the run
pub fn run_script(config: &Config, doc: BlockList, script: Vec<Mutation>) -> Result<ScriptRun> {
    let mut session = EditSession::with_registry(config.session_config(), config.registry());
    session.load(doc);

    let (mut applied, mut skipped) = (0, 0);
    for (step, mutation) in script.into_iter().enumerate() {
        let op = mutation.name();
        let target = mutation.target_id().map(str::to_string);

        let changed = session
            .apply(mutation)
            .with_context(|| format!("Command {} ({}) failed", step + 1, op))?;

        if changed {
            applied += 1;
        } else {
            skipped += 1;
            eprintln!(
                "   {} command {} ({}) had no effect{}",
                "⚠".yellow(),
                step + 1,
                op,
                target.map(|id| format!(" on {}", id)).unwrap_or_default()
            );
        }
    }

    let document = session.save_snapshot();
    let version = session.version();
    info!(version, applied, skipped, "Script finished");

    Ok(ScriptRun {
        document,
        applied,
        skipped,
    })
}
