use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagekit_render::{EditableNode, EditorView, PublicView, QueryParams, RenderNode};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct OutlineArgs {
    /// Page document (.json)
    pub file: PathBuf,

    /// Show the page as visitors see it
    #[arg(short, long)]
    pub public: bool,

    /// URL query parameter for text-query blocks (repeatable)
    #[arg(short, long = "query", value_name = "KEY=VALUE", value_parser = parse_query_pair)]
    pub query: Vec<(String, String)>,

    /// List the edit actions of every node
    #[arg(short, long)]
    pub actions: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

fn parse_query_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {}", raw)),
    }
}

pub fn outline(args: OutlineArgs, _cwd: &str) -> Result<()> {
    let doc = super::read_document(&args.file)?;

    if args.public {
        let query: QueryParams = args.query.into_iter().collect();
        let nodes = PublicView::build(&doc, &query);

        if args.format == "json" {
            println!("{}", serde_json::to_string_pretty(&nodes)?);
        } else {
            for line in public_lines(&nodes, 0) {
                println!("{}", line);
            }
        }
        return Ok(());
    }

    let nodes = EditorView::build(&doc);
    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&nodes)?);
    } else {
        for line in editor_lines(&nodes, 0, args.actions) {
            println!("{}", line);
        }
    }

    Ok(())
}

fn public_lines(nodes: &[RenderNode], depth: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for node in nodes {
        lines.push(format!(
            "{}{} {}",
            "  ".repeat(depth),
            node.block_type.bold(),
            node.content.summary()
        ));
        lines.extend(public_lines(&node.children, depth + 1));
    }

    lines
}

fn editor_lines(nodes: &[EditableNode], depth: usize, actions: bool) -> Vec<String> {
    let mut lines = Vec::new();

    for node in nodes {
        let mut line = format!(
            "{}{} {} {}",
            "  ".repeat(depth),
            node.block_type.bold(),
            node.id.dimmed(),
            node.content.summary()
        );
        if !node.visible {
            line.push_str(&format!(" {}", "(hidden)".yellow()));
        }
        if node.protected {
            line.push_str(&format!(" {}", "(protected)".cyan()));
        }
        lines.push(line);

        if actions {
            let labels: Vec<&str> = node.actions.iter().map(|a| a.label()).collect();
            let actions = labels.join(", ").dimmed();
            lines.push(format!("{}  {}", "  ".repeat(depth), actions));
        }

        lines.extend(editor_lines(&node.children, depth + 1, actions));
    }

    lines
}
