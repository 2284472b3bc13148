use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagekit_blocks::BlockRegistry;

#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn types(args: TypesArgs, _cwd: &str) -> Result<()> {
    let catalog = BlockRegistry::catalog();

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    for entry in catalog {
        let kind = if entry.block_type.is_container() {
            "container".cyan()
        } else {
            "leaf".dimmed()
        };
        println!(
            "  {} {:<16} {:<16} {}",
            entry.icon,
            entry.block_type.as_str().bold(),
            entry.label,
            kind
        );
    }

    Ok(())
}
