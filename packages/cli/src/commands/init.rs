use crate::config::{Config, IdStrategy, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Generate sequential ids with this prefix instead of random ones
    #[arg(long)]
    pub id_seed: Option<String>,

    /// Also create an empty page document with this name
    #[arg(long)]
    pub page: Option<String>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing pagekit project...".bright_blue().bold()
    );

    let config = Config {
        id_strategy: if args.id_seed.is_some() {
            IdStrategy::Sequential
        } else {
            IdStrategy::Random
        },
        id_seed: args.id_seed,
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    if let Some(page) = args.page {
        let page_path = PathBuf::from(cwd).join(&page);
        if page_path.exists() {
            println!("  {} {} already exists, left as is", "⚠️".yellow(), page);
        } else {
            fs::write(&page_path, "[]\n")?;
            println!("  {} Created {}", "✓".green(), page);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        init(
            InitArgs {
                id_seed: Some("page".to_string()),
                page: Some("home.json".to_string()),
                force: false,
            },
            &cwd,
        )
        .unwrap();

        let config = Config::load(&cwd).unwrap();
        assert_eq!(config.id_strategy, IdStrategy::Sequential);
        assert_eq!(config.id_seed.as_deref(), Some("page"));
        let home = fs::read_to_string(dir.path().join("home.json")).unwrap();
        assert_eq!(home, "[]\n");
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        let existing = r#"{ "debounceMs": 10 }"#;
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), existing).unwrap();

        init(
            InitArgs {
                id_seed: None,
                page: None,
                force: false,
            },
            &cwd,
        )
        .unwrap();

        assert_eq!(Config::load(&cwd).unwrap().debounce_ms, 10);
    }
}
