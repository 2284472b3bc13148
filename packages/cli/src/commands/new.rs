use crate::config::Config;
use anyhow::Result;
use clap::Args;
use pagekit_blocks::BlockType;

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Block type tag (see `pagekit types`)
    pub block_type: String,

    /// Mark the block as protected template content
    #[arg(long)]
    pub original: bool,
}

pub fn new(args: NewArgs, cwd: &str) -> Result<()> {
    let block_type: BlockType = args.block_type.parse()?;
    let mut registry = Config::load(cwd)?.registry();

    let block = if args.original {
        registry.create_original(block_type)
    } else {
        registry.create(block_type)
    };

    println!("{}", serde_json::to_string_pretty(&block)?);
    Ok(())
}
