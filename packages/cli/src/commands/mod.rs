pub mod apply;
pub mod init;
pub mod new;
pub mod outline;
pub mod types;
pub mod validate;

pub use apply::{apply, ApplyArgs};
pub use init::{init, InitArgs};
pub use new::{new, NewArgs};
pub use outline::{outline, OutlineArgs};
pub use types::{types, TypesArgs};
pub use validate::{validate, ValidateArgs};

use anyhow::{Context, Result};
use pagekit_blocks::BlockList;
use std::fs;
use std::path::Path;

/// Read a stored page document
pub(crate) fn read_document(path: &Path) -> Result<BlockList> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&source)
        .with_context(|| format!("{} is not a page document", path.display()))
}
