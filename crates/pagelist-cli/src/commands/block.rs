//! Block command
//!
//! Usage: pagelist block-config --block FILE [--output json|yaml]
//!
//! Prints the typed configuration read from a block's rows.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pagelist_content::{get_block_config, Block};

use super::emit;
use crate::output::{serialize_value, OutputFormat};

#[derive(Debug, Args)]
pub struct BlockConfigArgs {
    /// Block rows (JSON)
    #[arg(long)]
    pub block: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,
}

/// Execute block-config command
pub fn execute(args: BlockConfigArgs, out: &mut impl Write) -> Result<()> {
    let block = Block::from_file(&args.block).context("loading block")?;
    let config = get_block_config(&block);
    tracing::debug!(
        op = "block_config",
        rows = block.len(),
        entries = config.len(),
    );
    emit(out, &serialize_value(&config, args.output)?)
}
