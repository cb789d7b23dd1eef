#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod config;
pub mod discover;
mod dispatch;
mod error;
pub mod permute;
mod pool;
mod storage;
pub mod utils;
mod worker;

pub use crate::config::{
    Config, DEFAULT_CAPACITY, DEFAULT_CHUNK_SIZE, DEFAULT_EXTENSION, DEFAULT_OUTPUT_DIR,
};
pub use crate::dispatch::{Dispatcher, Summary};
pub use crate::error::*;
pub use crate::permute::Permutations;
pub use crate::pool::{HandlePool, Token};
pub use crate::storage::{FileSystem, Storage};
pub use crate::worker::concat;

/// Finds the inputs matching `pattern`, makes sure the output directory
/// exists and writes one output per permutation of the inputs.
pub fn run(pattern: &str, config: Config) -> Result<Summary, PermcatError> {
    let inputs = discover::inputs(pattern)?;
    discover::prepare_output(&config.output_dir)?;

    tracing::info!(
        "found {} input files, {} permutations to write",
        inputs.len(),
        permute::count(inputs.len())
            .map(|n| n.to_string())
            .unwrap_or_else(|| String::from("too many")),
    );

    let summary = Dispatcher::new(config).run(inputs)?;
    Ok(summary)
}
