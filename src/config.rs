use std::fmt::Debug;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::ConfigError;

/// Default number of handle tokens.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Default read buffer size, 1 MiB.
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

pub const DEFAULT_OUTPUT_DIR: &str = "output";

pub const DEFAULT_EXTENSION: &str = ".7z";

type NamingFn = Arc<dyn Fn(usize) -> String + Send + Sync>;

/// Settings for a [`Dispatcher`](crate::Dispatcher) run.
///
/// ```
/// use permcat::Config;
///
/// let config = Config::new()
///     .capacity(64)
///     .chunk_size(64 * 1024)
///     .output_dir("artifacts")
///     .naming(|i| format!("perm-{i:04}.bin"));
///
/// assert_eq!(config.output_path(7), "artifacts/perm-0007.bin");
/// ```
#[derive(Clone)]
pub struct Config {
    pub(crate) capacity: usize,
    pub(crate) chunk_size: usize,
    pub(crate) workers: Option<usize>,
    pub(crate) output_dir: Utf8PathBuf,
    naming: NamingFn,
}

impl Config {
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            chunk_size: DEFAULT_CHUNK_SIZE,
            workers: None,
            output_dir: Utf8PathBuf::from(DEFAULT_OUTPUT_DIR),
            naming: Arc::new(|i| format!("out-{i}{DEFAULT_EXTENSION}")),
        }
    }

    /// Maximum number of file handles open at the same time, across all
    /// workers. Must be at least 2, a worker holds its output and one input.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Number of worker threads. Defaults to rayon's choice, usually the
    /// number of logical CPUs.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn output_dir(mut self, dir: impl AsRef<Utf8Path>) -> Self {
        self.output_dir = dir.as_ref().to_owned();
        self
    }

    /// Names the output of the permutation launched `i`-th, counting from 0.
    pub fn naming<F>(mut self, naming: F) -> Self
    where
        F: Fn(usize) -> String + Send + Sync + 'static,
    {
        self.naming = Arc::new(naming);
        self
    }

    /// Uses the default `out-{i}` naming with a different file extension.
    pub fn extension(self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.naming(move |i| format!("out-{i}{extension}"))
    }

    pub fn output_path(&self, index: usize) -> Utf8PathBuf {
        self.output_dir.join((self.naming)(index))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity < 2 {
            return Err(ConfigError::Capacity(self.capacity));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::ChunkSize);
        }
        if self.workers == Some(0) {
            return Err(ConfigError::Workers);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("capacity", &self.capacity)
            .field("chunk_size", &self.chunk_size)
            .field("workers", &self.workers)
            .field("output_dir", &self.output_dir)
            .finish_non_exhaustive()
    }
}
