use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Handle pool capacity must be at least 2, got {0}")]
    Capacity(usize),

    #[error("Chunk size must be greater than zero")]
    ChunkSize,

    #[error("Worker count must be greater than zero")]
    Workers,
}

/// Failure of a single concatenation task. Every variant is fatal for the
/// run, there is no retry.
#[derive(Debug, Error)]
pub enum ConcatError {
    #[error("Couldn't create output '{0}'.\n{1}")]
    Create(Utf8PathBuf, std::io::Error),

    #[error("Couldn't open input '{0}'.\n{1}")]
    Open(Utf8PathBuf, std::io::Error),

    #[error("Couldn't read input '{0}'.\n{1}")]
    Read(Utf8PathBuf, std::io::Error),

    #[error("Couldn't write output '{0}'.\n{1}")]
    Write(Utf8PathBuf, std::io::Error),

    #[error("Couldn't flush output '{0}'.\n{1}")]
    Flush(Utf8PathBuf, std::io::Error),

    #[error("Task panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("Couldn't compile glob pattern.\n{0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Couldn't run glob.\n{0}")]
    Glob(#[from] glob::GlobError),

    #[error("Couldn't convert path to UTF-8.\n{0}")]
    PathFormat(#[from] camino::FromPathBufError),

    #[error("Couldn't create output directory '{0}'.\n{1}")]
    CreateDir(Utf8PathBuf, std::io::Error),
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build worker thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Task {0} ('{1}'):\n{2}")]
    Task(usize, Utf8PathBuf, ConcatError),

    #[error("Task {0} ('{1}') exited without signaling completion")]
    Lost(usize, Utf8PathBuf),
}

#[derive(Debug, Error)]
pub enum PermcatError {
    #[error("Error while discovering input files:\n{0}")]
    Discover(#[from] DiscoverError),

    #[error("Error while concatenating permutations:\n{0}")]
    Run(#[from] RunError),
}
