use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::mpsc::{Receiver, sync_channel};
use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};
use rayon::ThreadPoolBuilder;
use tracing::Level;
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::config::Config;
use crate::error::{ConcatError, RunError};
use crate::permute::{self, Permutations};
use crate::pool::HandlePool;
use crate::storage::{FileSystem, Storage};
use crate::worker::concat;

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Number of tasks launched, one per permutation.
    pub launched: usize,
    /// Number of completion signals received.
    pub completed: usize,
    /// Total bytes written across all outputs.
    pub bytes: u64,
    /// Highest number of handle tokens held at once.
    pub peak_handles: usize,
    pub elapsed: Duration,
}

/// A launched task whose completion has not been observed yet.
struct Pending {
    index: usize,
    output: Utf8PathBuf,
    done: Receiver<Result<u64, ConcatError>>,
}

/// Runs one concatenation task per permutation of the inputs.
pub struct Dispatcher<S: Storage = FileSystem> {
    config: Config,
    storage: S,
}

impl Dispatcher<FileSystem> {
    pub fn new(config: Config) -> Self {
        Self::with_storage(config, FileSystem)
    }
}

impl<S: Storage> Dispatcher<S> {
    pub fn with_storage(config: Config, storage: S) -> Self {
        Self { config, storage }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Number of worker threads actually used.
    ///
    /// A running worker can sit on its output token while it waits for an
    /// input token. With at most `capacity - 1` workers at least one of them
    /// can always get an input, so the pool can't deadlock.
    fn threads(&self) -> usize {
        let requested = self.config.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        });

        requested.min(self.config.capacity - 1)
    }

    /// Generates every permutation of `inputs` and writes each one to its
    /// own output, blocking until all of them are done.
    ///
    /// Permutations are pulled lazily: at most a couple of tasks per worker
    /// thread are in flight at any time. Completions are acknowledged in
    /// launch order. The first failed task stops further launches, tasks
    /// already running are allowed to finish, and that first failure is
    /// returned.
    pub fn run(&self, inputs: Vec<Utf8PathBuf>) -> Result<Summary, RunError> {
        self.config.validate()?;

        let start = Instant::now();
        let threads = self.threads();
        let window = threads * 2;

        let workers = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("permcat-worker-{i}"))
            .build()?;

        let pool = HandlePool::new(self.config.capacity);
        let chunk_size = self.config.chunk_size;

        tracing::debug!(
            inputs = inputs.len(),
            threads,
            capacity = self.config.capacity,
            "starting dispatcher"
        );

        let root_span = tracing::span!(Level::INFO, "concatenating");
        if let Some(total) = permute::count(inputs.len()) {
            root_span.pb_set_length(total);
        }
        root_span.pb_set_style(&crate::utils::PROGRESS_STYLE);
        root_span.pb_set_message("Writing permutations...");
        let _enter = root_span.enter();

        let mut permutations = Permutations::new(inputs);
        let mut pending: VecDeque<Pending> = VecDeque::with_capacity(window);
        let mut failure: Option<RunError> = None;
        let mut launched = 0;
        let mut completed = 0;
        let mut bytes = 0;

        let storage = &self.storage;
        let pool = &pool;

        workers.in_place_scope(|s| {
            loop {
                // Launch while there is room in the window and nothing failed.
                if failure.is_none()
                    && pending.len() < window
                    && let Some(permutation) = permutations.next()
                {
                    let index = launched;
                    let output = self.config.output_path(index);
                    let (signal, done) = sync_channel(1);

                    tracing::debug!(index, output = %output, "launching task");

                    let path = output.clone();
                    s.spawn(move |_| {
                        let result = run_task(storage, pool, &permutation, &path, chunk_size);
                        // The dispatcher only stops listening after it has
                        // received this, nothing to do if it is gone.
                        let _ = signal.send(result);
                    });

                    pending.push_back(Pending {
                        index,
                        output,
                        done,
                    });
                    launched += 1;
                    continue;
                }

                let Some(task) = pending.pop_front() else {
                    break;
                };

                match task.done.recv() {
                    Ok(Ok(n)) => {
                        completed += 1;
                        bytes += n;
                        root_span.pb_inc(1);
                    }
                    Ok(Err(err)) => {
                        completed += 1;
                        tracing::error!(index = task.index, output = %task.output, "{err}");
                        failure.get_or_insert(RunError::Task(task.index, task.output, err));
                    }
                    Err(_) => {
                        failure.get_or_insert(RunError::Lost(task.index, task.output));
                    }
                }
            }
        });

        if let Some(err) = failure {
            return Err(err);
        }

        debug_assert_eq!(pool.available(), pool.capacity());

        Ok(Summary {
            launched,
            completed,
            bytes,
            peak_handles: pool.peak(),
            elapsed: start.elapsed(),
        })
    }
}

/// Runs a single worker, turning a panic into an error so the dispatcher
/// always hears back.
fn run_task<S: Storage>(
    storage: &S,
    pool: &HandlePool,
    permutation: &[Utf8PathBuf],
    output: &Utf8Path,
    chunk_size: usize,
) -> Result<u64, ConcatError> {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        concat(storage, pool, permutation, output, chunk_size)
    }));

    match result {
        Ok(Ok(n)) => {
            tracing::info!("finished writing {output}");
            Ok(n)
        }
        Ok(Err(err)) => Err(err),
        Err(panic) => {
            let msg = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                String::from("unknown payload")
            };

            Err(ConcatError::Panicked(msg))
        }
    }
}
