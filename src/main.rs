use camino::Utf8PathBuf;
use clap::Parser;
use console::style;

use permcat::utils::as_overhead;
use permcat::{Config, DEFAULT_CAPACITY, DEFAULT_CHUNK_SIZE, DEFAULT_EXTENSION, DEFAULT_OUTPUT_DIR};

/// Write every permutation of a set of files, concatenated, to its own file.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
struct Args {
    /// Glob pattern selecting the input files.
    #[arg(short, long, default_value = permcat::discover::DEFAULT_PATTERN)]
    input: String,

    /// Directory the outputs are written to, created if missing.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output: Utf8PathBuf,

    /// Maximum number of files open at the same time.
    #[arg(short, long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Size in bytes of the read buffer.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Number of worker threads, defaults to the number of CPUs.
    #[arg(short, long)]
    workers: Option<usize>,

    /// Extension of the output files.
    #[arg(short, long, default_value = DEFAULT_EXTENSION)]
    extension: String,
}

impl Args {
    fn config(&self) -> Config {
        let mut config = Config::new()
            .capacity(self.capacity)
            .chunk_size(self.chunk_size)
            .output_dir(&self.output)
            .extension(self.extension.clone());

        if let Some(workers) = self.workers {
            config = config.workers(workers);
        }

        config
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    #[cfg(feature = "logging")]
    permcat::utils::init_logging()?;

    let summary = permcat::run(&args.input, args.config())?;

    eprintln!(
        "Wrote {} files, {} bytes {}",
        style(summary.completed).green(),
        summary.bytes,
        as_overhead(summary.elapsed)
    );
    println!("Done.");

    Ok(())
}
