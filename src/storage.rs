use std::fs::File;
use std::io::{Read, Write};

use camino::Utf8Path;

/// Where inputs are read from and outputs are written to.
///
/// Workers only ever read inputs front to back and append to outputs, so
/// plain `Read` and `Write` are all an implementation has to offer.
pub trait Storage: Send + Sync {
    type Reader: Read;
    type Writer: Write;

    /// Opens an existing input for reading.
    fn open(&self, path: &Utf8Path) -> std::io::Result<Self::Reader>;

    /// Creates an output, truncating it if it already exists.
    fn create(&self, path: &Utf8Path) -> std::io::Result<Self::Writer>;
}

/// The local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystem;

impl Storage for FileSystem {
    type Reader = File;
    type Writer = File;

    fn open(&self, path: &Utf8Path) -> std::io::Result<File> {
        File::open(path)
    }

    fn create(&self, path: &Utf8Path) -> std::io::Result<File> {
        File::create(path)
    }
}
