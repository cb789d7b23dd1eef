use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use glob::glob;

use crate::error::DiscoverError;

/// Default location of the input files.
pub const DEFAULT_PATTERN: &str = "data/*.txt";

/// Expands `pattern` into the list of matching paths, in the order the glob
/// yields them (alphabetical). The files are not opened here.
pub fn inputs(pattern: &str) -> Result<Vec<Utf8PathBuf>, DiscoverError> {
    let mut paths = Vec::new();
    for path in glob(pattern)? {
        paths.push(Utf8PathBuf::try_from(path?)?);
    }

    tracing::debug!(pattern, count = paths.len(), "discovered inputs");
    Ok(paths)
}

/// Creates the output directory, and any missing parents, if absent.
pub fn prepare_output(dir: impl AsRef<Utf8Path>) -> Result<(), DiscoverError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir) //
        .map_err(|e| DiscoverError::CreateDir(dir.to_owned(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();

        for name in ["b.txt", "a.txt", "c.md", "d.txt"] {
            fs::write(root.join(name), name).unwrap();
        }

        let pattern = format!("{root}/*.txt");
        let found = inputs(&pattern).unwrap();

        assert_eq!(
            found,
            vec![root.join("a.txt"), root.join("b.txt"), root.join("d.txt")]
        );
    }

    #[test]
    fn test_inputs_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();

        assert!(inputs(&format!("{root}/*.txt")).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            inputs("data/[*.txt"),
            Err(DiscoverError::GlobPattern(_))
        ));
    }

    #[test]
    fn test_prepare_output_nested() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let out = root.join("a/b/output");

        prepare_output(&out).unwrap();
        assert!(out.is_dir());

        // already existing is fine
        prepare_output(&out).unwrap();
    }
}
