use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use permcat::{ConcatError, Config, Dispatcher, PermcatError, Permutations, RunError};

fn write_inputs(root: &Utf8Path) -> Vec<Utf8PathBuf> {
    let data = root.join("data");
    fs::create_dir_all(&data).unwrap();

    // Second file is larger than the chunk size used below.
    let files = [
        ("a.txt", b"first\n".to_vec()),
        ("b.txt", (0..=255u8).cycle().take(10_000).collect()),
        ("c.txt", Vec::new()),
    ];

    files
        .into_iter()
        .map(|(name, contents)| {
            let path = data.join(name);
            fs::write(&path, contents).unwrap();
            path
        })
        .collect()
}

fn expected(permutation: &[Utf8PathBuf]) -> Vec<u8> {
    permutation
        .iter()
        .flat_map(|path| fs::read(path).unwrap())
        .collect()
}

#[test]
fn writes_every_permutation() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(dir.path()).unwrap();
    let inputs = write_inputs(root);
    let out = root.join("output");

    let summary = permcat::run(
        &format!("{root}/data/*.txt"),
        Config::new().output_dir(&out).chunk_size(4096).capacity(5),
    )
    .unwrap();

    assert_eq!(summary.launched, 6);
    assert_eq!(summary.completed, 6);
    assert!(summary.peak_handles <= 5);

    for (i, permutation) in Permutations::new(inputs).enumerate() {
        let written = fs::read(out.join(format!("out-{i}.7z"))).unwrap();
        assert_eq!(written, expected(&permutation), "out-{i}.7z");
    }

    assert_eq!(fs::read_dir(&out).unwrap().count(), 6);
}

#[test]
fn reruns_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(dir.path()).unwrap();
    let inputs = write_inputs(root);

    let first = root.join("first");
    let second = root.join("second");

    for (out, chunk) in [(&first, 1 << 20), (&second, 7)] {
        fs::create_dir_all(out).unwrap();
        Dispatcher::new(Config::new().output_dir(out).chunk_size(chunk))
            .run(inputs.clone())
            .unwrap();
    }

    for i in 0..6 {
        let name = format!("out-{i}.7z");
        assert_eq!(
            fs::read(first.join(&name)).unwrap(),
            fs::read(second.join(&name)).unwrap(),
            "{name}"
        );
    }
}

#[test]
fn no_inputs_writes_one_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(dir.path()).unwrap();
    let out = root.join("nested/output");

    let summary = permcat::run(
        &format!("{root}/data/*.txt"),
        Config::new().output_dir(&out).extension(".bin"),
    )
    .unwrap();

    assert_eq!(summary.completed, 1);
    assert_eq!(fs::read(out.join("out-0.bin")).unwrap(), Vec::<u8>::new());
}

#[test]
fn missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(dir.path()).unwrap();
    let mut inputs = write_inputs(root);
    inputs.push(root.join("data/missing.txt"));

    let out = root.join("output");
    fs::create_dir_all(&out).unwrap();

    let err = Dispatcher::new(Config::new().output_dir(&out).workers(2))
        .run(inputs)
        .unwrap_err();

    match err {
        RunError::Task(0, _, ConcatError::Open(path, _)) => {
            assert!(path.ends_with("missing.txt"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_output_dir_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(dir.path()).unwrap();
    let inputs = write_inputs(root);

    let err = Dispatcher::new(Config::new().output_dir(root.join("absent")))
        .run(inputs)
        .unwrap_err();

    assert!(matches!(err, RunError::Task(0, _, ConcatError::Create(..))));
}

#[test]
fn single_token_capacity_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(dir.path()).unwrap();
    write_inputs(root);

    let err = permcat::run(
        &format!("{root}/data/*.txt"),
        Config::new().output_dir(root.join("output")).capacity(1),
    )
    .unwrap_err();

    assert!(matches!(err, PermcatError::Run(RunError::Config(_))));
}
