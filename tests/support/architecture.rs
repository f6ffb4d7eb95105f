//! Source scanning for the architecture contract tests.

use std::fs;
use std::path::PathBuf;

/// One source line, located by crate-relative path and 1-based number.
#[derive(Debug)]
pub struct SourceLine {
    pub file: String,
    pub number: usize,
    pub text: String,
}

fn root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn read_relative(relative: &str) -> String {
    fs::read_to_string(root().join(relative))
        .unwrap_or_else(|e| panic!("failed to read {relative}: {e}"))
}

/// Every line of every `.rs` file under `relative`, a directory or one file.
pub fn source_lines(relative: &str) -> Vec<SourceLine> {
    let root = root();
    let mut pending = vec![root.join(relative)];
    let mut files = Vec::new();
    while let Some(path) = pending.pop() {
        if path.is_dir() {
            let entries = fs::read_dir(&path)
                .unwrap_or_else(|e| panic!("failed to read dir {}: {e}", path.display()));
            pending.extend(entries.filter_map(|entry| entry.ok().map(|entry| entry.path())));
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    files.sort();

    files
        .iter()
        .flat_map(|path| {
            let file = path
                .strip_prefix(&root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");
            let content = fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("failed to read {file}: {e}"));
            content
                .lines()
                .enumerate()
                .map(|(idx, text)| SourceLine {
                    file: file.clone(),
                    number: idx + 1,
                    text: text.to_string(),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Lines under `relative` containing any of `patterns`.
pub fn lines_containing(relative: &str, patterns: &[&str]) -> Vec<SourceLine> {
    source_lines(relative)
        .into_iter()
        .filter(|line| patterns.iter().any(|p| line.text.contains(p)))
        .collect()
}
