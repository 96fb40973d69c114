//! Resolving command-line inputs into ordered files

use std::path::PathBuf;
use glob::glob;
use tracing::{debug, warn};
use crate::error::{Error, Result};
use crate::pdf::InputFile;

/// Expand glob patterns in input paths
///
/// Patterns keep their command-line order; matches within one pattern are
/// sorted. Literal paths pass through untouched.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        if !is_glob(pattern) {
            paths.push(PathBuf::from(pattern));
            continue;
        }

        let entries = glob(pattern).map_err(|e| Error::InvalidGlob(format!("{}: {}", pattern, e)))?;
        let mut matched: Vec<PathBuf> = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) => matched.push(path),
                Err(e) => warn!("glob error for {}: {}", pattern, e),
            }
        }

        if matched.is_empty() {
            return Err(Error::NoFilesMatched(pattern.clone()));
        }

        matched.sort();
        debug!("{} matched {} file(s)", pattern, matched.len());
        paths.extend(matched);
    }

    Ok(paths)
}

/// Read every path into an [`InputFile`], keeping order
pub fn load_inputs(paths: &[PathBuf]) -> Result<Vec<InputFile>> {
    paths.iter().map(|p| InputFile::from_path(p)).collect()
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_literal_paths_keep_order() {
        let patterns = vec!["b.pdf".to_string(), "a.pdf".to_string()];
        let paths = expand_patterns(&patterns).unwrap();
        assert_eq!(paths, vec![PathBuf::from("b.pdf"), PathBuf::from("a.pdf")]);
    }

    #[test]
    fn test_glob_sorted_within_pattern() {
        let dir = TempDir::new().unwrap();
        for name in ["2.pdf", "1.pdf", "3.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let last = dir.path().join("3.txt").display().to_string();
        let pattern = dir.path().join("*.pdf").display().to_string();

        let paths = expand_patterns(&[last.clone(), pattern]).unwrap();
        assert_eq!(
            paths,
            vec![
                PathBuf::from(last),
                dir.path().join("1.pdf"),
                dir.path().join("2.pdf"),
            ]
        );
    }

    #[test]
    fn test_glob_without_matches() {
        let dir = TempDir::new().unwrap();
        let pattern = dir.path().join("*.pdf").display().to_string();
        let result = expand_patterns(&[pattern]);
        assert!(matches!(result, Err(Error::NoFilesMatched(_))));
    }

    #[test]
    fn test_load_inputs_reads_bytes_and_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, b"%PDF-").unwrap();

        let files = load_inputs(&[path]).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "notes.pdf");
        assert_eq!(files[0].bytes, b"%PDF-".to_vec());
    }
}
