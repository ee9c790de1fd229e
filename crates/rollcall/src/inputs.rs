use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

use crate::config::RollcallConfig;

/// Expands glob patterns and keeps files with an accepted extension, in the
/// order given. Matches of a single pattern are sorted by path.
pub fn collect_inputs(patterns: &[String], config: &RollcallConfig) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        if !is_glob(pattern) {
            paths.push(PathBuf::from(pattern));
            continue;
        }

        let mut matched: Vec<PathBuf> = Vec::new();
        for entry in glob::glob(pattern).with_context(|| format!("invalid pattern '{pattern}'"))? {
            match entry {
                Ok(path) if path.is_file() => matched.push(path),
                Ok(_) => {}
                Err(err) => warn!(pattern = %pattern, error = %err, "could not read path from pattern"),
            }
        }
        matched.sort();
        paths.extend(matched);
    }

    Ok(paths
        .into_iter()
        .filter(|path| {
            let accepted = config.accepts(path);
            if !accepted {
                warn!(path = %path.display(), "skipping input without an accepted extension");
            }
            accepted
        })
        .collect())
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn plain_paths_keep_caller_order() {
        let config = RollcallConfig::default();
        let inputs = vec!["b.csv".to_string(), "a.csv".to_string()];
        let paths = collect_inputs(&inputs, &config).unwrap();
        assert_eq!(paths, vec![PathBuf::from("b.csv"), PathBuf::from("a.csv")]);
    }

    #[test]
    fn non_csv_inputs_are_skipped() {
        let config = RollcallConfig::default();
        let inputs = vec!["term.xlsx".to_string(), "term.csv".to_string()];
        let paths = collect_inputs(&inputs, &config).unwrap();
        assert_eq!(paths, vec![PathBuf::from("term.csv")]);
    }

    #[test]
    fn glob_patterns_expand_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.csv", "a.csv", "notes.txt"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let pattern = dir.path().join("*").display().to_string();
        let paths = collect_inputs(&[pattern], &RollcallConfig::default()).unwrap();
        assert_eq!(paths, vec![dir.path().join("a.csv"), dir.path().join("b.csv")]);
    }
}
