use std::path::Path;

use walkdir::WalkDir;

use crate::errors::BenchError;
use crate::types::Candidate;

/// Recursively collect every file under `dir` whose name ends in `.{extension}`.
///
/// Candidates are sorted by name in byte order, ties broken by path, so
/// repeated runs over an unchanged tree visit the same sequence. Walk errors,
/// including a missing `dir`, are returned rather than skipped.
pub fn discover_candidates(dir: &Path, extension: &str) -> Result<Vec<Candidate>, BenchError> {
    let suffix = format!(".{}", extension);
    let mut candidates = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|source| BenchError::WalkError {
            path: dir.to_path_buf(),
            source,
        })?;

        // Symlinks to directories are listed but not descended into.
        if entry.file_type().is_dir() || entry.path().is_dir() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        let Some(name) = file_name.strip_suffix(suffix.as_str()) else {
            continue;
        };

        candidates.push(Candidate {
            name: name.to_string(),
            path: entry.path().to_path_buf(),
        });
    }

    candidates.sort();
    log::info!("found {} candidates under {}", candidates.len(), dir.display());

    Ok(candidates)
}
