use super::LogFile;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

const LOG_TARGET: &str = " discovery";

/// Walk each root for candidate metric files and read them into memory.
///
/// Symlinks are not followed. Files larger than `max_file_size` bytes, non-UTF-8 paths, and
/// unreadable files are skipped with a log entry. Files come back in walk order, sorted by
/// name within each directory.
pub fn discover(roots: &[Utf8PathBuf], is_candidate: impl Fn(&str) -> bool, max_file_size: u64) -> Vec<LogFile> {
    let mut files = Vec::new();

    for root in roots {
        log::debug!(target: LOG_TARGET, "Scanning '{root}'");

        let entries = walkdir::WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::warn!(target: LOG_TARGET, "Could not walk directory: {err:#}");
                    None
                }
            })
            .filter(|e| e.file_type().is_file());

        for entry in entries {
            let Ok(path) = Utf8PathBuf::from_path_buf(entry.into_path()) else {
                log::debug!(target: LOG_TARGET, "Skipping file with a non-UTF-8 path");
                continue;
            };

            let Some(file_name) = path.file_name() else {
                continue;
            };

            if !is_candidate(file_name) {
                continue;
            }

            if let Some(file) = read_candidate(&path, file_name, max_file_size) {
                files.push(file);
            }
        }
    }

    log::info!(target: LOG_TARGET, "Found {} candidate files", files.len());
    files
}

fn read_candidate(path: &Utf8Path, file_name: &str, max_file_size: u64) -> Option<LogFile> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Could not read metadata for '{path}': {e:#}");
            return None;
        }
    };

    if metadata.len() > max_file_size {
        log::debug!(target: LOG_TARGET, "Skipping large file '{path}' ({} bytes)", metadata.len());
        return None;
    }

    match fs::read_to_string(path) {
        Ok(contents) => {
            let directory = path.parent().map_or_else(String::new, |p| p.as_str().to_string());
            Some(LogFile::new(directory, file_name, contents))
        }
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Could not read '{path}': {e:#}");
            None
        }
    }
}
