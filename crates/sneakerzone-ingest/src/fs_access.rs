use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use sneakerzone_core::error::AccessError;
use sneakerzone_core::traits::{Entry, EntryKind, FileAccess};
use sneakerzone_core::SourceRef;

/// Local filesystem access.
///
/// A symlink to a file is listed as that file. Symlinked directories are
/// never entered, so the walk cannot loop.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsAccess;

impl FsAccess {
    pub fn new() -> Self {
        Self
    }
}

impl FileAccess for FsAccess {
    type Handle = PathBuf;

    fn list_entries(&self, dir: &PathBuf) -> Result<Vec<Entry<PathBuf>>, AccessError> {
        // walkdir only reports the root's read_dir failure on the first item.
        fs::read_dir(dir).map_err(|e| AccessError::from_io(dir.display().to_string(), e))?;

        let mut entries = Vec::new();
        for item in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false) {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "unreadable directory entry");
                    // Listed as a file so the failed read shows up as a rejection.
                    if let Some(path) = e.path().filter(|p| p.parent() == Some(dir.as_path())) {
                        if let Some(name) = path.file_name() {
                            entries.push(Entry {
                                name: name.to_string_lossy().to_string(),
                                kind: EntryKind::File,
                                handle: path.to_path_buf(),
                            });
                        }
                    }
                    continue;
                }
            };
            let file_type = item.file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else if file_type.is_symlink() {
                match fs::metadata(item.path()) {
                    Ok(meta) if meta.is_dir() => {
                        tracing::debug!(path = %item.path().display(), "skipping symlinked directory");
                        continue;
                    }
                    Ok(meta) if !meta.is_file() => continue,
                    // Dangling links stay in so the read failure is tallied.
                    _ => EntryKind::File,
                }
            } else {
                continue;
            };
            entries.push(Entry {
                name: item.file_name().to_string_lossy().to_string(),
                kind,
                handle: item.into_path(),
            });
        }
        Ok(entries)
    }

    fn read_displayable(&self, file: &PathBuf) -> Result<SourceRef, AccessError> {
        let display = file.display().to_string();
        let handle = fs::File::open(file).map_err(|e| AccessError::from_io(display.clone(), e))?;
        let meta = handle.metadata().map_err(|e| AccessError::from_io(display.clone(), e))?;
        if !meta.is_file() {
            return Err(AccessError::NotFound(display));
        }
        let canonical = file.canonicalize().map_err(|e| AccessError::from_io(display, e))?;
        Ok(SourceRef::new(file_uri(&canonical)))
    }
}

fn file_uri(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    if s.starts_with('/') { format!("file://{s}") } else { format!("file:///{s}") }
}
