//! Source directory listing.
//!
//! Produces the flat file list the user selects from. Listing is
//! non-recursive: the copy engine only ever deals in plain files directly
//! under the source directory.

use std::fs;
use std::path::Path;

/// List the names of the regular files directly under `dir`.
///
/// Subdirectories are excluded. Symlinks are followed, so a link to a file
/// lists while a link to a directory does not. A directory that cannot be
/// read yields an empty vec, indistinguishable from an empty directory;
/// entries that cannot be inspected are dropped silently.
///
/// Filesystem enumeration order is platform-dependent, so the result is
/// sorted by name to keep the listing stable.
pub fn list_files(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut names: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();

    names.sort();
    names
}
