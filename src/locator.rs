//! Marker file discovery
//!
//! The root fragment is the nearest `docker-compose.auto.yml` found in the
//! invocation directory or one of its ancestors, up to and including the
//! filesystem root.

use std::path::{Path, PathBuf};

use log::trace;

use crate::defaults::MARKER_FILE;
use crate::error::{Error, Result};

/// Find [`MARKER_FILE`] starting at `start` and walking up.
pub fn find_marker(start: &Path) -> Result<PathBuf> {
    find_upwards(start, MARKER_FILE)
}

/// Find `file_name` in `start` or the closest ancestor containing it.
pub fn find_upwards(start: &Path, file_name: &str) -> Result<PathBuf> {
    for dir in start.ancestors() {
        let candidate = dir.join(file_name);
        trace!("Looking for {}", candidate.display());
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(Error::MarkerNotFound {
        marker: file_name.to_string(),
        start: start.to_path_buf(),
    })
}
