//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Errors should tell users what went
//! wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use auto_compose::suggestions;
//!
//! let err = auto_compose::load_catalog(None, &ctx, &sub)
//!     .map_err(|e| suggestions::explain(e, None))?;
//! ```

use std::path::Path;

use crate::catalog::Catalog;
use crate::defaults::MARKER_FILE;
use crate::error::Error;

/// Turn a library error into a user-facing error with hints.
///
/// `catalog` is used to suggest known service and overlay names.
pub fn explain(error: Error, catalog: Option<&Catalog>) -> anyhow::Error {
    match (&error, catalog) {
        (Error::MarkerNotFound { start, .. }, _) => marker_not_found(start),
        (Error::ServiceNotFound { service }, Some(catalog)) => {
            let known: Vec<&str> = catalog.service_names().collect();
            unknown_name(&error, service, &known)
        }
        (Error::OptionNotFound { service, option }, Some(catalog)) => {
            let known: Vec<&str> = catalog
                .get(service)
                .map(|s| s.options.keys().map(String::as_str).collect())
                .unwrap_or_default();
            unknown_name(&error, option, &known)
        }
        (Error::IncludeCycle { .. }, _) => anyhow::anyhow!(
            "{error}\n\n\
             hint: Remove one of the 'includes' entries to break the cycle"
        ),
        (Error::ComposeSpawn { .. }, _) => anyhow::anyhow!(
            "{error}\n\n\
             hint: Make sure docker-compose is installed and on your PATH\n\
             hint: Use --compose-bin or AUTO_COMPOSE_BIN to pick another binary"
        ),
        _ => anyhow::Error::new(error),
    }
}

/// Generate an error for when no marker file is found.
///
/// Includes hints about:
/// - Creating a marker file
/// - Using the -f/--file flag
/// - Using the AUTO_COMPOSE_FILE environment variable
pub fn marker_not_found(start: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "{MARKER_FILE} not found in {start} or any parent directory\n\n\
         hint: Create a {MARKER_FILE} file in your project root\n\
         hint: Use -f/--file to specify a different path\n\
         hint: Set AUTO_COMPOSE_FILE environment variable",
        start = start.display()
    )
}

fn unknown_name(error: &Error, name: &str, known: &[&str]) -> anyhow::Error {
    let did_you_mean = find_similar(name, known)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();
    let available = if known.is_empty() {
        "none".to_string()
    } else {
        known.join(", ")
    };

    anyhow::anyhow!("{error}{did_you_mean}\n\nAvailable: {available}")
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the edit distance between two strings.
///
/// Optimal string alignment: insertions, deletions, substitutions and swaps
/// of two neighbouring characters each count as one edit.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let width = b_chars.len() + 1;

    let mut rows: Vec<Vec<usize>> = Vec::with_capacity(a_chars.len() + 1);
    rows.push((0..width).collect());
    for i in 1..=a_chars.len() {
        let mut current = vec![i; width];
        for j in 1..width {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            let mut best = (rows[i - 1][j] + 1)
                .min(current[j - 1] + 1)
                .min(rows[i - 1][j - 1] + cost);
            if i > 1
                && j > 1
                && a_chars[i - 1] == b_chars[j - 2]
                && a_chars[i - 2] == b_chars[j - 1]
            {
                best = best.min(rows[i - 2][j - 2] + 1);
            }
            current[j] = best;
        }
        rows.push(current);
    }

    rows[a_chars.len()][b_chars.len()]
}
