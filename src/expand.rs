//! Expansion of file and directory arguments into concrete input lists.
//!
//! Generators accept positional arguments that may be plain files, whole
//! directories, or shell-style wildcards. Directories are searched with a
//! per-generator filter pattern. Arguments that resolve to nothing warn on
//! standard error and are dropped; they never abort the invocation.

use std::path::{Path, PathBuf};

use glob::glob;
use tracing::debug;

/// Expand arguments into canonical paths of existing files.
///
/// Wildcard arguments are globbed; directory arguments (literal or matched
/// by a wildcard) are searched with `dir_filter`. Glob matches come back in
/// lexicographic order. With `quiet` set, the warnings are suppressed but
/// the result is unchanged.
pub fn expand_files(args: &[String], dir_filter: &str, quiet: bool) -> Vec<PathBuf> {
    let mut out = Vec::new();

    for arg in args {
        if arg.contains('*') || arg.contains('?') {
            let matches = glob_existing(arg);
            if matches.is_empty() {
                warn_missing(arg, quiet);
                continue;
            }
            for m in matches {
                if m.is_dir() {
                    expand_directory(&m, dir_filter, quiet, &mut out);
                } else {
                    out.push(m);
                }
            }
        } else {
            let path = Path::new(arg);
            if !path.exists() {
                warn_missing(arg, quiet);
            } else if path.is_dir() {
                expand_directory(path, dir_filter, quiet, &mut out);
            } else {
                out.push(path.to_path_buf());
            }
        }
    }

    let out: Vec<PathBuf> = out
        .into_iter()
        .map(|p| p.canonicalize().unwrap_or(p))
        .collect();
    debug!(files = out.len(), "expanded input arguments");
    out
}

/// Collect arguments as pattern strings without expanding directories.
///
/// This is the form embedded verbatim into generated scripts: a directory
/// argument becomes `dir/<dir_filter>` and wildcards pass through untouched.
/// Nonexistent non-wildcard arguments warn and are dropped.
pub fn collect_patterns(args: &[String], dir_filter: &str) -> Vec<String> {
    let mut out = Vec::new();

    for arg in args {
        if arg.contains('*') || arg.contains('?') || Path::new(arg).exists() {
            if Path::new(arg).is_dir() {
                out.push(format!("{}/{}", arg.trim_end_matches('/'), dir_filter));
            } else {
                out.push(arg.clone());
            }
        } else {
            eprintln!("Warning: file '{arg}' does not exist and will be ignored");
        }
    }

    out
}

/// Count the existing files the collected patterns resolve to.
///
/// Used for sample-count sanity warnings in the sweep generators.
pub fn count_matches(patterns: &[String]) -> usize {
    patterns
        .iter()
        .map(|p| {
            if p.contains('*') || p.contains('?') {
                glob_existing(p).len()
            } else {
                usize::from(Path::new(p).exists())
            }
        })
        .sum()
}

fn expand_directory(dir: &Path, dir_filter: &str, quiet: bool, out: &mut Vec<PathBuf>) {
    let pattern = format!("{}/{}", dir.display(), dir_filter);
    let matches = glob_existing(&pattern);
    if matches.is_empty() {
        if !quiet {
            eprintln!(
                "Warning: directory '{}' contains no matching files and will be ignored",
                dir.display()
            );
        }
    } else {
        out.extend(matches);
    }
}

/// Glob a pattern, treating pattern errors as "no match".
fn glob_existing(pattern: &str) -> Vec<PathBuf> {
    match glob(pattern) {
        Ok(paths) => paths.filter_map(Result::ok).collect(),
        Err(_) => Vec::new(),
    }
}

fn warn_missing(arg: &str, quiet: bool) {
    if !quiet {
        eprintln!("Warning: file/directory '{arg}' does not exist and will be ignored");
    }
}
