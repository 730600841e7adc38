//! Append-only invocation log (`process.log`).
//!
//! Each generator records its own command line so a project directory keeps
//! a history of how its job scripts were produced. The log file is searched
//! upward from the working directory; if none exists, logging is skipped
//! entirely. Appends are unsynchronized: concurrent invocations may
//! interleave lines, an accepted limitation.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use chrono::Local;
use tracing::debug;

/// Installation prefix stripped from the logged program name.
const INSTALL_PREFIX: &str = "/usr/local/bin/";

/// Location of a discovered `process.log` plus the path walked to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTarget {
    /// The log file itself.
    pub path: PathBuf,
    /// Relative path from the log's directory down to the working
    /// directory, with a trailing slash (empty when they coincide).
    pub relpath: String,
}

/// Walk upward from `start` for a `process.log`, stopping at `/` or `/home`.
pub fn find_log(start: &Path) -> Option<LogTarget> {
    let dir = start.canonicalize().ok()?;
    let mut dir = dir.as_path();
    let mut relpath = String::new();

    loop {
        if dir == Path::new("/") || dir == Path::new("/home") {
            return None;
        }
        let candidate = dir.join("process.log");
        if candidate.is_file() {
            return Some(LogTarget {
                path: candidate,
                relpath,
            });
        }
        if let Some(Component::Normal(name)) = dir.components().next_back() {
            relpath = format!("{}/{}", name.to_string_lossy(), relpath);
        }
        dir = dir.parent()?;
    }
}

/// Record a command-line invocation in the nearest `process.log`.
///
/// The program name is stripped of the installation prefix and every
/// argument is double-quoted. Absent log file or append failure is
/// silently ignored; logging never blocks script generation.
pub fn log_invocation(argv: &[String]) {
    let Some(prog) = argv.first() else {
        return;
    };
    let prog = prog.strip_prefix(INSTALL_PREFIX).unwrap_or(prog);
    let args: Vec<String> = argv[1..].iter().map(|a| format!("\"{a}\"")).collect();
    let entry = format!("{} {}", prog, args.join(" "));
    append_entry(&entry);
}

/// Append one timestamped line to the nearest `process.log`, if any.
pub fn append_entry(entry: &str) {
    let Ok(cwd) = std::env::current_dir() else {
        return;
    };
    let Some(target) = find_log(&cwd) else {
        debug!("no process.log in scope, skipping invocation log");
        return;
    };

    let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let line = format!("{}: [{}] {}\n", stamp, target.relpath, entry);
    if let Ok(mut file) = std::fs::OpenOptions::new().append(true).open(&target.path) {
        let _ = file.write_all(line.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn finds_log_and_tracks_relative_path() {
        let root = tempdir().unwrap();
        std::fs::write(root.path().join("process.log"), "").unwrap();
        let nested = root.path().join("project/run1");
        std::fs::create_dir_all(&nested).unwrap();

        let target = find_log(&nested).unwrap();
        assert_eq!(
            target.path,
            root.path().canonicalize().unwrap().join("process.log")
        );
        assert_eq!(target.relpath, "project/run1/");
    }

    #[test]
    fn log_in_working_directory_has_empty_relpath() {
        let root = tempdir().unwrap();
        std::fs::write(root.path().join("process.log"), "").unwrap();

        let target = find_log(root.path()).unwrap();
        assert_eq!(target.relpath, "");
    }

    #[test]
    fn missing_log_yields_none() {
        // The walk stops at `/`; a bare temp tree carries no process.log.
        let root = tempdir().unwrap();
        let nested = root.path().join("empty");
        std::fs::create_dir_all(&nested).unwrap();
        // Only asserts shape: ancestors outside the temp tree are not ours
        // to control, so tolerate a hit there.
        if let Some(target) = find_log(&nested) {
            assert!(target.path.ends_with("process.log"));
        }
    }

    #[test]
    fn prefix_is_stripped_from_program_name() {
        let prog = "/usr/local/bin/rad-pipeline";
        assert_eq!(
            prog.strip_prefix(INSTALL_PREFIX).unwrap(),
            "rad-pipeline"
        );
    }
}
