//! Slurm batch-header rendering and site `slurm.conf` discovery.
//!
//! Every generated script opens with one of two headers: a shared-node
//! header sized in tasks, or an exclusive whole-node header. Both inline
//! the contents of a `slurm.conf` found by walking upward from the working
//! directory, letting a project directory override scheduler defaults.

use std::path::{Path, PathBuf};

/// Options for the shared (non-exclusive) header.
#[derive(Debug, Clone)]
pub struct HeaderOptions {
    /// Partition (queue) name.
    pub partition: String,
    /// Number of tasks to request.
    pub ntasks: u32,
    /// Memory per CPU in megabytes.
    pub mem: String,
    /// Wall-clock limit, `HH:MM:SS`.
    pub time: String,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            partition: "compute".to_string(),
            ntasks: 1,
            mem: "1024".to_string(),
            time: "1:00:00".to_string(),
        }
    }
}

/// Options for the exclusive whole-node header.
#[derive(Debug, Clone)]
pub struct ExclusiveHeaderOptions {
    /// Partition (queue) name.
    pub partition: String,
    /// Number of nodes to request.
    pub nodes: u32,
    /// Total memory in megabytes.
    pub mem: String,
    /// Wall-clock limit, `HH:MM:SS`.
    pub time: String,
}

impl Default for ExclusiveHeaderOptions {
    fn default() -> Self {
        Self {
            partition: "compute".to_string(),
            nodes: 1,
            mem: "250000".to_string(),
            time: "8:00:00".to_string(),
        }
    }
}

/// Render the shared-node header, inlining any discovered `slurm.conf`.
pub fn make_header(opts: &HeaderOptions) -> String {
    format!(
        "#!/bin/bash\n\
         #SBATCH --ntasks={ntasks}\n\
         #SBATCH --time={time}\n\
         #SBATCH --mem-per-cpu={mem}\n\
         #SBATCH --partition={partition}\n\
         {conf}\n",
        ntasks = opts.ntasks,
        time = opts.time,
        mem = opts.mem,
        partition = opts.partition,
        conf = slurm_conf_contents(),
    )
}

/// Render the exclusive whole-node header, inlining any discovered
/// `slurm.conf`.
pub fn make_exclusive_header(opts: &ExclusiveHeaderOptions) -> String {
    format!(
        "#!/bin/bash\n\
         #SBATCH --nodes={nodes}\n\
         #SBATCH --exclusive\n\
         #SBATCH --mem={mem}\n\
         #SBATCH --time={time}\n\
         #SBATCH --partition={partition}\n\
         {conf}\n",
        nodes = opts.nodes,
        mem = opts.mem,
        time = opts.time,
        partition = opts.partition,
        conf = slurm_conf_contents(),
    )
}

/// Walk upward from `start` looking for a `slurm.conf`.
///
/// The walk stops without a result at the filesystem root or at `/home`,
/// so one user's config never leaks into another's tree.
pub fn find_slurm_conf(start: &Path) -> Option<PathBuf> {
    let mut dir = start.canonicalize().ok()?;
    loop {
        if dir == Path::new("/") || dir == Path::new("/home") {
            return None;
        }
        let candidate = dir.join("slurm.conf");
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?.to_path_buf();
    }
}

fn slurm_conf_contents() -> String {
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(_) => return String::new(),
    };
    match find_slurm_conf(&cwd) {
        Some(path) => std::fs::read_to_string(path).unwrap_or_default(),
        None => String::new(),
    }
}
