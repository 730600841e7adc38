//! Slurm job-script generators.
//!
//! Each submodule is one generator subcommand. They all follow the same
//! shape: log the invocation, collect and validate inputs, resolve the
//! template substitutions (including module-version banner lines), render
//! the named template, and print the script to standard output. Validation
//! failures report every problem to standard error before exiting nonzero.

mod demux;
mod denovo_opt;
mod kraken;
mod seqsets;

pub use demux::DemuxArgs;
pub use denovo_opt::{DenovoOpt1Args, DenovoOpt2Args};
pub use kraken::KrakenArgs;
pub use seqsets::SeqSetsArgs;

use clap::ValueEnum;

use crate::slurm::{make_exclusive_header, make_header, ExclusiveHeaderOptions, HeaderOptions};

/// Cluster partitions jobs may be submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Partition {
    /// Large-memory nodes.
    Bigmem,
    /// Short-job queue with an eight hour cap.
    #[value(name = "8hour")]
    EightHour,
    /// General compute queue.
    Compute,
}

impl Partition {
    /// The partition name as Slurm knows it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Bigmem => "bigmem",
            Partition::EightHour => "8hour",
            Partition::Compute => "compute",
        }
    }
}

/// Render the batch header for a core request.
///
/// `cores == 0` requests an exclusive whole node (with `mem` as the
/// exclusive allocation); otherwise a shared header sized in tasks.
pub(crate) fn header_for_cores(partition: Partition, cores: u32, mem: &str) -> String {
    if cores == 0 {
        make_exclusive_header(&ExclusiveHeaderOptions {
            partition: partition.as_str().to_string(),
            mem: mem.to_string(),
            ..Default::default()
        })
    } else {
        make_header(&HeaderOptions {
            partition: partition.as_str().to_string(),
            ntasks: cores,
            ..Default::default()
        })
    }
}

/// The full command line, re-joined for the `{CMD}` banner placeholder.
pub(crate) fn command_line() -> String {
    std::env::args().collect::<Vec<_>>().join(" ")
}
