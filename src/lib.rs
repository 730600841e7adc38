//! # rad-pipeline
//!
//! Command-line utilities for a RAD-seq genomics workflow on a Slurm
//! cluster. Two independent families of tools live here:
//!
//! 1. **Job-script generators** — render a ready-to-submit Slurm batch
//!    script from a static template, CLI parameters, expanded file
//!    arguments, computed sweep values, and module-version banner lines.
//! 2. **Loci/consensus tools** — parse a pyRAD `.loci` alignment file,
//!    build a per-locus majority-vote consensus, and either merge a
//!    variant listing into a summary report or convert loci to FASTA.
//!
//! Everything runs single-threaded within one process invocation; the
//! only state shared across invocations is the append-only `process.log`.

#![warn(missing_docs, missing_debug_implementations)]

pub mod consensus; // per-column majority vote over aligned sequences
pub mod loci;      // .loci parsing and loci -> FASTA conversion
pub mod features;  // variant merge / summary report
pub mod expand;    // wildcard/directory expansion of input arguments
pub mod sweep;     // evenly-spaced and centred sweep value computation
pub mod template;  // template loading and placeholder substitution
pub mod slurm;     // batch header rendering, slurm.conf discovery
pub mod joblog;    // process.log discovery and appending
pub mod modver;    // module-version lookup subprocess
pub mod jobs;      // the job-script generator subcommands

// Re-exports for convenience
pub use consensus::{consensus, ConsensusError};
pub use features::{render_summary, write_summary, FeatureError};
pub use loci::{loci_to_fasta, LociError, LociFile, Locus};
pub use sweep::{centered, SweepError, SweepRange};
pub use template::{load_template, render, TemplateError};
