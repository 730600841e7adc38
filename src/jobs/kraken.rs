//! Generator for the kraken taxonomic-classification job.

use anyhow::{Context, Result};
use clap::Args;

use crate::expand::collect_patterns;
use crate::jobs::{command_line, header_for_cores, Partition};
use crate::modver::module_version;
use crate::template::{render_template, Substitutions};

/// Generate a Slurm script for running kraken on a collection of files.
#[derive(Args, Debug)]
pub struct KrakenArgs {
    /// Files or directory to process. If a directory, -f selects files
    /// within.
    #[arg(value_name = "FILE", required = true)]
    pub file: Vec<String>,

    /// The number of cores to use, 0=exclusive.
    #[arg(short = 'j', long, value_name = "N", default_value_t = 0)]
    pub cores: u32,

    /// The partition (or queue) to submit the job to.
    #[arg(short, long, value_enum, default_value = "bigmem")]
    pub partition: Partition,

    /// A filter to match files when searching a directory.
    #[arg(short = 'f', long = "dir-filter", value_name = "filter", default_value = "*.fastq")]
    pub dir_filter: String,
}

impl KrakenArgs {
    /// Render the kraken job script to standard output.
    pub fn run(&self) -> Result<()> {
        let mut subs = Substitutions::new();
        subs.insert(
            "slurmheader",
            header_for_cores(self.partition, self.cores, "250000"),
        );

        let files = collect_patterns(&self.file, &self.dir_filter);
        subs.insert("files", files.join(" "));

        subs.insert(
            "krakenversion",
            module_version("kraken").context("looking up kraken version")?,
        );
        subs.insert(
            "radpipelineversion",
            module_version("rad-pipeline").context("looking up rad-pipeline version")?,
        );
        subs.insert("CMD", command_line());

        let script = render_template("kraken.slurm", &subs)?;
        print!("{script}");
        Ok(())
    }
}
