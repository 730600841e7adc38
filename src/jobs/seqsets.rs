//! Generator for the seq-sets filtering job, which partitions raw reads by
//! their kraken classification results.

use anyhow::{bail, Context, Result};
use clap::Args;

use crate::expand::expand_files;
use crate::jobs::{command_line, Partition};
use crate::modver::module_version;
use crate::slurm::{make_header, HeaderOptions};
use crate::template::{render_template, Substitutions};

/// Generate a Slurm script for running seq-sets on raw and kraken files.
#[derive(Args, Debug)]
pub struct SeqSetsArgs {
    /// Files or directory of raw fastq/a sequences to filter. If a
    /// directory, -f selects files within.
    #[arg(value_name = "RAWFILE", required = true)]
    pub rawfile: Vec<String>,

    /// The partition (or queue) to submit the job to.
    #[arg(short, long, value_enum, default_value = "8hour")]
    pub partition: Partition,

    /// A filter to match files when searching a directory.
    #[arg(short = 'f', long = "dir-filter", value_name = "filter", default_value = "*.f*q")]
    pub dir_filter: String,

    /// Files or directory of kraken-classified fastq/a sequences. If a
    /// directory, -K selects files within.
    #[arg(short = 'k', long = "kraken-file", value_name = "FILE", required = true, num_args = 1..)]
    pub kraken_file: Vec<String>,

    /// A filter to match files when searching a kraken result directory.
    #[arg(
        short = 'K',
        long = "kraken-dir-filter",
        value_name = "filter",
        default_value = "*_classified.f*q"
    )]
    pub kraken_dir_filter: String,
}

impl SeqSetsArgs {
    /// Render the seq-sets job script to standard output.
    ///
    /// Both input lists are fully expanded to canonical file paths; an
    /// empty expansion of either is fatal, and both failures are reported
    /// before exiting.
    pub fn run(&self) -> Result<()> {
        let rawfiles = expand_files(&self.rawfile, &self.dir_filter, false);
        let krakenfiles = expand_files(&self.kraken_file, &self.kraken_dir_filter, false);

        let mut error = false;
        if rawfiles.is_empty() {
            eprintln!("No RAW files found: '{}'", self.rawfile.join(" "));
            error = true;
        }
        if krakenfiles.is_empty() {
            eprintln!("No KRAKEN files found: '{}'", self.kraken_file.join(" "));
            error = true;
        }
        if error {
            bail!("no input files after expansion");
        }

        let joined = |files: &[std::path::PathBuf]| {
            files
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };

        let mut subs = Substitutions::new();
        subs.insert("rawfiles", joined(&rawfiles));
        subs.insert("krakenfiles", joined(&krakenfiles));
        subs.insert(
            "slurmheader",
            make_header(&HeaderOptions {
                partition: self.partition.as_str().to_string(),
                ..Default::default()
            }),
        );
        subs.insert(
            "biostreamtoolsversion",
            module_version("biostreamtools").context("looking up biostreamtools version")?,
        );
        subs.insert(
            "parallelversion",
            module_version("parallel").context("looking up parallel version")?,
        );
        subs.insert(
            "radpipelineversion",
            module_version("rad-pipeline").context("looking up rad-pipeline version")?,
        );
        subs.insert("CMD", command_line());

        let script = render_template("seqsets.slurm", &subs)?;
        print!("{script}");
        Ok(())
    }
}
