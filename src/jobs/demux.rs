//! Generator for the demultiplexing (`process_radtags`) job.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;

use crate::expand::collect_patterns;
use crate::jobs::{command_line, Partition};
use crate::modver::module_version;
use crate::slurm::{make_header, HeaderOptions};
use crate::template::{render_template, Substitutions};

/// Generate a Slurm script for demultiplexing RAD-tag read files.
#[derive(Args, Debug)]
pub struct DemuxArgs {
    /// (Read 1) files or directory to process. If a directory, -f selects
    /// files within.
    #[arg(value_name = "FILE", required = true)]
    pub file: Vec<String>,

    /// The partition (or queue) to submit the job to.
    #[arg(short, long, value_enum, default_value = "8hour")]
    pub partition: Partition,

    /// A filter to match files when searching a directory.
    #[arg(short = 'f', long = "dir-filter", value_name = "filter", default_value = "*_R1_*.f*q*")]
    pub dir_filter: String,

    /// Job max runtime.
    #[arg(short, long, value_name = "time", default_value = "01:00:00")]
    pub time: String,

    /// 1 or 2 enzymes used for cut sites.
    #[arg(short, long, value_name = "enzyme", num_args = 1..=2, default_values = ["ecoRI"])]
    pub enzyme: Vec<String>,

    /// Don't include the remainder (singleton) reads in the output.
    #[arg(short = 'r', long)]
    pub no_remainder: bool,
}

/// Render the process_radtags enzyme flags: a single enzyme uses `-e`,
/// a pair uses the `--renz_1`/`--renz_2` form.
fn enzyme_flags(enzymes: &[String]) -> String {
    match enzymes {
        [single] => format!("-e {single}"),
        [first, second, ..] => format!("--renz_1 {first} --renz_2 {second}"),
        [] => String::new(),
    }
}

impl DemuxArgs {
    /// Render the demultiplexing job script to standard output.
    pub fn run(&self) -> Result<()> {
        let header = make_header(&HeaderOptions {
            partition: self.partition.as_str().to_string(),
            ntasks: 1,
            time: self.time.clone(),
            ..Default::default()
        });

        let enzymes = enzyme_flags(&self.enzyme);

        let files = collect_patterns(&self.file, &self.dir_filter);

        let mut subs = Substitutions::new();
        subs.insert("slurmheader", header);
        subs.insert("datetime", Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
        subs.insert("enzymes", enzymes);
        subs.insert("files", files.join(" "));
        subs.insert(
            "stacksversion",
            module_version("stacks-gcc").context("looking up stacks version")?,
        );
        subs.insert(
            "radpipelineversion",
            module_version("rad-pipeline").context("looking up rad-pipeline version")?,
        );
        subs.insert("CMD", command_line());
        subs.insert(
            "norem",
            if self.no_remainder { "#" } else { "" }.to_string(),
        );

        let script = render_template("demux.slurm", &subs)?;
        print!("{script}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_enzyme_uses_short_flag() {
        assert_eq!(enzyme_flags(&["ecoRI".to_string()]), "-e ecoRI");
    }

    #[test]
    fn two_enzymes_use_paired_restriction_flags() {
        let enzymes = vec!["ecoRI".to_string(), "mspI".to_string()];
        assert_eq!(enzyme_flags(&enzymes), "--renz_1 ecoRI --renz_2 mspI");
    }
}
