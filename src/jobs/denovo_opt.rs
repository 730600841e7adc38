//! Generators for the two `denovo_map.pl` parameter-optimisation jobs.
//!
//! Pass 1 sweeps each of `-m`, `-n`, `-M` across an explicit low-high range
//! sliced into evenly-spaced samples. Pass 2 refines around chosen targets,
//! sweeping `target-count ..= target+count` per parameter.

use anyhow::{bail, Context, Result};
use clap::Args;

use crate::expand::{collect_patterns, count_matches};
use crate::jobs::{command_line, header_for_cores, Partition};
use crate::modver::module_version;
use crate::sweep::{centered, join_values, SweepRange};
use crate::template::{render_template, Substitutions};

/// Exclusive-node task count assumed when `-j 0` is given.
const EXCLUSIVE_CORES: u32 = 16;
/// Memory request for exclusive optimisation runs.
const EXCLUSIVE_MEM: &str = "64000";

/// Flags shared by both optimisation passes.
#[derive(Args, Debug)]
pub struct DenovoCommonArgs {
    /// Files or directory to process. If a directory, -f selects files
    /// within.
    #[arg(value_name = "FILE", required = true)]
    pub file: Vec<String>,

    /// Total number of cores to use, 0=exclusive.
    #[arg(short = 'j', long, value_name = "N", default_value_t = 0)]
    pub cores: u32,

    /// Number of cores each task (trial) uses.
    #[arg(long, value_name = "T", default_value_t = 2)]
    pub cores_task: u32,

    /// The partition (or queue) to submit the job to.
    #[arg(short, long, value_enum, default_value = "compute")]
    pub partition: Partition,

    /// Other command line options to pass to denovo_map.pl.
    #[arg(long, value_name = "OPTS", default_value = "-S -t")]
    pub denovo_opts: String,

    /// Keep the denovo log files for each trial.
    #[arg(long)]
    pub keep_denovo_log: bool,

    /// A filter to match files when searching a directory.
    #[arg(short = 'f', long = "dir-filter", value_name = "filter", default_value = "*.f*q")]
    pub dir_filter: String,
}

impl DenovoCommonArgs {
    /// Fill the substitutions every optimisation pass shares, returning
    /// the collected file patterns for validation.
    fn base_substitutions(&self, batch_id: u32, subs: &mut Substitutions) -> Result<Vec<String>> {
        if self.cores_task == 0 {
            bail!("--cores-task must be at least 1");
        }
        let cores = if self.cores == 0 {
            EXCLUSIVE_CORES
        } else {
            self.cores
        };
        subs.insert(
            "slurmheader",
            header_for_cores(self.partition, self.cores, EXCLUSIVE_MEM),
        );

        let files = collect_patterns(&self.file, &self.dir_filter);
        subs.insert("files", files.join(" "));

        subs.insert(
            "stacksversion",
            module_version("stacks-gcc").context("looking up stacks version")?,
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

        subs.insert(
            "nocpdenovo",
            if self.keep_denovo_log { "" } else { "#" }.to_string(),
        );
        subs.insert("corestask", self.cores_task.to_string());
        subs.insert("paralleljobs", (cores / self.cores_task).to_string());
        subs.insert("denovoopts", self.denovo_opts.clone());
        subs.insert("batchid", batch_id.to_string());

        Ok(files)
    }

    /// Warn when the number of sample files is outside the useful window
    /// for parameter optimisation.
    fn warn_sample_count(&self, files: &[String]) {
        if let Some(warning) = sample_count_warning(count_matches(files)) {
            eprintln!("{warning}");
        }
    }
}

/// Warning text for a sample count outside the useful 2..=6 window.
fn sample_count_warning(count: usize) -> Option<String> {
    if (2..=6).contains(&count) {
        return None;
    }
    Some(format!(
        "Warning: suboptimal number of samples ({count}).  \
         You should use 2 to 6 representitive samples."
    ))
}

/// CLI flags for the sweep targets that were not supplied.
fn missing_target_flags(
    m_target: Option<i64>,
    n_target: Option<i64>,
    m_big_target: Option<i64>,
) -> Vec<&'static str> {
    let mut missing = Vec::new();
    for (flag, value) in [
        ("-m (--m-target)", m_target),
        ("-n (--n-target)", n_target),
        ("-M (--M-target)", m_big_target),
    ] {
        if value.is_none() {
            missing.push(flag);
        }
    }
    missing
}

/// Generate a Slurm script sweeping denovo_map.pl parameters over ranges.
#[derive(Args, Debug)]
pub struct DenovoOpt1Args {
    #[command(flatten)]
    common: DenovoCommonArgs,

    /// The range of values to use for the -m option.
    #[arg(short = 'm', long, value_name = "d-D", default_value = "3-10")]
    pub m_range: SweepRange,

    /// The number of values to sample across the -m range.
    #[arg(long, value_name = "N", default_value_t = 3)]
    pub m_count: usize,

    /// The range of values to use for the -n option.
    #[arg(short = 'n', long, value_name = "d-D", default_value = "5-20")]
    pub n_range: SweepRange,

    /// The number of values to sample across the -n range.
    #[arg(long, value_name = "N", default_value_t = 4)]
    pub n_count: usize,

    /// The range of values to use for the -M option.
    #[arg(short = 'M', long = "M-range", value_name = "d-D", default_value = "5-20")]
    pub m_big_range: SweepRange,

    /// The number of values to sample across the -M range.
    #[arg(long = "M-count", value_name = "N", default_value_t = 4)]
    pub m_big_count: usize,

    /// The batch id to use for denovo_map.pl.
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub batch_id: u32,
}

impl DenovoOpt1Args {
    /// Render the range-sweep optimisation script to standard output.
    pub fn run(&self) -> Result<()> {
        let mut subs = Substitutions::new();
        let files = self.common.base_substitutions(self.batch_id, &mut subs)?;

        subs.insert("mvalues", join_values(&self.m_range.evenly_spaced(self.m_count)?));
        subs.insert("nvalues", join_values(&self.n_range.evenly_spaced(self.n_count)?));
        subs.insert(
            "Mvalues",
            join_values(&self.m_big_range.evenly_spaced(self.m_big_count)?),
        );

        self.common.warn_sample_count(&files);

        let script = render_template("denovo_opt1.slurm", &subs)?;
        print!("{script}");
        Ok(())
    }
}

/// Generate a Slurm script refining denovo_map.pl parameters around targets.
#[derive(Args, Debug)]
pub struct DenovoOpt2Args {
    #[command(flatten)]
    common: DenovoCommonArgs,

    /// The target (i.e. centre) value to use for the -m option.
    #[arg(short = 'm', long, value_name = "N")]
    pub m_target: Option<i64>,

    /// The number of values to use either side of the -m target.
    #[arg(long, value_name = "N", default_value_t = 2)]
    pub m_count: i64,

    /// The target (i.e. centre) value to use for the -n option.
    #[arg(short = 'n', long, value_name = "N")]
    pub n_target: Option<i64>,

    /// The number of values to use either side of the -n target.
    #[arg(long, value_name = "N", default_value_t = 2)]
    pub n_count: i64,

    /// The target (i.e. centre) value to use for the -M option.
    #[arg(short = 'M', long = "M-target", value_name = "N")]
    pub m_big_target: Option<i64>,

    /// The number of values to use either side of the -M target.
    #[arg(long = "M-count", value_name = "N", default_value_t = 2)]
    pub m_big_count: i64,

    /// The batch id to use for denovo_map.pl.
    #[arg(long, value_name = "N", default_value_t = 2)]
    pub batch_id: u32,
}

impl DenovoOpt2Args {
    /// Render the target-refinement optimisation script to standard output.
    ///
    /// All three targets are required; every missing one is reported
    /// before the invocation fails.
    pub fn run(&self) -> Result<()> {
        let missing = missing_target_flags(self.m_target, self.n_target, self.m_big_target);
        if !missing.is_empty() {
            for flag in &missing {
                eprintln!("Error: option {flag} is required");
            }
            bail!("missing required sweep targets");
        }

        let mut subs = Substitutions::new();
        let files = self.common.base_substitutions(self.batch_id, &mut subs)?;

        subs.insert(
            "mvalues",
            join_values(&centered(self.m_target.unwrap(), self.m_count)),
        );
        subs.insert(
            "nvalues",
            join_values(&centered(self.n_target.unwrap(), self.n_count)),
        );
        subs.insert(
            "Mvalues",
            join_values(&centered(self.m_big_target.unwrap(), self.m_big_count)),
        );

        self.common.warn_sample_count(&files);

        let script = render_template("denovo_opt2.slurm", &subs)?;
        print!("{script}");
        Ok(())
    }
}
