use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rad_pipeline::features::write_summary;
use rad_pipeline::jobs::{DemuxArgs, DenovoOpt1Args, DenovoOpt2Args, KrakenArgs, SeqSetsArgs};
use rad_pipeline::joblog;
use rad_pipeline::loci::{loci_to_fasta, LociFile};

#[derive(Parser, Debug)]
#[command(
    name = "rad-pipeline",
    about = "Slurm job-script generators and loci/consensus tools for RAD-seq workflows"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a Slurm script for demultiplexing RAD-tag read files.
    Demux(DemuxArgs),
    /// Generate a Slurm script sweeping denovo_map.pl parameter ranges.
    DenovoOpt1(DenovoOpt1Args),
    /// Generate a Slurm script refining denovo_map.pl parameters around
    /// chosen targets.
    DenovoOpt2(DenovoOpt2Args),
    /// Generate a Slurm script for kraken taxonomic classification.
    Kraken(KrakenArgs),
    /// Generate a Slurm script for seq-sets filtering of raw reads by
    /// kraken classification.
    SeqSets(SeqSetsArgs),
    /// Compute a summary and consensus sequence for each variant feature.
    FeatureSummary {
        /// File containing the loci sequences for each sample.
        locifile: PathBuf,
        /// File containing features of interest, generally a filtered
        /// version of the pyRAD VCF output.
        featurefile: PathBuf,
    },
    /// Convert a pyRAD loci file into FASTA (first read per locus).
    Loci2fasta {
        /// File containing the loci sequences for each sample.
        locifile: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let argv: Vec<String> = std::env::args().collect();

    match cli.command {
        Commands::Demux(args) => {
            joblog::log_invocation(&argv);
            args.run()
        }
        Commands::DenovoOpt1(args) => {
            joblog::log_invocation(&argv);
            args.run()
        }
        Commands::DenovoOpt2(args) => {
            joblog::log_invocation(&argv);
            args.run()
        }
        Commands::Kraken(args) => {
            joblog::log_invocation(&argv);
            args.run()
        }
        Commands::SeqSets(args) => {
            joblog::log_invocation(&argv);
            args.run()
        }
        Commands::FeatureSummary {
            locifile,
            featurefile,
        } => run_feature_summary(&locifile, &featurefile),
        Commands::Loci2fasta { locifile } => run_loci2fasta(&locifile),
    }
}

fn run_feature_summary(locifile: &PathBuf, featurefile: &PathBuf) -> Result<()> {
    let loci_reader = BufReader::new(
        File::open(locifile)
            .with_context(|| format!("failed to open loci file {}", locifile.display()))?,
    );
    let loci = LociFile::parse(loci_reader)
        .with_context(|| format!("failed to parse loci file {}", locifile.display()))?;

    let variant_reader = BufReader::new(
        File::open(featurefile)
            .with_context(|| format!("failed to open feature file {}", featurefile.display()))?,
    );

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_summary(variant_reader, &loci, &mut out)
        .context("failed to merge features with consensus")?;
    out.flush()?;
    Ok(())
}

fn run_loci2fasta(locifile: &PathBuf) -> Result<()> {
    let reader = BufReader::new(
        File::open(locifile)
            .with_context(|| format!("failed to open loci file {}", locifile.display()))?,
    );

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    loci_to_fasta(reader, &mut out)
        .with_context(|| format!("failed to convert {}", locifile.display()))?;
    out.flush()?;
    Ok(())
}
