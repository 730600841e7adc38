//! Merge a variant listing against per-locus consensus sequences.
//!
//! The variant file is a tab-delimited listing in the VCF shape produced by
//! pyRAD: `##` meta lines, one `#CHROM …` column header, then one record per
//! line whose first field names a locus and whose second field is a 1-based
//! position within it. Each record is joined with its locus consensus and
//! reported with the variant base bracketed in the consensus string.

use std::io::{BufRead, Write};

use thiserror::Error;

use crate::loci::LociFile;

/// Errors produced while merging variants with the consensus map.
#[derive(Error, Debug)]
pub enum FeatureError {
    /// Underlying I/O failure.
    #[error("failed to process variant input: {0}")]
    Io(#[from] std::io::Error),

    /// A record referenced a locus id absent from the loci file.
    #[error("line {line}: variant references unknown locus '{locus}'")]
    UnknownLocus {
        /// 1-based line number of the record.
        line: usize,
        /// The locus id that failed to resolve.
        locus: String,
    },

    /// The position field was not a positive integer.
    #[error("line {line}: invalid variant position '{value}'")]
    InvalidPosition {
        /// 1-based line number of the record.
        line: usize,
        /// The raw position field.
        value: String,
    },

    /// The 1-based position fell outside the consensus sequence.
    #[error(
        "line {line}: position {position} is outside locus '{locus}' (consensus length {length})"
    )]
    PositionOutOfRange {
        /// 1-based line number of the record.
        line: usize,
        /// The locus id referenced by the record.
        locus: String,
        /// The offending 1-based position.
        position: usize,
        /// Length of the locus consensus.
        length: usize,
    },
}

/// Render a consensus with the base at `position` (1-based) bracketed,
/// e.g. position 3 of `AAAT` becomes `AA<A>T`.
pub fn bracket_position(consensus: &str, position: usize) -> Option<String> {
    if position == 0 || position > consensus.len() {
        return None;
    }
    let before = &consensus[..position - 1];
    let base = &consensus[position - 1..position];
    let after = &consensus[position..];
    Some(format!("{before}<{base}>{after}"))
}

/// Stream a variant file, writing one summary row per data record.
///
/// `##` lines are skipped. A single-`#` line is the column header and emits
/// the report header row. Data records with fewer than 4 tab fields are
/// skipped; only the first 8 fields of a record are carried into the output.
pub fn write_summary<R: BufRead, W: Write>(
    variants: R,
    loci: &LociFile,
    writer: &mut W,
) -> Result<(), FeatureError> {
    for (idx, line) in variants.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;

        if line.starts_with("##") {
            continue;
        }

        let fields: Vec<&str> = line.splitn(9, '\t').take(8).collect();

        if line.starts_with('#') {
            writeln!(
                writer,
                "SNP_ID\tCONTIG#\t{}\tCONSENSUS\tMEMBERS",
                fields[1..].join("\t")
            )?;
            continue;
        }

        if fields.len() < 4 {
            continue;
        }

        let locus_id = fields[0];
        let position: usize =
            fields[1]
                .parse()
                .map_err(|_| FeatureError::InvalidPosition {
                    line: line_no,
                    value: fields[1].to_string(),
                })?;

        let locus = loci.get(locus_id).ok_or_else(|| FeatureError::UnknownLocus {
            line: line_no,
            locus: locus_id.to_string(),
        })?;

        let bracketed = bracket_position(&locus.consensus, position).ok_or(
            FeatureError::PositionOutOfRange {
                line: line_no,
                locus: locus_id.to_string(),
                position,
                length: locus.consensus.len(),
            },
        )?;

        writeln!(
            writer,
            "{}:{}\t{}\t{}\t{}",
            locus_id,
            fields[1],
            fields.join("\t"),
            bracketed,
            locus.members.join(",")
        )?;
    }

    Ok(())
}

/// Render the summary into a `String` (useful for tests and snapshots).
pub fn render_summary<R: BufRead>(variants: R, loci: &LociFile) -> Result<String, FeatureError> {
    let mut buffer = Vec::new();
    write_summary(variants, loci, &mut buffer)?;
    Ok(String::from_utf8(buffer).expect("summary output is ASCII"))
}
