//! Parser for pyRAD `.loci` alignment files.
//!
//! A `.loci` file is a sequence of locus blocks. Each block is a run of
//! `id sequence` lines (the sample id usually carries a leading `>`),
//! closed by a terminator line that starts with `//` and names the locus
//! after a `|` separator, e.g. `//  *   -   |42`. Blank lines are skipped.
//!
//! A trailing block without a terminator is silently dropped, matching the
//! upstream pipeline's behavior.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::debug;

use crate::consensus::{consensus, ConsensusError};

/// Errors produced while parsing a `.loci` file.
#[derive(Error, Debug)]
pub enum LociError {
    /// Underlying I/O failure while reading lines.
    #[error("failed to read loci input: {0}")]
    Io(#[from] std::io::Error),

    /// A `//` terminator line did not carry a `|locus-id` suffix.
    #[error("line {line}: locus terminator is missing a '|<id>' suffix")]
    MissingLocusId {
        /// 1-based line number of the terminator.
        line: usize,
    },

    /// A sequence line did not split into exactly an id and a sequence.
    #[error("line {line}: expected 'id sequence', got {fields} fields")]
    MalformedSequenceLine {
        /// 1-based line number of the offending record.
        line: usize,
        /// Number of whitespace-separated fields actually present.
        fields: usize,
    },

    /// Sequences within one locus disagreed on alignment length.
    #[error("locus '{locus}': {source}")]
    Consensus {
        /// Identifier of the locus being consumed.
        locus: String,
        /// The underlying length mismatch.
        source: ConsensusError,
    },
}

/// One parsed locus: its consensus and the contributing sample ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locus {
    /// Majority-vote consensus over the aligned member sequences.
    pub consensus: String,
    /// Sample ids in file order (leading `>` stripped).
    pub members: Vec<String>,
}

/// The full set of loci parsed from a `.loci` file, keyed by locus id.
#[derive(Debug, Default)]
pub struct LociFile {
    loci: HashMap<String, Locus>,
}

impl LociFile {
    /// Parse a `.loci` stream, building a consensus per locus.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, LociError> {
        let mut loci = HashMap::new();
        let mut sequences: Vec<String> = Vec::new();
        let mut members: Vec<String> = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end();
            let line_no = idx + 1;

            if line.starts_with("//") {
                let (_, locus_id) = line
                    .split_once('|')
                    .ok_or(LociError::MissingLocusId { line: line_no })?;

                let cons =
                    consensus(&sequences).map_err(|source| LociError::Consensus {
                        locus: locus_id.to_string(),
                        source,
                    })?;
                loci.insert(
                    locus_id.to_string(),
                    Locus {
                        consensus: cons,
                        members: std::mem::take(&mut members),
                    },
                );
                sequences.clear();
            } else if !line.is_empty() {
                let fields: Vec<&str> = line.split_whitespace().collect();
                let &[id, seq] = fields.as_slice() else {
                    return Err(LociError::MalformedSequenceLine {
                        line: line_no,
                        fields: fields.len(),
                    });
                };
                members.push(id.trim_start_matches('>').to_string());
                sequences.push(seq.to_string());
            }
        }

        // A partial trailing block (no terminator) is dropped.
        if !sequences.is_empty() {
            debug!(pending = sequences.len(), "dropping unterminated trailing locus");
        }

        debug!(loci = loci.len(), "parsed loci file");
        Ok(Self { loci })
    }

    /// Look up a locus by id.
    pub fn get(&self, id: &str) -> Option<&Locus> {
        self.loci.get(id)
    }

    /// Number of loci parsed.
    pub fn len(&self) -> usize {
        self.loci.len()
    }

    /// Whether no loci were parsed.
    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }
}

/// Convert a `.loci` stream to FASTA, emitting the first read of each locus.
///
/// Loci are emitted in file order. Sample ids are written with a single `>`
/// prefix regardless of whether the input carried one.
pub fn loci_to_fasta<R: BufRead, W: Write>(reader: R, writer: &mut W) -> Result<(), LociError> {
    let mut first: Option<(String, String)> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end();
        let line_no = idx + 1;

        if line.starts_with("//") {
            if let Some((id, seq)) = first.take() {
                writeln!(writer, ">{id}\n{seq}")?;
            }
        } else if !line.is_empty() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let &[id, seq] = fields.as_slice() else {
                return Err(LociError::MalformedSequenceLine {
                    line: line_no,
                    fields: fields.len(),
                });
            };
            if first.is_none() {
                first = Some((id.trim_start_matches('>').to_string(), seq.to_string()));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TWO_LOCI: &str = "\
>sampleA    AAAA
>sampleB    AAAT
>sampleC    AATT
//          *   |1
>sampleA    GGGG
>sampleD    GGGC
//          -   |2
";

    #[test]
    fn parses_two_loci_with_members_and_consensus() {
        let loci = LociFile::parse(Cursor::new(TWO_LOCI)).unwrap();
        assert_eq!(loci.len(), 2);

        let first = loci.get("1").unwrap();
        assert_eq!(first.consensus, "AAAT");
        assert_eq!(first.members, vec!["sampleA", "sampleB", "sampleC"]);

        let second = loci.get("2").unwrap();
        assert_eq!(second.consensus, "GGGG");
        assert_eq!(second.members, vec!["sampleA", "sampleD"]);
        assert_eq!(second.consensus.len(), 4);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let input = ">a AC\n\n>b AC\n//|x\n";
        let loci = LociFile::parse(Cursor::new(input)).unwrap();
        assert_eq!(loci.get("x").unwrap().members, vec!["a", "b"]);
    }

    #[test]
    fn trailing_unterminated_locus_is_dropped() {
        let input = ">a AC\n//|x\n>b GT\n>c GT\n";
        let loci = LociFile::parse(Cursor::new(input)).unwrap();
        assert_eq!(loci.len(), 1);
        assert!(loci.get("x").is_some());
    }

    #[test]
    fn terminator_without_separator_is_an_error() {
        let input = ">a AC\n//----\n";
        let err = LociFile::parse(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, LociError::MissingLocusId { line: 2 }));
    }

    #[test]
    fn sequence_line_with_one_field_is_an_error() {
        let input = "loneid\n";
        let err = LociFile::parse(Cursor::new(input)).unwrap_err();
        assert!(matches!(
            err,
            LociError::MalformedSequenceLine { line: 1, fields: 1 }
        ));
    }

    #[test]
    fn sequence_line_with_extra_fields_is_an_error() {
        let input = ">a AC extra\n//|x\n";
        let err = LociFile::parse(Cursor::new(input)).unwrap_err();
        assert!(matches!(
            err,
            LociError::MalformedSequenceLine { line: 1, fields: 3 }
        ));
    }

    #[test]
    fn length_mismatch_names_the_locus() {
        let input = ">a ACGT\n>b AC\n//|7\n";
        let err = LociFile::parse(Cursor::new(input)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("locus '7'"), "unexpected message: {msg}");
    }

    #[test]
    fn fasta_conversion_takes_first_read_per_locus() {
        let mut out = Vec::new();
        loci_to_fasta(Cursor::new(TWO_LOCI), &mut out).unwrap();
        let fasta = String::from_utf8(out).unwrap();
        assert_eq!(fasta, ">sampleA\nAAAA\n>sampleA\nGGGG\n");
    }

    #[test]
    fn fasta_conversion_reports_field_count_of_malformed_lines() {
        // Malformed later reads fail too, matching the parser's tolerance.
        let input = ">a AC\n>b AC extra\n//|x\n";
        let mut out = Vec::new();
        let err = loci_to_fasta(Cursor::new(input), &mut out).unwrap_err();
        assert!(matches!(
            err,
            LociError::MalformedSequenceLine { line: 2, fields: 3 }
        ));
    }
}
