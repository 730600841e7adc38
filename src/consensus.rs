//! Majority-vote consensus calling over aligned sequences.
//!
//! Each locus in a pyRAD `.loci` file carries a set of equal-length aligned
//! sequences. The consensus picks, per alignment column, the most frequent
//! base across all sequences. Gap (`-`) and unknown (`N`) symbols are tallied
//! but can never win a column; a column with no eligible base becomes `N`.

use thiserror::Error;

/// Gap symbol in aligned sequences.
pub const GAP: u8 = b'-';
/// Unknown-base symbol; also the fallback for all-gap columns.
pub const UNKNOWN: u8 = b'N';

/// Errors produced while building a consensus sequence.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConsensusError {
    /// Sequences within a locus must all share the alignment length.
    #[error("sequence {index} has length {found}, expected {expected}")]
    LengthMismatch {
        /// Index of the offending sequence within the locus.
        index: usize,
        /// Length of the first sequence, which sets the alignment width.
        expected: usize,
        /// Length actually observed.
        found: usize,
    },
}

/// Build the majority-vote consensus of a set of aligned sequences.
///
/// Ties between equally-frequent eligible bases are broken by taking the
/// lexicographically smallest base, so the result is deterministic and
/// independent of input order.
///
/// An empty input yields an empty consensus.
pub fn consensus<S: AsRef<str>>(sequences: &[S]) -> Result<String, ConsensusError> {
    let Some(first) = sequences.first() else {
        return Ok(String::new());
    };
    let width = first.as_ref().len();

    for (index, seq) in sequences.iter().enumerate() {
        let found = seq.as_ref().len();
        if found != width {
            return Err(ConsensusError::LengthMismatch {
                index,
                expected: width,
                found,
            });
        }
    }

    let mut result = Vec::with_capacity(width);
    for col in 0..width {
        let mut counts = [0u32; 256];
        for seq in sequences {
            counts[seq.as_ref().as_bytes()[col] as usize] += 1;
        }
        result.push(column_winner(&counts));
    }

    // Inputs are ASCII sequence data; the winner bytes are drawn from them.
    Ok(String::from_utf8(result).expect("consensus bases are ASCII"))
}

/// Pick the winning base for one alignment column from its tally.
///
/// Iterating byte values in ascending order makes the tie-break
/// lexicographic: the first base reaching the maximum count wins.
fn column_winner(counts: &[u32; 256]) -> u8 {
    let mut best = (UNKNOWN, 0u32);
    for (byte, &count) in counts.iter().enumerate() {
        let byte = byte as u8;
        if byte == GAP || byte == UNKNOWN {
            continue;
        }
        if count > best.1 {
            best = (byte, count);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn single_sequence_is_its_own_consensus() {
        let cons = consensus(&["ACGTACGT"]).unwrap();
        assert_eq!(cons, "ACGTACGT");
    }

    #[test]
    fn majority_wins_per_column() {
        let cons = consensus(&["AAAA", "AAAT", "AATT"]).unwrap();
        assert_eq!(cons, "AAAT");
    }

    #[test]
    fn gap_and_unknown_are_counted_but_cannot_win() {
        // Column 0: two gaps vs one C -> C wins despite being the minority.
        let cons = consensus(&["-A", "-A", "CA"]).unwrap();
        assert_eq!(cons, "CA");

        let cons = consensus(&["NG", "NG", "TG"]).unwrap();
        assert_eq!(cons, "TG");
    }

    #[test]
    fn all_gap_column_yields_unknown() {
        let cons = consensus(&["-N-", "N--", "--N"]).unwrap();
        assert_eq!(cons, "NNN");
    }

    #[test]
    fn tie_break_is_lexicographic() {
        // Columns tied 1-1 between two bases: smaller base wins.
        let cons = consensus(&["AT", "TA"]).unwrap();
        assert_eq!(cons, "AA");

        let cons = consensus(&["GC", "CG"]).unwrap();
        assert_eq!(cons, "CC");
    }

    #[test]
    fn empty_input_yields_empty_consensus() {
        let empty: [&str; 0] = [];
        assert_eq!(consensus(&empty).unwrap(), "");
    }

    #[test]
    fn zero_length_sequences_yield_empty_consensus() {
        assert_eq!(consensus(&["", "", ""]).unwrap(), "");
    }

    #[test]
    fn unequal_lengths_are_rejected() {
        let err = consensus(&["ACGT", "ACG"]).unwrap_err();
        assert_eq!(
            err,
            ConsensusError::LengthMismatch {
                index: 1,
                expected: 4,
                found: 3,
            }
        );
    }

    #[test_case(&["ACGT"], "ACGT"; "identity")]
    #[test_case(&["AAAA", "AAAT", "AATT"], "AAAT"; "simple majority")]
    #[test_case(&["A-GT", "A-GT", "ACGT"], "ACGT"; "gap minority loses")]
    fn consensus_cases(sequences: &[&str], expected: &str) {
        assert_eq!(consensus(sequences).unwrap(), expected);
    }
}
