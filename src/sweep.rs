//! Parameter sweep value computation for the denovo optimisation jobs.
//!
//! Two sweep shapes exist: an explicit `low-high` range sliced into N
//! evenly-spaced integer samples (first optimisation pass), and a
//! `target ± count` integer window around a chosen centre (refinement pass).

use std::str::FromStr;

use thiserror::Error;

/// Errors produced while parsing or evaluating sweep parameters.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SweepError {
    /// A range string was not of the form `low-high`.
    #[error("invalid range '{0}': expected 'low-high' (e.g. 3-10)")]
    InvalidRange(String),

    /// The low bound exceeded the high bound.
    #[error("invalid range: low {low} exceeds high {high}")]
    Inverted {
        /// Parsed low bound.
        low: i64,
        /// Parsed high bound.
        high: i64,
    },

    /// A sweep must sample at least one value.
    #[error("sample count must be at least 1")]
    ZeroCount,
}

/// An inclusive `low-high` sweep range, parsed from CLI text such as `3-10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepRange {
    /// Inclusive lower bound.
    pub low: i64,
    /// Inclusive upper bound.
    pub high: i64,
}

impl SweepRange {
    /// Slice the range into `count` evenly-spaced integer samples.
    ///
    /// The first sample is `low` and the last is `high`; intermediate
    /// samples are rounded to the nearest integer. `count == 1` yields
    /// just `low`.
    pub fn evenly_spaced(&self, count: usize) -> Result<Vec<i64>, SweepError> {
        if count == 0 {
            return Err(SweepError::ZeroCount);
        }
        if count == 1 {
            return Ok(vec![self.low]);
        }

        let span = (self.high - self.low) as f64;
        let step = span / (count - 1) as f64;
        Ok((0..count)
            .map(|i| self.low + (i as f64 * step).round() as i64)
            .collect())
    }
}

impl FromStr for SweepRange {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (low, high) = s
            .split_once('-')
            .ok_or_else(|| SweepError::InvalidRange(s.to_string()))?;
        let low: i64 = low
            .trim()
            .parse()
            .map_err(|_| SweepError::InvalidRange(s.to_string()))?;
        let high: i64 = high
            .trim()
            .parse()
            .map_err(|_| SweepError::InvalidRange(s.to_string()))?;
        if low > high {
            return Err(SweepError::Inverted { low, high });
        }
        Ok(Self { low, high })
    }
}

/// Integer window `target-count ..= target+count` around a chosen centre.
pub fn centered(target: i64, count: i64) -> Vec<i64> {
    (target - count..=target + count).collect()
}

/// Join sweep values into the space-separated form templates embed.
pub fn join_values(values: &[i64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn parses_range_strings() {
        let range: SweepRange = "3-10".parse().unwrap();
        assert_eq!(range, SweepRange { low: 3, high: 10 });
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert!(matches!(
            "3..10".parse::<SweepRange>(),
            Err(SweepError::InvalidRange(_))
        ));
        assert_eq!(
            "10-3".parse::<SweepRange>(),
            Err(SweepError::Inverted { low: 10, high: 3 })
        );
    }

    #[test_case(3, 10, 3, &[3, 7, 10]; "three samples")]
    #[test_case(5, 20, 4, &[5, 10, 15, 20]; "four samples")]
    #[test_case(3, 10, 1, &[3]; "single sample is low bound")]
    #[test_case(2, 2, 3, &[2, 2, 2]; "degenerate range repeats")]
    fn evenly_spaced_samples(low: i64, high: i64, count: usize, expected: &[i64]) {
        let range = SweepRange { low, high };
        assert_eq!(range.evenly_spaced(count).unwrap(), expected);
    }

    #[test]
    fn zero_count_is_rejected() {
        let range = SweepRange { low: 1, high: 5 };
        assert_eq!(range.evenly_spaced(0), Err(SweepError::ZeroCount));
    }

    #[test]
    fn centered_window_spans_target() {
        assert_eq!(centered(5, 2), vec![3, 4, 5, 6, 7]);
        assert_eq!(centered(5, 0), vec![5]);
    }

    #[test]
    fn values_join_with_spaces() {
        assert_eq!(join_values(&[3, 7, 10]), "3 7 10");
        assert_eq!(join_values(&[]), "");
    }
}
