use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Upper bound for records per group in a bundle job.
pub const MAX_RECORDS_PER_GROUP: u32 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvJobRequest {
    pub range_start: u64,
    pub range_end: u64,
}

impl CsvJobRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.range_start < 1 {
            return Err(ValidationError::RangeStartTooSmall);
        }
        if self.range_start >= self.range_end {
            return Err(ValidationError::RangeNotIncreasing {
                start: self.range_start,
                end: self.range_end,
            });
        }
        Ok(())
    }

    pub fn file_name(&self) -> String {
        format!("pensiones_{}_{}.csv", self.range_start, self.range_end)
    }
}

impl Default for CsvJobRequest {
    fn default() -> Self {
        Self {
            range_start: 1,
            range_end: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleJobRequest {
    pub total_records: u64,
    pub records_per_group: u32,
}

impl BundleJobRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.total_records == 0 || self.records_per_group == 0 {
            return Err(ValidationError::NotPositive);
        }
        if self.records_per_group > MAX_RECORDS_PER_GROUP {
            return Err(ValidationError::GroupTooLarge {
                max: MAX_RECORDS_PER_GROUP,
                actual: self.records_per_group,
            });
        }
        Ok(())
    }

    pub fn file_name(&self) -> String {
        format!("bundle_pensiones_{}_registros.zip", self.total_records)
    }
}

impl Default for BundleJobRequest {
    fn default() -> Self {
        Self {
            total_records: 1000,
            records_per_group: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("range start must be at least 1")]
    RangeStartTooSmall,
    #[error("range start ({start}) must be less than range end ({end})")]
    RangeNotIncreasing { start: u64, end: u64 },
    #[error("values must be greater than 0")]
    NotPositive,
    #[error("records per group must be at most {max} (got {actual})")]
    GroupTooLarge { max: u32, actual: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JobKind {
    Csv,
    Bundle,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Csv => write!(f, "CSV"),
            JobKind::Bundle => write!(f, "ZIP bundle"),
        }
    }
}

/// Remembers where the last artifact of each kind was saved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobTracker {
    last_csv: Option<PathBuf>,
    last_bundle: Option<PathBuf>,
}

impl JobTracker {
    pub fn record_saved(&mut self, kind: JobKind, path: PathBuf) {
        match kind {
            JobKind::Csv => self.last_csv = Some(path),
            JobKind::Bundle => self.last_bundle = Some(path),
        }
    }

    pub fn last_saved(&self, kind: JobKind) -> Option<&PathBuf> {
        match kind {
            JobKind::Csv => self.last_csv.as_ref(),
            JobKind::Bundle => self.last_bundle.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_range_must_increase() {
        let bad = CsvJobRequest {
            range_start: 10,
            range_end: 5,
        };
        assert_eq!(
            bad.validate(),
            Err(ValidationError::RangeNotIncreasing { start: 10, end: 5 })
        );
        let equal = CsvJobRequest {
            range_start: 5,
            range_end: 5,
        };
        assert!(equal.validate().is_err());
        let zero = CsvJobRequest {
            range_start: 0,
            range_end: 5,
        };
        assert_eq!(zero.validate(), Err(ValidationError::RangeStartTooSmall));
        assert!(CsvJobRequest::default().validate().is_ok());
    }

    #[test]
    fn file_names_follow_request_bounds() {
        let csv = CsvJobRequest {
            range_start: 1,
            range_end: 100,
        };
        assert_eq!(csv.file_name(), "pensiones_1_100.csv");
        let bundle = BundleJobRequest {
            total_records: 1000,
            records_per_group: 100,
        };
        assert_eq!(bundle.file_name(), "bundle_pensiones_1000_registros.zip");
    }

    #[test]
    fn bundle_group_bound_is_checked_at_submission() {
        let at_limit = BundleJobRequest {
            total_records: 10,
            records_per_group: MAX_RECORDS_PER_GROUP,
        };
        assert!(at_limit.validate().is_ok());
        let over = BundleJobRequest {
            total_records: 10,
            records_per_group: MAX_RECORDS_PER_GROUP + 1,
        };
        assert_eq!(
            over.validate(),
            Err(ValidationError::GroupTooLarge {
                max: 250,
                actual: 251
            })
        );
        let empty = BundleJobRequest {
            total_records: 0,
            records_per_group: 10,
        };
        assert_eq!(empty.validate(), Err(ValidationError::NotPositive));
    }
}
