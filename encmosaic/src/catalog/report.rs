//! Batch load policy and outcome.

use std::fmt;
use std::str::FromStr;

/// What a batch load does when one chart fails to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Log the failure at warn level and continue with the next chart.
    #[default]
    Skip,
    /// Stop the batch and return the failure.
    Abort,
}

impl FromStr for LoadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(LoadPolicy::Skip),
            "abort" => Ok(LoadPolicy::Abort),
            other => Err(format!("expected 'skip' or 'abort', got '{}'", other)),
        }
    }
}

impl fmt::Display for LoadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadPolicy::Skip => write!(f, "skip"),
            LoadPolicy::Abort => write!(f, "abort"),
        }
    }
}

/// Where a chart's metadata came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Cache,
    Disk,
}

/// Totals of a batch load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Charts now in the catalog from this batch
    pub loaded: usize,
    /// Of those, honored from the metadata cache
    pub from_cache: usize,
    /// Of those, parsed from the chart file
    pub parsed: usize,
    /// Charts skipped after a load failure
    pub failed: usize,
}

impl LoadReport {
    pub(crate) fn record(&mut self, source: LoadSource) {
        self.loaded += 1;
        match source {
            LoadSource::Cache => self.from_cache += 1,
            LoadSource::Disk => self.parsed += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse() {
        assert_eq!("skip".parse::<LoadPolicy>().unwrap(), LoadPolicy::Skip);
        assert_eq!(" ABORT ".parse::<LoadPolicy>().unwrap(), LoadPolicy::Abort);
        assert!("retry".parse::<LoadPolicy>().is_err());
        assert_eq!(LoadPolicy::default(), LoadPolicy::Skip);
    }

    #[test]
    fn test_report_record() {
        let mut report = LoadReport::default();
        report.record(LoadSource::Cache);
        report.record(LoadSource::Disk);
        report.record(LoadSource::Disk);
        assert_eq!(report.loaded, 3);
        assert_eq!(report.from_cache, 1);
        assert_eq!(report.parsed, 2);
    }
}
