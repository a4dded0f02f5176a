//! Aggregate counts over a run.

use serde::Serialize;

use super::classify::TallyBucket;
use super::runner::ProbeResult;

/// Coarse tally: detailed error labels collapse into `other`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub active: usize,
    pub quota_exceeded: usize,
    pub other: usize,
}

impl RunSummary {
    /// Fold the summary from an ordered result sequence.
    pub fn from_results(results: &[ProbeResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            acc.record(r.status.bucket());
            acc
        })
    }

    fn record(&mut self, bucket: TallyBucket) {
        self.total += 1;
        match bucket {
            TallyBucket::Active => self.active += 1,
            TallyBucket::QuotaExceeded => self.quota_exceeded += 1,
            TallyBucket::Other => self.other += 1,
        }
    }
}
