use serde::Serialize;

use crate::{AnalysisError, Bucket, MetricId, MetricResult};

/// Append-only record of evaluated metrics in fixed `MetricId::ALL` order.
///
/// The ledger is the only input to aggregation, so the per-bucket totals can
/// never disagree with the rows shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: Vec<MetricResult>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(MetricId::ALL.len()),
        }
    }

    /// Metric the next `record` call must carry, or `None` once complete
    pub fn next_expected(&self) -> Option<MetricId> {
        MetricId::ALL.get(self.entries.len()).copied()
    }

    pub fn record(&mut self, result: MetricResult) -> Result<(), AnalysisError> {
        match self.next_expected() {
            Some(expected) if expected == result.metric => {
                self.entries.push(result);
                Ok(())
            }
            Some(expected) => Err(AnalysisError::InvalidInput(format!(
                "ledger expected {} but received {}",
                expected, result.metric
            ))),
            None => Err(AnalysisError::InvalidInput(format!(
                "ledger is complete, cannot record {}",
                result.metric
            ))),
        }
    }

    pub fn entries(&self) -> &[MetricResult] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetricResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.entries.len() == MetricId::ALL.len()
    }

    pub fn get(&self, metric: MetricId) -> Option<&MetricResult> {
        self.entries.get(metric.position())
    }

    /// Sum of awarded points over a bucket's entries
    pub fn points_in(&self, bucket: Bucket) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.metric.bucket() == bucket)
            .map(|e| e.points)
            .sum()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a MetricResult;
    type IntoIter = std::slice::Iter<'a, MetricResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
