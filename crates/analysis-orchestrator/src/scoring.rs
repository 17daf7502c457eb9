use analysis_core::{AnalysisError, Bucket, Ledger, Recommendation, ScoreWeights};
use serde::Serialize;

/// Normalized result for one bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BucketScore {
    pub bucket: Bucket,
    pub raw: u32,
    pub max: u32,
    /// floor(100 * raw / max), within 0..=100
    pub percent: u32,
    pub recommendation: Recommendation,
}

/// Ledger plus the two bucket scores derived from it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub ledger: Ledger,
    pub long_term: BucketScore,
    pub short_term: BucketScore,
}

impl ScoreReport {
    pub fn long_term_percent(&self) -> u32 {
        self.long_term.percent
    }

    pub fn short_term_percent(&self) -> u32 {
        self.short_term.percent
    }

    pub fn long_term_label(&self) -> &'static str {
        self.long_term.recommendation.to_label()
    }

    pub fn short_term_label(&self) -> &'static str {
        self.short_term.recommendation.to_label()
    }
}

/// Truncating percentage. A zero maximum scores zero.
pub fn normalize(raw: u32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    (raw.saturating_mul(100) / max).min(100)
}

/// Reduces a complete ledger into long-term and short-term scores
#[derive(Debug, Clone, Default)]
pub struct ScoreAggregator {
    weights: ScoreWeights,
}

impl ScoreAggregator {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn score_bucket(&self, ledger: &Ledger, bucket: Bucket) -> BucketScore {
        let raw = ledger.points_in(bucket);
        let max = self.weights.bucket_max(bucket);
        let percent = normalize(raw, max);
        BucketScore {
            bucket,
            raw,
            max,
            percent,
            recommendation: Recommendation::from_percent(percent),
        }
    }

    pub fn aggregate(&self, ledger: Ledger) -> Result<ScoreReport, AnalysisError> {
        if let Some(missing) = ledger.next_expected() {
            return Err(AnalysisError::InvalidInput(format!(
                "cannot aggregate an incomplete ledger, {} not evaluated",
                missing
            )));
        }

        let long_term = self.score_bucket(&ledger, Bucket::LongTerm);
        let short_term = self.score_bucket(&ledger, Bucket::ShortTerm);
        Ok(ScoreReport {
            ledger,
            long_term,
            short_term,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{MetricCategory, MetricId, MetricResult};

    fn ledger_with(passing: &[MetricId]) -> Ledger {
        let weights = ScoreWeights::default();
        let mut ledger = Ledger::new();
        for metric in MetricId::ALL {
            ledger
                .record(MetricResult::scored(
                    metric,
                    MetricCategory::Fundamental,
                    "x".into(),
                    None,
                    "-".into(),
                    passing.contains(&metric),
                    weights.weight(metric),
                ))
                .unwrap();
        }
        ledger
    }

    #[test]
    fn test_normalize_truncates() {
        assert_eq!(normalize(70, 70), 100);
        assert_eq!(normalize(0, 70), 0);
        // 100 * 55 / 70 = 78.57
        assert_eq!(normalize(55, 70), 78);
        // 100 * 15 / 70 = 21.43
        assert_eq!(normalize(15, 70), 21);
        assert_eq!(normalize(15, 30), 50);
        assert_eq!(normalize(5, 0), 0);
        assert_eq!(normalize(80, 70), 100);
    }

    #[test]
    fn test_percent_matches_floor_formula_for_every_subset() {
        let aggregator = ScoreAggregator::default();
        let long_metrics: Vec<MetricId> = Bucket::LongTerm.metrics().collect();

        for mask in 0u32..(1 << long_metrics.len()) {
            let passing: Vec<MetricId> = long_metrics
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, m)| *m)
                .collect();
            let ledger = ledger_with(&passing);
            let score = aggregator.score_bucket(&ledger, Bucket::LongTerm);

            let raw: u32 = passing.iter().map(|m| ScoreWeights::default().weight(*m)).sum();
            assert_eq!(score.raw, raw);
            assert_eq!(score.percent, (100.0 * raw as f64 / 70.0).floor() as u32);
            assert!(score.percent <= 100);
        }
    }

    #[test]
    fn test_buckets_are_independent() {
        let ledger = ledger_with(&[MetricId::Rsi, MetricId::Macd]);
        let report = ScoreAggregator::default().aggregate(ledger).unwrap();

        assert_eq!(report.long_term_percent(), 0);
        assert_eq!(report.long_term_label(), "Sell");
        assert_eq!(report.short_term_percent(), 100);
        assert_eq!(report.short_term_label(), "Strong Buy");
    }

    #[test]
    fn test_short_term_half_is_hold() {
        let ledger = ledger_with(&[MetricId::Macd]);
        let report = ScoreAggregator::default().aggregate(ledger).unwrap();
        assert_eq!(report.short_term.raw, 15);
        assert_eq!(report.short_term_percent(), 50);
        assert_eq!(report.short_term_label(), "Hold");
    }

    #[test]
    fn test_long_term_label_thresholds() {
        // 55 / 70 = 78% -> Strong Buy
        let ledger = ledger_with(&[
            MetricId::PeRatio,
            MetricId::Eps,
            MetricId::Roe,
            MetricId::RevenueGrowth,
            MetricId::DebtToEquity,
        ]);
        let report = ScoreAggregator::default().aggregate(ledger).unwrap();
        assert_eq!(report.long_term_percent(), 78);
        assert_eq!(report.long_term.recommendation, Recommendation::StrongBuy);

        // 35 / 70 = 50% -> Hold
        let ledger = ledger_with(&[MetricId::PeRatio, MetricId::Eps, MetricId::Roe]);
        let report = ScoreAggregator::default().aggregate(ledger).unwrap();
        assert_eq!(report.long_term_percent(), 50);
        assert_eq!(report.long_term.recommendation, Recommendation::Hold);

        // 30 / 70 = 42% -> Sell
        let ledger = ledger_with(&[MetricId::PeRatio, MetricId::GoldenCross]);
        let report = ScoreAggregator::default().aggregate(ledger).unwrap();
        assert_eq!(report.long_term_percent(), 42);
        assert_eq!(report.long_term.recommendation, Recommendation::Sell);
    }

    #[test]
    fn test_alternate_weight_scheme() {
        let weights = ScoreWeights {
            rsi: 10,
            macd: 30,
            ..ScoreWeights::default()
        };
        let mut ledger = Ledger::new();
        for metric in MetricId::ALL {
            ledger
                .record(MetricResult::scored(
                    metric,
                    MetricCategory::Fundamental,
                    "x".into(),
                    None,
                    "-".into(),
                    metric == MetricId::Macd,
                    weights.weight(metric),
                ))
                .unwrap();
        }
        let report = ScoreAggregator::new(weights).aggregate(ledger).unwrap();
        assert_eq!(report.short_term.max, 40);
        assert_eq!(report.short_term_percent(), 75);
        assert_eq!(report.short_term_label(), "Strong Buy");
    }

    #[test]
    fn test_incomplete_ledger_rejected() {
        let err = ScoreAggregator::default().aggregate(Ledger::new()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }
}
