use analysis_core::{
    AnalysisError, FundamentalEvaluator, FundamentalSnapshot, Ledger, MetricCategory, MetricId,
    MetricResult, MetricThresholds, ScoreWeights,
};

/// Scores P/E, EPS, ROE, revenue growth and debt-to-equity against fixed cut-offs
#[derive(Debug, Clone, Default)]
pub struct FundamentalAnalysisEngine {
    weights: ScoreWeights,
    thresholds: MetricThresholds,
}

impl FundamentalAnalysisEngine {
    pub fn new(weights: ScoreWeights, thresholds: MetricThresholds) -> Self {
        Self { weights, thresholds }
    }

    /// Pass predicate for a present reading
    fn passes(&self, metric: MetricId, value: f64) -> bool {
        let t = &self.thresholds;
        match metric {
            MetricId::PeRatio => value < t.pe_max,
            MetricId::Eps => value > t.eps_min,
            MetricId::Roe => value > t.roe_min,
            MetricId::RevenueGrowth => value > t.revenue_growth_min,
            MetricId::DebtToEquity => value < t.debt_to_equity_max,
            MetricId::GoldenCross | MetricId::Rsi | MetricId::Macd => false,
        }
    }

    /// Evaluate one fundamental metric. Absent readings score zero and show "N/A".
    pub fn evaluate_metric(&self, metric: MetricId, snapshot: &FundamentalSnapshot) -> MetricResult {
        let threshold = self.thresholds.describe(metric);

        match snapshot.value(metric) {
            Some(value) if metric.is_fundamental() => MetricResult::scored(
                metric,
                MetricCategory::Fundamental,
                format_value(metric, value),
                Some(value),
                threshold,
                self.passes(metric, value),
                self.weights.weight(metric),
            ),
            _ => {
                tracing::debug!("{}: not reported", metric);
                MetricResult::not_available(metric, MetricCategory::Fundamental, threshold)
            }
        }
    }
}

impl FundamentalEvaluator for FundamentalAnalysisEngine {
    fn evaluate(&self, snapshot: &FundamentalSnapshot, ledger: &mut Ledger) -> Result<(), AnalysisError> {
        for metric in MetricId::ALL.into_iter().filter(MetricId::is_fundamental) {
            ledger.record(self.evaluate_metric(metric, snapshot))?;
        }
        Ok(())
    }
}

fn format_value(metric: MetricId, value: f64) -> String {
    match metric {
        MetricId::Roe | MetricId::RevenueGrowth => format!("{:.2}%", value * 100.0),
        MetricId::DebtToEquity => format!("{:?}", value),
        _ => format!("{:.2}", value),
    }
}
