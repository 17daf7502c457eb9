use analysis_core::{
    AnalysisError, AnalysisRequest, AnalysisWindows, CompanyProfile, FundamentalEvaluator,
    FundamentalSnapshot, Ledger, PriceSeries, ScoringConfig, TechnicalEvaluator,
};
use chrono::{DateTime, Utc};
use fundamental_analysis::FundamentalAnalysisEngine;
use serde::Serialize;
use technical_analysis::{ChartData, TechnicalAnalysisEngine};

pub mod scoring;
pub use scoring::{normalize, BucketScore, ScoreAggregator, ScoreReport};


/// Everything the host needs to display one analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub profile: Option<CompanyProfile>,
    pub generated_at: DateTime<Utc>,
    pub windows: AnalysisWindows,
    pub score: ScoreReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charts: Option<ChartData>,
}

/// Runs the single-pass pipeline: evaluate eight metrics in order, then aggregate.
pub struct AnalysisOrchestrator {
    config: ScoringConfig,
    fundamental_analyzer: FundamentalAnalysisEngine,
    technical_analyzer: TechnicalAnalysisEngine,
    aggregator: ScoreAggregator,
    include_charts: bool,
}

impl AnalysisOrchestrator {
    pub fn new(config: ScoringConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ScoringConfig) -> Self {
        Self {
            fundamental_analyzer: FundamentalAnalysisEngine::new(config.weights, config.thresholds),
            technical_analyzer: TechnicalAnalysisEngine::new(
                config.weights,
                config.thresholds,
                config.windows.clone(),
            ),
            aggregator: ScoreAggregator::new(config.weights),
            include_charts: false,
            config,
        }
    }

    /// Attach indicator series for charting to each report
    pub fn with_charts(mut self, enabled: bool) -> Self {
        self.include_charts = enabled;
        self
    }

    /// Score one ticker. Missing fields or series degrade single metrics; the
    /// pass itself only fails on an internal ordering error.
    pub fn score(
        &self,
        fundamentals: &FundamentalSnapshot,
        long: Option<&PriceSeries>,
        short: Option<&PriceSeries>,
    ) -> Result<ScoreReport, AnalysisError> {
        let mut ledger = Ledger::new();
        self.fundamental_analyzer.evaluate(fundamentals, &mut ledger)?;
        self.technical_analyzer.evaluate(long, short, &mut ledger)?;

        let degraded = ledger.iter().filter(|e| !e.is_available()).count();
        if degraded > 0 {
            tracing::debug!("{} of {} metrics unavailable", degraded, ledger.len());
        }

        self.aggregator.aggregate(ledger)
    }

    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
        let symbol = request.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(AnalysisError::InvalidInput("symbol is empty".to_string()));
        }

        tracing::info!(
            "Starting analysis for {} (long bars: {}, short bars: {}, fundamentals reported: {})",
            symbol,
            request.long_series.as_ref().map_or(0, PriceSeries::len),
            request.short_series.as_ref().map_or(0, PriceSeries::len),
            request.fundamentals.reported_count()
        );

        let long = request.long_series.as_ref();
        let short = request.short_series.as_ref();
        if long.is_none() {
            tracing::warn!("No long-window price history for {}", symbol);
        }
        if short.is_none() {
            tracing::warn!("No short-window price history for {}", symbol);
        }

        let score = self.score(&request.fundamentals, long, short)?;

        tracing::info!(
            "Analysis for {}: long-term {}% ({}), short-term {}% ({})",
            symbol,
            score.long_term_percent(),
            score.long_term_label(),
            score.short_term_percent(),
            score.short_term_label()
        );

        let charts = self
            .include_charts
            .then(|| ChartData::build(long, short, &self.config.thresholds));

        Ok(AnalysisReport {
            symbol,
            profile: request.profile.clone(),
            generated_at: Utc::now(),
            windows: self.config.windows.clone(),
            score,
            charts,
        })
    }
}

impl Default for AnalysisOrchestrator {
    fn default() -> Self {
        Self::build(ScoringConfig::default())
    }
}
