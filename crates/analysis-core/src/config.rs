use serde::{Deserialize, Serialize};

use crate::{AnalysisError, Bucket, MetricId};

/// Points awarded per metric on pass. Bucket maxima are the sums of their members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub pe_ratio: u32,
    pub eps: u32,
    pub roe: u32,
    pub revenue_growth: u32,
    pub debt_to_equity: u32,
    pub golden_cross: u32,
    pub rsi: u32,
    pub macd: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            pe_ratio: 15,
            eps: 10,
            roe: 10,
            revenue_growth: 10,
            debt_to_equity: 10,
            golden_cross: 15,
            rsi: 15,
            macd: 15,
        }
    }
}

impl ScoreWeights {
    pub fn weight(&self, metric: MetricId) -> u32 {
        match metric {
            MetricId::PeRatio => self.pe_ratio,
            MetricId::Eps => self.eps,
            MetricId::Roe => self.roe,
            MetricId::RevenueGrowth => self.revenue_growth,
            MetricId::DebtToEquity => self.debt_to_equity,
            MetricId::GoldenCross => self.golden_cross,
            MetricId::Rsi => self.rsi,
            MetricId::Macd => self.macd,
        }
    }

    /// Maximum attainable points for a bucket
    pub fn bucket_max(&self, bucket: Bucket) -> u32 {
        bucket.metrics().map(|m| self.weight(m)).sum()
    }
}

/// Pass/fail cut-offs and indicator periods
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricThresholds {
    /// P/E must be below this
    pub pe_max: f64,
    /// EPS must be above this
    pub eps_min: f64,
    /// ROE fraction must be above this
    pub roe_min: f64,
    /// Revenue growth fraction must be above this
    pub revenue_growth_min: f64,
    /// Debt-to-equity must be below this
    pub debt_to_equity_max: f64,
    pub fast_ma_period: usize,
    pub slow_ma_period: usize,
    pub rsi_period: usize,
    pub rsi_lower: f64,
    pub rsi_upper: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for MetricThresholds {
    fn default() -> Self {
        Self {
            pe_max: 25.0,
            eps_min: 0.0,
            roe_min: 0.15,
            revenue_growth_min: 0.10,
            debt_to_equity_max: 1.0,
            fast_ma_period: 50,
            slow_ma_period: 200,
            rsi_period: 14,
            rsi_lower: 30.0,
            rsi_upper: 70.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

impl MetricThresholds {
    /// Threshold text shown next to each metric, e.g. "<25" or ">15%"
    pub fn describe(&self, metric: MetricId) -> String {
        match metric {
            MetricId::PeRatio => format!("<{}", trim_number(self.pe_max)),
            MetricId::Eps => format!(">{}", trim_number(self.eps_min)),
            MetricId::Roe => format!(">{}%", trim_number(self.roe_min * 100.0)),
            MetricId::RevenueGrowth => format!(">{}%", trim_number(self.revenue_growth_min * 100.0)),
            MetricId::DebtToEquity => format!("<{}", trim_number(self.debt_to_equity_max)),
            MetricId::GoldenCross => "Yes".to_string(),
            MetricId::Rsi => format!(
                "{}-{}",
                trim_number(self.rsi_lower),
                trim_number(self.rsi_upper)
            ),
            MetricId::Macd => "Bullish".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.fast_ma_period == 0 || self.slow_ma_period == 0 {
            return Err(AnalysisError::Config("moving average periods must be positive".into()));
        }
        if self.fast_ma_period >= self.slow_ma_period {
            return Err(AnalysisError::Config(format!(
                "fast MA period ({}) must be shorter than slow MA period ({})",
                self.fast_ma_period, self.slow_ma_period
            )));
        }
        if self.rsi_period == 0 {
            return Err(AnalysisError::Config("RSI period must be positive".into()));
        }
        if self.rsi_lower >= self.rsi_upper {
            return Err(AnalysisError::Config(format!(
                "RSI band {}-{} is empty",
                self.rsi_lower, self.rsi_upper
            )));
        }
        if self.macd_fast == 0 || self.macd_slow == 0 || self.macd_signal == 0 {
            return Err(AnalysisError::Config("MACD spans must be positive".into()));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(AnalysisError::Config(format!(
                "MACD fast span ({}) must be shorter than slow span ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        Ok(())
    }
}

/// Labels for the two lookback spans, shown in ledger categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisWindows {
    pub long: String,
    pub short: String,
}

impl Default for AnalysisWindows {
    fn default() -> Self {
        Self {
            long: "3y".to_string(),
            short: "3mo".to_string(),
        }
    }
}

/// Everything that parameterizes one scoring run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    pub thresholds: MetricThresholds,
    pub windows: AnalysisWindows,
}

impl ScoringConfig {
    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        let config: ScoringConfig = serde_json::from_str(json)
            .map_err(|e| AnalysisError::Config(format!("failed to parse scoring config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.thresholds.validate()
    }
}

fn trim_number(value: f64) -> String {
    // 0.15 * 100.0 is 15.000000000000002
    let rounded = (value * 1e6).round() / 1e6;
    format!("{}", rounded)
}
