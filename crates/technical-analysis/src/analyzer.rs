use analysis_core::{
    AnalysisError, AnalysisWindows, Ledger, MetricCategory, MetricId, MetricResult,
    MetricThresholds, PriceSeries, ScoreWeights, TechnicalEvaluator,
};

use crate::indicators::*;

/// Latest fast and slow moving averages of the long window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingAverageCross {
    pub fast: f64,
    pub slow: f64,
}

impl MovingAverageCross {
    pub fn is_golden(&self) -> bool {
        self.fast > self.slow
    }
}

/// Latest MACD and signal line values of the short window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdReading {
    pub macd: f64,
    pub signal: f64,
}

impl MacdReading {
    pub fn is_bullish(&self) -> bool {
        self.macd > self.signal
    }

    pub fn histogram(&self) -> f64 {
        self.macd - self.signal
    }
}

/// Scores Golden Cross on the long window and RSI/MACD on the short window
#[derive(Debug, Clone, Default)]
pub struct TechnicalAnalysisEngine {
    weights: ScoreWeights,
    thresholds: MetricThresholds,
    windows: AnalysisWindows,
}

impl TechnicalAnalysisEngine {
    pub fn new(weights: ScoreWeights, thresholds: MetricThresholds, windows: AnalysisWindows) -> Self {
        Self {
            weights,
            thresholds,
            windows,
        }
    }

    /// Requires strictly more bars than the slow period.
    pub fn moving_average_cross(&self, long: &PriceSeries) -> Result<MovingAverageCross, AnalysisError> {
        let slow_period = self.thresholds.slow_ma_period;
        if long.len() <= slow_period {
            return Err(AnalysisError::InsufficientHistory(format!(
                "MA cross needs more than {} bars, got {}",
                slow_period,
                long.len()
            )));
        }

        let closes = long.closes();
        let fast = sma(&closes, self.thresholds.fast_ma_period).last().copied().flatten();
        let slow = sma(&closes, slow_period).last().copied().flatten();
        match (fast, slow) {
            (Some(fast), Some(slow)) => Ok(MovingAverageCross { fast, slow }),
            _ => Err(AnalysisError::MissingData("moving averages undefined".to_string())),
        }
    }

    /// Most recent defined RSI of the short window
    pub fn latest_rsi(&self, short: &PriceSeries) -> Result<f64, AnalysisError> {
        let period = self.thresholds.rsi_period;
        if short.len() <= period {
            return Err(AnalysisError::InsufficientHistory(format!(
                "RSI({}) needs at least {} bars, got {}",
                period,
                period + 1,
                short.len()
            )));
        }

        last_defined(&rsi(&short.closes(), period)).ok_or_else(|| {
            AnalysisError::MissingData(format!("RSI({}) undefined for a flat series", period))
        })
    }

    pub fn latest_macd(&self, short: &PriceSeries) -> Result<MacdReading, AnalysisError> {
        let t = &self.thresholds;
        if short.len() < t.macd_slow {
            return Err(AnalysisError::InsufficientHistory(format!(
                "MACD needs at least {} bars, got {}",
                t.macd_slow,
                short.len()
            )));
        }

        let result = macd_with(&short.closes(), t.macd_fast, t.macd_slow, t.macd_signal);
        match (result.macd_line.last(), result.signal_line.last()) {
            (Some(&macd), Some(&signal)) => Ok(MacdReading { macd, signal }),
            _ => Err(AnalysisError::MissingData("MACD lines are empty".to_string())),
        }
    }

    pub fn evaluate_golden_cross(&self, long: Option<&PriceSeries>) -> Result<MetricResult, AnalysisError> {
        let metric = MetricId::GoldenCross;
        let category = MetricCategory::Price(self.windows.long.clone());
        let threshold = self.thresholds.describe(metric);

        let Some(long) = long else {
            tracing::debug!("{}: no long-window price history", metric);
            return Ok(MetricResult::not_available(metric, category, threshold));
        };

        let (golden, spread) = match self.moving_average_cross(long) {
            Ok(cross) => (cross.is_golden(), Some(cross.fast - cross.slow)),
            // Short history is a "No", not an unknown
            Err(e) if e.is_degradation() => {
                tracing::debug!("{}: {}", metric, e);
                (false, None)
            }
            Err(e) => return Err(e),
        };

        Ok(MetricResult::scored(
            metric,
            category,
            yes_no(golden).to_string(),
            spread,
            threshold,
            golden,
            self.weights.weight(metric),
        ))
    }

    pub fn evaluate_rsi(&self, short: Option<&PriceSeries>) -> Result<MetricResult, AnalysisError> {
        let metric = MetricId::Rsi;
        let category = MetricCategory::Price(self.windows.short.clone());
        let threshold = self.thresholds.describe(metric);

        let reading = match short {
            Some(series) => self.latest_rsi(series),
            None => Err(AnalysisError::MissingData("no short-window price history".to_string())),
        };

        match reading {
            Ok(value) => {
                let passed = value > self.thresholds.rsi_lower && value < self.thresholds.rsi_upper;
                Ok(MetricResult::scored(
                    metric,
                    category,
                    format!("{:.2}", value),
                    Some(value),
                    threshold,
                    passed,
                    self.weights.weight(metric),
                ))
            }
            Err(e) => degrade(metric, category, threshold, e),
        }
    }

    pub fn evaluate_macd(&self, short: Option<&PriceSeries>) -> Result<MetricResult, AnalysisError> {
        let metric = MetricId::Macd;
        let category = MetricCategory::Price(self.windows.short.clone());
        let threshold = self.thresholds.describe(metric);

        let reading = match short {
            Some(series) => self.latest_macd(series),
            None => Err(AnalysisError::MissingData("no short-window price history".to_string())),
        };

        match reading {
            Ok(reading) => {
                let bullish = reading.is_bullish();
                Ok(MetricResult::scored(
                    metric,
                    category,
                    if bullish { "Bullish" } else { "Bearish" }.to_string(),
                    Some(reading.histogram()),
                    threshold,
                    bullish,
                    self.weights.weight(metric),
                ))
            }
            Err(e) => degrade(metric, category, threshold, e),
        }
    }
}

impl TechnicalEvaluator for TechnicalAnalysisEngine {
    fn evaluate(
        &self,
        long: Option<&PriceSeries>,
        short: Option<&PriceSeries>,
        ledger: &mut Ledger,
    ) -> Result<(), AnalysisError> {
        ledger.record(self.evaluate_golden_cross(long)?)?;
        ledger.record(self.evaluate_rsi(short)?)?;
        ledger.record(self.evaluate_macd(short)?)?;
        Ok(())
    }
}

/// Missing or short data becomes a 0-point "N/A" entry; anything else is a real error.
fn degrade(
    metric: MetricId,
    category: MetricCategory,
    threshold: String,
    err: AnalysisError,
) -> Result<MetricResult, AnalysisError> {
    if !err.is_degradation() {
        return Err(err);
    }
    tracing::debug!("{}: {}", metric, err);
    Ok(MetricResult::not_available(metric, category, threshold))
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
