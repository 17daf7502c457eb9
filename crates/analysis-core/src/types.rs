use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AnalysisError;

/// Closing price at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

impl PriceBar {
    pub fn new(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self { timestamp, close }
    }
}

/// Non-empty price history with strictly increasing timestamps and finite closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceBar>", into = "Vec<PriceBar>")]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, AnalysisError> {
        if bars.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "price series is empty".to_string(),
            ));
        }

        if let Some((i, bar)) = bars.iter().enumerate().find(|(_, b)| !b.close.is_finite()) {
            return Err(AnalysisError::InvalidInput(format!(
                "non-finite close {} at index {} ({})",
                bar.close, i, bar.timestamp
            )));
        }

        if let Some(i) = bars.windows(2).position(|w| w[1].timestamp <= w[0].timestamp) {
            return Err(AnalysisError::InvalidInput(format!(
                "timestamps not strictly increasing at index {}: {} follows {}",
                i + 1,
                bars[i + 1].timestamp,
                bars[i].timestamp
            )));
        }

        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; kept for slice-like ergonomics.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }
}

impl TryFrom<Vec<PriceBar>> for PriceSeries {
    type Error = AnalysisError;

    fn try_from(bars: Vec<PriceBar>) -> Result<Self, Self::Error> {
        Self::new(bars)
    }
}

impl From<PriceSeries> for Vec<PriceBar> {
    fn from(series: PriceSeries) -> Self {
        series.bars
    }
}

/// Latest reported fundamentals. `None` means the provider did not report the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalSnapshot {
    #[serde(rename = "trailingPE", default)]
    pub trailing_pe: Option<f64>,
    #[serde(default)]
    pub trailing_eps: Option<f64>,
    /// Fraction, e.g. 0.18 for 18%
    #[serde(default)]
    pub return_on_equity: Option<f64>,
    /// Year-over-year fraction
    #[serde(default)]
    pub revenue_growth: Option<f64>,
    #[serde(default)]
    pub debt_to_equity: Option<f64>,
}

impl FundamentalSnapshot {
    /// Reported value for a fundamental metric. Non-finite readings count as absent;
    /// a reported zero is present.
    pub fn value(&self, metric: MetricId) -> Option<f64> {
        let raw = match metric {
            MetricId::PeRatio => self.trailing_pe,
            MetricId::Eps => self.trailing_eps,
            MetricId::Roe => self.return_on_equity,
            MetricId::RevenueGrowth => self.revenue_growth,
            MetricId::DebtToEquity => self.debt_to_equity,
            MetricId::GoldenCross | MetricId::Rsi | MetricId::Macd => None,
        };
        raw.filter(|v| v.is_finite())
    }

    pub fn reported_count(&self) -> usize {
        MetricId::ALL
            .iter()
            .filter(|m| m.is_fundamental() && self.value(**m).is_some())
            .count()
    }
}

/// Display-only company details from the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    /// Providers send either an integer or a float
    #[serde(default)]
    pub market_cap: Option<f64>,
}

/// Everything the engine needs for one ticker. A missing series means the fetch failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub symbol: String,
    #[serde(default)]
    pub profile: Option<CompanyProfile>,
    #[serde(rename = "info", default)]
    pub fundamentals: FundamentalSnapshot,
    #[serde(rename = "history_long", default)]
    pub long_series: Option<PriceSeries>,
    #[serde(rename = "history_short", default)]
    pub short_series: Option<PriceSeries>,
}

/// The eight scored metrics, in ledger order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricId {
    PeRatio,
    Eps,
    Roe,
    RevenueGrowth,
    DebtToEquity,
    GoldenCross,
    Rsi,
    Macd,
}

impl MetricId {
    pub const ALL: [MetricId; 8] = [
        MetricId::PeRatio,
        MetricId::Eps,
        MetricId::Roe,
        MetricId::RevenueGrowth,
        MetricId::DebtToEquity,
        MetricId::GoldenCross,
        MetricId::Rsi,
        MetricId::Macd,
    ];

    /// Display name used in the contribution table
    pub fn name(&self) -> &'static str {
        match self {
            MetricId::PeRatio => "P/E Ratio",
            MetricId::Eps => "EPS",
            MetricId::Roe => "ROE (%)",
            MetricId::RevenueGrowth => "Revenue Growth (%)",
            MetricId::DebtToEquity => "Debt-to-Equity",
            MetricId::GoldenCross => "Golden Cross",
            MetricId::Rsi => "RSI",
            MetricId::Macd => "MACD",
        }
    }

    pub fn bucket(&self) -> Bucket {
        match self {
            MetricId::Rsi | MetricId::Macd => Bucket::ShortTerm,
            _ => Bucket::LongTerm,
        }
    }

    pub fn is_fundamental(&self) -> bool {
        matches!(
            self,
            MetricId::PeRatio
                | MetricId::Eps
                | MetricId::Roe
                | MetricId::RevenueGrowth
                | MetricId::DebtToEquity
        )
    }

    /// Position in the ledger
    pub fn position(&self) -> usize {
        match self {
            MetricId::PeRatio => 0,
            MetricId::Eps => 1,
            MetricId::Roe => 2,
            MetricId::RevenueGrowth => 3,
            MetricId::DebtToEquity => 4,
            MetricId::GoldenCross => 5,
            MetricId::Rsi => 6,
            MetricId::Macd => 7,
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            MetricId::PeRatio => "Share price divided by earnings per share. Lower (<25) may indicate undervaluation.",
            MetricId::Eps => "Net profit divided by shares outstanding. Positive signals profitability.",
            MetricId::Roe => "Net income relative to shareholder equity. Above 15% shows efficient capital use.",
            MetricId::RevenueGrowth => "Year-over-year sales increase. Above 10% indicates healthy expansion.",
            MetricId::DebtToEquity => "Company debt versus equity. Below 1 means conservative leverage.",
            MetricId::GoldenCross => "50-day moving average above the 200-day moving average, a bullish long-term signal. Uses the long price window.",
            MetricId::Rsi => "Momentum oscillator (0-100). 30-70 is neutral, above 70 overbought, below 30 oversold. Uses the short price window.",
            MetricId::Macd => "Momentum from the difference of 12 and 26 period EMAs. Bullish when MACD is above its 9 period signal line. Uses the short price window.",
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Long-term (fundamentals + MA cross) or short-term (RSI + MACD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    LongTerm,
    ShortTerm,
}

impl Bucket {
    pub fn metrics(&self) -> impl Iterator<Item = MetricId> + '_ {
        MetricId::ALL.into_iter().filter(move |m| m.bucket() == *self)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Bucket::LongTerm => "Long-Term",
            Bucket::ShortTerm => "Short-Term",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "window", rename_all = "snake_case")]
pub enum MetricCategory {
    Fundamental,
    /// Price-derived, tagged with the lookback window label (e.g. "3y")
    Price(String),
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricCategory::Fundamental => f.write_str("Fundamental"),
            MetricCategory::Price(window) => write!(f, "Price ({})", window),
        }
    }
}

/// One evaluated metric, as shown in the contribution table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub metric: MetricId,
    pub name: String,
    pub category: MetricCategory,
    /// Formatted value, or "N/A" when unavailable
    pub value: String,
    pub raw_value: Option<f64>,
    pub threshold: String,
    pub points: u32,
    pub passed: bool,
}

impl MetricResult {
    pub const NOT_AVAILABLE: &'static str = "N/A";

    /// A metric with a usable reading. Points are the full weight on pass, zero otherwise.
    pub fn scored(
        metric: MetricId,
        category: MetricCategory,
        value: String,
        raw_value: Option<f64>,
        threshold: String,
        passed: bool,
        weight: u32,
    ) -> Self {
        Self {
            metric,
            name: metric.name().to_string(),
            category,
            value,
            raw_value,
            threshold,
            points: if passed { weight } else { 0 },
            passed,
        }
    }

    pub fn not_available(metric: MetricId, category: MetricCategory, threshold: String) -> Self {
        Self {
            metric,
            name: metric.name().to_string(),
            category,
            value: Self::NOT_AVAILABLE.to_string(),
            raw_value: None,
            threshold,
            points: 0,
            passed: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.value != Self::NOT_AVAILABLE
    }
}

/// Three-tier recommendation per bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Hold,
    Sell,
}

impl Recommendation {
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            p if p >= 75 => Recommendation::StrongBuy,
            p if p >= 50 => Recommendation::Hold,
            _ => Recommendation::Sell,
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::Hold => "Hold",
            Recommendation::Sell => "Sell",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    #[test]
    fn test_price_series_rejects_empty() {
        let err = PriceSeries::new(vec![]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_price_series_rejects_unordered_and_duplicate_timestamps() {
        let unordered = vec![PriceBar::new(day(2), 10.0), PriceBar::new(day(1), 11.0)];
        assert!(matches!(
            PriceSeries::new(unordered),
            Err(AnalysisError::InvalidInput(_))
        ));

        let duplicate = vec![PriceBar::new(day(1), 10.0), PriceBar::new(day(1), 11.0)];
        assert!(matches!(
            PriceSeries::new(duplicate),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_price_series_rejects_nan_close() {
        let bars = vec![PriceBar::new(day(0), 10.0), PriceBar::new(day(1), f64::NAN)];
        assert!(PriceSeries::new(bars).is_err());
    }

    #[test]
    fn test_price_series_accessors() {
        let series = PriceSeries::new(vec![
            PriceBar::new(day(0), 10.0),
            PriceBar::new(day(1), 11.0),
            PriceBar::new(day(2), 12.5),
        ])
        .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.5]);
        assert_eq!(series.timestamps()[2], day(2));
    }

    #[test]
    fn test_price_series_deserialize_validates() {
        let ok = r#"[{"timestamp":"2024-01-01T00:00:00Z","close":1.0},{"timestamp":"2024-01-02T00:00:00Z","close":2.0}]"#;
        let series: PriceSeries = serde_json::from_str(ok).unwrap();
        assert_eq!(series.len(), 2);

        let bad = r#"[{"timestamp":"2024-01-02T00:00:00Z","close":1.0},{"timestamp":"2024-01-01T00:00:00Z","close":2.0}]"#;
        assert!(serde_json::from_str::<PriceSeries>(bad).is_err());
        assert!(serde_json::from_str::<PriceSeries>("[]").is_err());
    }

    #[test]
    fn test_snapshot_presence_is_explicit() {
        let snapshot = FundamentalSnapshot {
            trailing_pe: None,
            trailing_eps: Some(0.0),
            return_on_equity: Some(f64::NAN),
            revenue_growth: Some(0.12),
            debt_to_equity: Some(0.0),
        };

        assert_eq!(snapshot.value(MetricId::PeRatio), None);
        assert_eq!(snapshot.value(MetricId::Eps), Some(0.0));
        assert_eq!(snapshot.value(MetricId::Roe), None);
        assert_eq!(snapshot.value(MetricId::DebtToEquity), Some(0.0));
        assert_eq!(snapshot.value(MetricId::Rsi), None);
        assert_eq!(snapshot.reported_count(), 3);
    }

    #[test]
    fn test_snapshot_deserializes_provider_keys() {
        let json = r#"{"trailingPE": 20.5, "trailingEps": 5.1, "debtToEquity": 0, "industry": "ignored"}"#;
        let snapshot: FundamentalSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.trailing_pe, Some(20.5));
        assert_eq!(snapshot.trailing_eps, Some(5.1));
        assert_eq!(snapshot.return_on_equity, None);
        assert_eq!(snapshot.debt_to_equity, Some(0.0));
    }

    #[test]
    fn test_request_with_missing_histories() {
        let json = r#"{"symbol": "AAPL", "info": {"trailingPE": 30.0}}"#;
        let request: AnalysisRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.symbol, "AAPL");
        assert!(request.long_series.is_none());
        assert!(request.short_series.is_none());
        assert!(request.profile.is_none());
    }

    #[test]
    fn test_metric_order_and_buckets() {
        for (i, metric) in MetricId::ALL.iter().enumerate() {
            assert_eq!(metric.position(), i);
        }
        let short: Vec<_> = Bucket::ShortTerm.metrics().collect();
        assert_eq!(short, vec![MetricId::Rsi, MetricId::Macd]);
        assert_eq!(Bucket::LongTerm.metrics().count(), 6);
    }

    #[test]
    fn test_recommendation_boundaries() {
        assert_eq!(Recommendation::from_percent(100), Recommendation::StrongBuy);
        assert_eq!(Recommendation::from_percent(75), Recommendation::StrongBuy);
        assert_eq!(Recommendation::from_percent(74), Recommendation::Hold);
        assert_eq!(Recommendation::from_percent(50), Recommendation::Hold);
        assert_eq!(Recommendation::from_percent(49), Recommendation::Sell);
        assert_eq!(Recommendation::from_percent(0), Recommendation::Sell);
    }

    #[test]
    fn test_recommendation_serializes_as_label() {
        for rec in [Recommendation::StrongBuy, Recommendation::Hold, Recommendation::Sell] {
            assert_eq!(serde_json::to_value(rec).unwrap(), rec.to_label());
        }
        let parsed: Recommendation = serde_json::from_str(r#""Strong Buy""#).unwrap();
        assert_eq!(parsed, Recommendation::StrongBuy);
    }

    #[test]
    fn test_profile_accepts_float_market_cap() {
        let json = r#"{"symbol": "AAPL", "profile": {"marketCap": 3.0e12}, "info": {}}"#;
        let request: AnalysisRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.profile.unwrap().market_cap, Some(3.0e12));

        let profile: CompanyProfile = serde_json::from_str(r#"{"marketCap": 2950000000000}"#).unwrap();
        assert_eq!(profile.market_cap, Some(2.95e12));
    }

    #[test]
    fn test_category_display() {
        assert_eq!(MetricCategory::Fundamental.to_string(), "Fundamental");
        assert_eq!(MetricCategory::Price("3mo".into()).to_string(), "Price (3mo)");
    }

    #[test]
    fn test_metric_result_points() {
        let pass = MetricResult::scored(
            MetricId::Eps,
            MetricCategory::Fundamental,
            "5.00".into(),
            Some(5.0),
            ">0".into(),
            true,
            10,
        );
        assert_eq!(pass.points, 10);

        let absent = MetricResult::not_available(MetricId::Eps, MetricCategory::Fundamental, ">0".into());
        assert_eq!(absent.points, 0);
        assert_eq!(absent.value, "N/A");
        assert!(!absent.is_available());
    }
}
