use analysis_core::{MetricThresholds, PriceSeries};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::indicators::*;

/// Close price with fast/slow moving averages over the long window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongWindowChart {
    pub timestamps: Vec<DateTime<Utc>>,
    pub close: Vec<f64>,
    pub sma_fast: Vec<Option<f64>>,
    pub sma_slow: Vec<Option<f64>>,
    pub fast_period: usize,
    pub slow_period: usize,
}

/// RSI with its band, plus MACD and signal lines, over the short window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortWindowChart {
    pub timestamps: Vec<DateTime<Utc>>,
    pub close: Vec<f64>,
    pub rsi: Vec<Option<f64>>,
    pub rsi_lower: f64,
    pub rsi_upper: f64,
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
}

/// Series for the presentation layer's charts. A window without history has no chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub long: Option<LongWindowChart>,
    pub short: Option<ShortWindowChart>,
}

impl ChartData {
    pub fn build(
        long: Option<&PriceSeries>,
        short: Option<&PriceSeries>,
        thresholds: &MetricThresholds,
    ) -> Self {
        Self {
            long: long.map(|series| long_window_chart(series, thresholds)),
            short: short.map(|series| short_window_chart(series, thresholds)),
        }
    }
}

fn long_window_chart(series: &PriceSeries, t: &MetricThresholds) -> LongWindowChart {
    let close = series.closes();
    LongWindowChart {
        timestamps: series.timestamps(),
        sma_fast: sma(&close, t.fast_ma_period),
        sma_slow: sma(&close, t.slow_ma_period),
        fast_period: t.fast_ma_period,
        slow_period: t.slow_ma_period,
        close,
    }
}

fn short_window_chart(series: &PriceSeries, t: &MetricThresholds) -> ShortWindowChart {
    let close = series.closes();
    let lines = macd_with(&close, t.macd_fast, t.macd_slow, t.macd_signal);
    ShortWindowChart {
        timestamps: series.timestamps(),
        rsi: rsi(&close, t.rsi_period),
        rsi_lower: t.rsi_lower,
        rsi_upper: t.rsi_upper,
        macd_line: lines.macd_line,
        signal_line: lines.signal_line,
        close,
    }
}
