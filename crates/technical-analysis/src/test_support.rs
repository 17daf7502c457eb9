use analysis_core::{PriceBar, PriceSeries};
use chrono::{Duration, TimeZone, Utc};

/// Daily bars starting 2023-01-02
pub fn series(closes: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar::new(start + Duration::days(i as i64), close))
        .collect();
    PriceSeries::new(bars).unwrap()
}

pub fn rising(len: usize, start: f64, step: f64) -> Vec<f64> {
    (0..len).map(|i| start + step * i as f64).collect()
}

/// +2 / -1 alternating moves: RSI 66.67 with MACD above signal
pub fn choppy_uptrend(len: usize) -> Vec<f64> {
    let mut closes = vec![100.0];
    for i in 1..len {
        let step = if i % 2 == 1 { 2.0 } else { -1.0 };
        closes.push(closes[i - 1] + step);
    }
    closes
}

/// Steep climb followed by +2 / -0.5 moves: RSI 80 with MACD below signal
pub fn fading_rally() -> Vec<f64> {
    let mut closes = vec![100.0];
    for _ in 0..40 {
        let last = *closes.last().unwrap();
        closes.push(last + 3.0);
    }
    for i in 0..20 {
        let last = *closes.last().unwrap();
        closes.push(last + if i % 2 == 0 { 2.0 } else { -0.5 });
    }
    closes
}
