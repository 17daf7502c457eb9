//! Price indicators over close series. Output vectors are aligned with the
//! input: index `i` describes the bar at index `i`.

/// Simple Moving Average. `None` for the first `window - 1` positions.
pub fn sma(data: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if window == 0 || data.len() < window {
        return result;
    }

    for i in window - 1..data.len() {
        let sum: f64 = data[i + 1 - window..=i].iter().sum();
        result[i] = Some(sum / window as f64);
    }
    result
}

/// Exponential Moving Average with α = 2 / (span + 1), seeded by the first
/// sample and no bias adjustment.
pub fn ema(data: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || data.is_empty() {
        return vec![];
    }

    let multiplier = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len());
    let mut prev = data[0];
    result.push(prev);

    for &value in &data[1..] {
        // Written as a step from prev so a constant input stays exactly constant
        prev = (value - prev) * multiplier + prev;
        result.push(prev);
    }

    result
}

/// Relative Strength Index using simple rolling means of gains and losses.
///
/// The first `period` positions are `None`. A window with gains but no
/// losses yields exactly 100. A window with neither gains nor losses has no
/// defined RSI and stays `None`.
pub fn rsi(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if period == 0 || data.len() <= period {
        return result;
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = data
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, -change)
            }
        })
        .unzip();

    // gains[j] is the move into data[j + 1]
    for end in period..=gains.len() {
        let avg_gain = gains[end - period..end].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[end - period..end].iter().sum::<f64>() / period as f64;
        result[end] = rsi_from_averages(avg_gain, avg_loss);
    }

    result
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { Some(100.0) } else { None };
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}

/// MACD (Moving Average Convergence Divergence)
#[derive(Debug, Clone, PartialEq)]
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdResult {
    fn empty() -> Self {
        Self {
            macd_line: vec![],
            signal_line: vec![],
            histogram: vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.macd_line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macd_line.is_empty()
    }
}

/// Standard 12/26/9 MACD
pub fn macd(data: &[f64]) -> MacdResult {
    macd_with(data, 12, 26, 9)
}

pub fn macd_with(data: &[f64], fast_span: usize, slow_span: usize, signal_span: usize) -> MacdResult {
    if fast_span == 0 || slow_span == 0 || signal_span == 0 || data.is_empty() {
        return MacdResult::empty();
    }

    let ema_fast = ema(data, fast_span);
    let ema_slow = ema(data, slow_span);
    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(fast, slow)| fast - slow)
        .collect();

    let signal_line = ema(&macd_line, signal_span);
    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    MacdResult {
        macd_line,
        signal_line,
        histogram,
    }
}

/// Most recent defined value of a warm-up series
pub fn last_defined(series: &[Option<f64>]) -> Option<f64> {
    series.iter().rev().find_map(|v| *v)
}
