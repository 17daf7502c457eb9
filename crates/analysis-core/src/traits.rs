use crate::{AnalysisError, FundamentalSnapshot, Ledger, PriceSeries};

/// Scores the fundamental metrics and appends them to the ledger
pub trait FundamentalEvaluator {
    fn evaluate(&self, snapshot: &FundamentalSnapshot, ledger: &mut Ledger) -> Result<(), AnalysisError>;
}

/// Scores the price-derived metrics. The long series feeds the MA cross,
/// the short series feeds RSI and MACD.
pub trait TechnicalEvaluator {
    fn evaluate(
        &self,
        long: Option<&PriceSeries>,
        short: Option<&PriceSeries>,
        ledger: &mut Ledger,
    ) -> Result<(), AnalysisError>;
}
