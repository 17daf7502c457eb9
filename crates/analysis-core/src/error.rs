use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A fundamental field or indicator value is not available. Degrades one metric.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// The price series is too short for the indicator. Degrades one metric.
    #[error("Insufficient history: {0}")]
    InsufficientHistory(String),

    /// Malformed input; the caller must fix it.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl AnalysisError {
    /// True for errors that turn a single metric into a 0-point "N/A" entry
    /// instead of aborting the analysis.
    pub fn is_degradation(&self) -> bool {
        matches!(
            self,
            AnalysisError::MissingData(_) | AnalysisError::InsufficientHistory(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degradation_classification() {
        assert!(AnalysisError::MissingData("pe".into()).is_degradation());
        assert!(AnalysisError::InsufficientHistory("rsi".into()).is_degradation());
        assert!(!AnalysisError::InvalidInput("empty".into()).is_degradation());
        assert!(!AnalysisError::Config("bad".into()).is_degradation());
    }

    #[test]
    fn test_error_messages() {
        let err = AnalysisError::InsufficientHistory("need 201 bars, got 200".into());
        assert_eq!(err.to_string(), "Insufficient history: need 201 bars, got 200");
    }
}
