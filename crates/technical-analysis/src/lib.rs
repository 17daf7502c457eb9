pub mod analyzer;
pub mod charts;
pub mod indicators;

#[cfg(test)]
mod test_support;

pub use analyzer::*;
pub use charts::*;
pub use indicators::*;
