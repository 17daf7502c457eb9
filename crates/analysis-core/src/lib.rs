pub mod config;
pub mod error;
pub mod ledger;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::*;
pub use ledger::*;
pub use traits::*;
pub use types::*;
