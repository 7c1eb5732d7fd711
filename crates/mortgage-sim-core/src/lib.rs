pub mod error;
pub mod payment;
pub mod scenarios;
pub mod simulation;
pub mod types;

pub use error::MortgageSimError;
pub use types::*;

/// Standard result type for all mortgage-sim operations
pub type MortgageSimResult<T> = Result<T, MortgageSimError>;
