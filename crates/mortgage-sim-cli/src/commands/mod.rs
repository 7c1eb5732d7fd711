pub mod payment;
pub mod scenarios;
pub mod simulate;
