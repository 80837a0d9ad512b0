//! Command implementations.

pub mod progress;
pub mod run;
