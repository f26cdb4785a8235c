//! Outbound side of pflegedoc: the timeout-bounded optimization webhook client.

pub mod optimize;

pub use optimize::{CallError, Optimize, OptimizeClient};
