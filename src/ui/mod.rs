//! Text output: the one-shot report and the live dashboard.

pub mod live;
pub mod report;
