//! derived metrics and report collection on top of the procfs readers.

pub mod collector;
pub mod owner;
pub mod snapshot;
pub mod usage;
