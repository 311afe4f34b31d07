use serde::Serialize;

use super::tokenize::{WHITESPACE, tokenize};
use super::{Procfs, ProcfsError, first_record};

pub const UPTIME: &str = "uptime";

/// The two counters in `uptime`, read at one instant.
///
/// `idle_seconds` is summed over every logical cpu, so on a multi-core machine
/// it grows faster than `total_seconds`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct UptimeSample {
    pub total_seconds: f64,
    pub idle_seconds: f64,
}

impl UptimeSample {
    pub fn read<P: Procfs + ?Sized>(procfs: &P) -> Result<Self, ProcfsError> {
        let line = first_record(procfs, UPTIME)?;
        Self::parse(&line).ok_or_else(|| ProcfsError::Malformed {
            path: UPTIME.to_string(),
            detail: format!("expected two numeric fields, got {line:?}"),
        })
    }

    /// Parses `"<total> <idle>"`; extra fields are ignored.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = tokenize(line.trim(), WHITESPACE).non_empty();
        let total_seconds = fields.next()?.parse().ok()?;
        let idle_seconds = fields.next()?.parse().ok()?;
        Some(Self {
            total_seconds,
            idle_seconds,
        })
    }
}
