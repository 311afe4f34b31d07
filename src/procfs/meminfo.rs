use serde::Serialize;
use tracing::trace;

use super::tokenize::{KEY_VALUE, tokenize};
use super::{Procfs, ProcfsError, records};

pub const MEMINFO: &str = "meminfo";

/// Total and free memory from `meminfo`, in kB.
///
/// a `total_kb` of zero means `MemTotal` never appeared; [`used_ratio`]
/// reports that as no data rather than as an idle machine.
///
/// [`used_ratio`]: MemorySnapshot::used_ratio
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MemorySnapshot {
    pub total_kb: f64,
    pub free_kb: f64,
}

impl MemorySnapshot {
    pub fn read<P: Procfs + ?Sized>(procfs: &P) -> Result<Self, ProcfsError> {
        let mut total = None;
        let mut free = None;
        for line in records(procfs, MEMINFO)? {
            let line = line?;
            match parse_entry(&line) {
                Some(("MemTotal", kb)) => total = Some(kb),
                Some(("MemFree", kb)) => free = Some(kb),
                Some(_) => {}
                None => trace!(line = %line, "skipping meminfo line without a numeric value"),
            }
        }

        let free_kb = free.ok_or_else(|| ProcfsError::Malformed {
            path: MEMINFO.to_string(),
            detail: "no MemFree entry".to_string(),
        })?;
        Ok(Self {
            total_kb: total.unwrap_or(0.0),
            free_kb,
        })
    }

    /// `used / total`, floored at zero. `None` when total is unknown.
    pub fn used_ratio(&self) -> Option<f64> {
        if self.total_kb <= 0.0 {
            return None;
        }
        Some((self.used_kb() / self.total_kb).max(0.0))
    }

    /// Raw `(total - free) / total`, before flooring. `None` when total is unknown.
    pub fn raw_ratio(&self) -> Option<f64> {
        (self.total_kb > 0.0).then(|| (self.total_kb - self.free_kb) / self.total_kb)
    }

    pub fn used_kb(&self) -> f64 {
        (self.total_kb - self.free_kb).max(0.0)
    }
}

/// Splits `"Key:   1234 kB"` into its trimmed key and leading number.
fn parse_entry(line: &str) -> Option<(&str, f64)> {
    let mut fields = tokenize(line, KEY_VALUE);
    let key = fields.next()?.trim();
    let value = fields.remainder()?;
    let kb = value.split_whitespace().next()?.parse().ok()?;
    Some((key, kb))
}
