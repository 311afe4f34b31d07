use std::thread;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::procfs::meminfo::MemorySnapshot;
use crate::procfs::uptime::UptimeSample;
use crate::procfs::{Procfs, ProcfsError};

/// A usage ratio together with how trustworthy it is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Utilization {
    /// always within `[0, 1]`.
    pub ratio: f64,
    pub status: UsageStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UsageStatus {
    /// computed from the source data and already within range.
    Measured,
    /// computed, but fell outside `[0, 1]` and was pulled back in.
    Clamped { raw: f64 },
    /// the two samples were taken at the same kernel instant.
    NoElapsedTime,
    /// the source data needed for the ratio was missing.
    NoData,
}

/// The live-view cpu estimator: every reading is measured against one
/// sample taken when the loop started.
#[derive(Clone, Copy, Debug)]
pub struct CpuBaseline {
    anchor: UptimeSample,
    logical_units: u32,
}

// === impl Utilization ===

impl Utilization {
    /// Wraps a raw ratio, clamping it into `[0, 1]`.
    pub fn from_raw(raw: f64) -> Self {
        if !raw.is_finite() {
            return Self::no_data();
        }
        if (0.0..=1.0).contains(&raw) {
            return Self {
                ratio: raw,
                status: UsageStatus::Measured,
            };
        }
        debug!(raw, "clamping out of range usage ratio");
        Self {
            ratio: raw.clamp(0.0, 1.0),
            status: UsageStatus::Clamped { raw },
        }
    }

    pub fn no_data() -> Self {
        Self {
            ratio: 0.0,
            status: UsageStatus::NoData,
        }
    }

    pub fn no_elapsed_time() -> Self {
        Self {
            ratio: 0.0,
            status: UsageStatus::NoElapsedTime,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status != UsageStatus::NoData
    }

    /// Mean of two readings; a reading with no data defers to the other.
    pub fn smoothed(self, previous: Self) -> Self {
        match (self.is_available(), previous.is_available()) {
            (true, true) => Self::from_raw((self.ratio + previous.ratio) / 2.0),
            (true, false) => self,
            (false, _) => previous,
        }
    }
}

/// Memory usage, or no data when `MemTotal` was missing.
pub fn memory_usage(snapshot: &MemorySnapshot) -> Utilization {
    snapshot
        .raw_ratio()
        .map(Utilization::from_raw)
        .unwrap_or_else(Utilization::no_data)
}

/// `1 - idle_delta / total_delta` between two uptime samples.
pub fn cpu_usage(first: &UptimeSample, second: &UptimeSample) -> Utilization {
    cpu_usage_across(first, second, 1)
}

/// [`cpu_usage`] with the idle delta shared across `logical_units` cpus.
///
/// the kernel sums idle time over every cpu, so on a machine with more than
/// one unit the raw idle delta exceeds wall time.
pub fn cpu_usage_across(
    first: &UptimeSample,
    second: &UptimeSample,
    logical_units: u32,
) -> Utilization {
    let elapsed = second.total_seconds - first.total_seconds;
    if elapsed == 0.0 {
        return Utilization::no_elapsed_time();
    }
    let idle = (second.idle_seconds - first.idle_seconds) / f64::from(logical_units.max(1));
    Utilization::from_raw(1.0 - idle / elapsed)
}

/// Samples uptime twice, `interval` apart, and compares the two.
pub fn sample_cpu_usage<P: Procfs + ?Sized>(
    procfs: &P,
    interval: Duration,
    logical_units: u32,
) -> Result<Utilization, ProcfsError> {
    let first = UptimeSample::read(procfs)?;
    thread::sleep(interval);
    let second = UptimeSample::read(procfs)?;
    Ok(cpu_usage_across(&first, &second, logical_units))
}

// === impl CpuBaseline ===

impl CpuBaseline {
    pub fn capture<P: Procfs + ?Sized>(
        procfs: &P,
        logical_units: u32,
    ) -> Result<Self, ProcfsError> {
        Ok(Self::new(UptimeSample::read(procfs)?, logical_units))
    }

    pub fn new(anchor: UptimeSample, logical_units: u32) -> Self {
        Self {
            anchor,
            logical_units,
        }
    }

    /// Average usage between the anchor and `now`.
    pub fn usage_at(&self, now: &UptimeSample) -> Utilization {
        cpu_usage_across(&self.anchor, now, self.logical_units)
    }

    pub fn usage_now<P: Procfs + ?Sized>(&self, procfs: &P) -> Result<Utilization, ProcfsError> {
        UptimeSample::read(procfs).map(|now| self.usage_at(&now))
    }
}
