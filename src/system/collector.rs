use std::time::Duration;

use tracing::{debug, warn};

use super::owner::PasswdLookup;
use super::snapshot::{HardwareReport, Report, SystemReport, TaskReport, ViewOptions};
use super::usage::{Utilization, memory_usage, sample_cpu_usage};
use crate::procfs::cpuinfo::CpuInfo;
use crate::procfs::kernel::{hostname, kernel_version};
use crate::procfs::loadavg::LoadAverage;
use crate::procfs::meminfo::MemorySnapshot;
use crate::procfs::status::{OwnerLookup, read_processes};
use crate::procfs::uptime::UptimeSample;
use crate::procfs::{Procfs, ProcfsError, pids};

/// Runs the extractors for the sections a report asks for.
pub struct Collector<P, O = PasswdLookup> {
    procfs: P,
    owners: O,
    sample_interval: Duration,
}

impl<P: Procfs, O: OwnerLookup> Collector<P, O> {
    pub fn new(procfs: P, owners: O, sample_interval: Duration) -> Self {
        Collector {
            procfs,
            owners,
            sample_interval,
        }
    }

    pub fn procfs(&self) -> &P {
        &self.procfs
    }

    pub fn collect(&self, views: ViewOptions) -> Report {
        Report {
            system: views.system.then(|| self.system()),
            hardware: views.hardware.then(|| self.hardware()),
            tasks: views.tasks.then(|| self.tasks()),
        }
    }

    pub fn system(&self) -> SystemReport {
        SystemReport {
            hostname: available("hostname", hostname(&self.procfs)),
            kernel_version: available("kernel version", kernel_version(&self.procfs)),
            uptime: available("uptime", UptimeSample::read(&self.procfs)),
        }
    }

    /// Blocks for one sample interval while measuring cpu usage.
    pub fn hardware(&self) -> HardwareReport {
        let memory = available("memory", MemorySnapshot::read(&self.procfs));
        let cpu = available("cpu info", CpuInfo::read(&self.procfs));
        let load = available("load average", LoadAverage::read(&self.procfs));

        let logical_units = cpu.as_ref().map_or(1, |cpu| cpu.logical_unit_count);
        let cpu_usage = available(
            "cpu usage",
            sample_cpu_usage(&self.procfs, self.sample_interval, logical_units),
        )
        .unwrap_or_else(Utilization::no_data);
        let memory_usage = memory
            .as_ref()
            .map_or_else(Utilization::no_data, memory_usage);

        HardwareReport {
            cpu,
            load,
            cpu_usage,
            memory,
            memory_usage,
        }
    }

    pub fn tasks(&self) -> TaskReport {
        let task_count = available("task count", pids(&self.procfs)).map(|pids| pids.len());
        let processes = available(
            "process table",
            read_processes(&self.procfs, &self.owners),
        )
        .unwrap_or_default();
        debug!(
            listed = ?task_count,
            recorded = processes.len(),
            "collected task table"
        );
        TaskReport {
            task_count,
            processes,
        }
    }
}

/// Keeps a reading, or logs why it is missing.
fn available<T>(metric: &'static str, reading: Result<T, ProcfsError>) -> Option<T> {
    reading
        .inspect_err(|error| warn!(metric, %error, "metric unavailable"))
        .ok()
}
