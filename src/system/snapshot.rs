use serde::Serialize;

use crate::procfs::cpuinfo::CpuInfo;
use crate::procfs::loadavg::LoadAverage;
use crate::procfs::meminfo::MemorySnapshot;
use crate::procfs::status::ProcessRecord;
use crate::procfs::uptime::UptimeSample;
use crate::system::usage::Utilization;

/// Which report sections to produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ViewOptions {
    pub hardware: bool,
    pub system: bool,
    pub tasks: bool,
    pub live: bool,
}

/// Everything gathered for one run. A `None` field could not be read.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub system: Option<SystemReport>,
    pub hardware: Option<HardwareReport>,
    pub tasks: Option<TaskReport>,
}

#[derive(Debug, Serialize)]
pub struct SystemReport {
    pub hostname: Option<String>,
    pub kernel_version: Option<String>,
    pub uptime: Option<UptimeSample>,
}

#[derive(Debug, Serialize)]
pub struct HardwareReport {
    pub cpu: Option<CpuInfo>,
    pub load: Option<LoadAverage>,
    pub cpu_usage: Utilization,
    pub memory: Option<MemorySnapshot>,
    pub memory_usage: Utilization,
}

#[derive(Debug, Serialize)]
pub struct TaskReport {
    /// processes found under the root; `None` if the root could not be listed.
    pub task_count: Option<usize>,
    pub processes: Vec<ProcessRecord>,
}

impl ViewOptions {
    /// Every one-shot section.
    pub fn all() -> Self {
        Self {
            hardware: true,
            system: true,
            tasks: true,
            live: false,
        }
    }

    /// Resolves command line view flags.
    ///
    /// no flags at all selects every section, and the live view overrides
    /// anything else that was asked for.
    pub fn select(all: bool, hardware: bool, system: bool, tasks: bool, live: bool) -> Self {
        if live {
            return Self {
                live: true,
                ..Self::default()
            };
        }
        if all || !(hardware || system || tasks) {
            return Self::all();
        }
        Self {
            hardware,
            system,
            tasks,
            live: false,
        }
    }
}
