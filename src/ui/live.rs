//! The refreshing hardware dashboard.
//!
//! A [`LiveSampler`] is created once, which captures the cpu baseline, and is
//! then ticked at a fixed cadence. Each frame overwrites the previous one in
//! place by moving the cursor back up over the lines it printed.

use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use super::report::{RULE, load_line, usage_bar};
use crate::procfs::Procfs;
use crate::procfs::cpuinfo::CpuInfo;
use crate::procfs::loadavg::LoadAverage;
use crate::procfs::meminfo::MemorySnapshot;
use crate::system::usage::{CpuBaseline, Utilization, memory_usage};

/// Lines printed per frame.
const FRAME_LINES: u16 = 3;

/// One redraw worth of readings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiveFrame {
    pub load: Option<LoadAverage>,
    pub cpu: Utilization,
    /// mean of this tick's memory reading and the previous one.
    pub memory: Utilization,
}

pub struct LiveSampler<P> {
    procfs: P,
    logical_units: u32,
    baseline: Option<CpuBaseline>,
    previous_memory: Utilization,
}

impl<P: Procfs> LiveSampler<P> {
    /// Takes the baseline cpu and memory readings every later tick is
    /// measured against.
    pub fn start(procfs: P) -> Self {
        let logical_units = CpuInfo::read(&procfs)
            .map(|cpu| cpu.logical_unit_count)
            .inspect_err(|error| warn!(%error, "cpu info unavailable, assuming one unit"))
            .unwrap_or(1);
        let baseline = capture_baseline(&procfs, logical_units);
        let previous_memory = read_memory(&procfs);
        debug!(logical_units, has_baseline = baseline.is_some(), "live view started");
        LiveSampler {
            procfs,
            logical_units,
            baseline,
            previous_memory,
        }
    }

    pub fn tick(&mut self) -> LiveFrame {
        let load = LoadAverage::read(&self.procfs)
            .inspect_err(|error| warn!(%error, "load average unavailable"))
            .ok();

        let cpu = match self.baseline {
            Some(baseline) => baseline
                .usage_now(&self.procfs)
                .inspect_err(|error| warn!(%error, "cpu usage unavailable"))
                .unwrap_or_else(|_| Utilization::no_data()),
            None => {
                // a baseline that failed at start is retried; this tick has no data.
                self.baseline = capture_baseline(&self.procfs, self.logical_units);
                Utilization::no_data()
            }
        };

        let current = read_memory(&self.procfs);
        let memory = current.smoothed(self.previous_memory);
        self.previous_memory = current;

        debug!(cpu = cpu.ratio, memory = memory.ratio, "live tick");
        LiveFrame { load, cpu, memory }
    }
}

fn capture_baseline<P: Procfs>(procfs: &P, logical_units: u32) -> Option<CpuBaseline> {
    CpuBaseline::capture(procfs, logical_units)
        .inspect_err(|error| warn!(%error, "cpu baseline unavailable"))
        .ok()
}

fn read_memory<P: Procfs>(procfs: &P) -> Utilization {
    MemorySnapshot::read(procfs)
        .map(|snapshot| memory_usage(&snapshot))
        .inspect_err(|error| warn!(%error, "memory usage unavailable"))
        .unwrap_or_else(|_| Utilization::no_data())
}

/// Prints a frame and leaves the cursor on its first line.
pub fn draw_frame(out: &mut impl Write, frame: &LiveFrame) -> io::Result<()> {
    queue!(out, Clear(ClearType::UntilNewLine))?;
    writeln!(out, "{}", load_line(frame.load.as_ref()))?;
    queue!(out, Clear(ClearType::UntilNewLine))?;
    writeln!(out, "CPU Usage:    {}", usage_bar(&frame.cpu))?;
    queue!(out, Clear(ClearType::UntilNewLine))?;
    writeln!(out, "Memory Usage: {}", usage_bar(&frame.memory))?;
    queue!(out, cursor::MoveUp(FRAME_LINES), cursor::MoveToColumn(0))?;
    out.flush()
}

/// Runs the dashboard until Ctrl-C.
pub async fn run<P: Procfs>(
    procfs: P,
    refresh: Duration,
    out: &mut impl Write,
) -> io::Result<()> {
    run_until(procfs, refresh, out, tokio::signal::ctrl_c()).await
}

/// Runs the dashboard until `shutdown` resolves, then restores the cursor.
pub async fn run_until<P: Procfs>(
    procfs: P,
    refresh: Duration,
    out: &mut impl Write,
    shutdown: impl Future<Output = io::Result<()>>,
) -> io::Result<()> {
    writeln!(out, "Live View/Memory View")?;
    writeln!(out, "{RULE}")?;
    queue!(out, cursor::Hide)?;
    out.flush()?;

    let mut sampler = LiveSampler::start(procfs);

    // tokio rejects a zero period.
    let mut ticks = time::interval(refresh.max(Duration::from_millis(1)));
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately; frames start one period in.
    ticks.tick().await;

    tokio::pin!(shutdown);
    let mut drawn = false;
    let result = loop {
        tokio::select! {
            signal = &mut shutdown => {
                debug!("live view interrupted");
                break signal;
            }
            _ = ticks.tick() => {
                let frame = sampler.tick();
                if let Err(error) = draw_frame(out, &frame) {
                    break Err(error);
                }
                drawn = true;
            }
        }
    };

    if drawn {
        queue!(out, cursor::MoveDown(FRAME_LINES))?;
    }
    queue!(out, cursor::Show)?;
    out.flush()?;
    result
}
