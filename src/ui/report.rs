use std::io::{self, Write};

use crate::config::TableConfig;
use crate::format::{align_right, format_kib_as_gb, format_uptime, percentage_bar};
use crate::procfs::loadavg::LoadAverage;
use crate::procfs::status::ProcessRecord;
use crate::system::snapshot::{HardwareReport, Report, SystemReport, TaskReport};
use crate::system::usage::Utilization;

pub(crate) const RULE: &str = "--------------------";
const UNAVAILABLE: &str = "unavailable";
const PID_WIDTH: usize = 5;
const STATE_WIDTH: usize = 12;

/// Writes every section present in `report`, separated by blank lines.
pub fn render(out: &mut impl Write, report: &Report, table: &TableConfig) -> io::Result<()> {
    let mut separator = "";
    if let Some(system) = &report.system {
        render_system(out, system)?;
        separator = "\n";
    }
    if let Some(hardware) = &report.hardware {
        write!(out, "{separator}")?;
        render_hardware(out, hardware)?;
        separator = "\n";
    }
    if let Some(tasks) = &report.tasks {
        write!(out, "{separator}")?;
        render_tasks(out, tasks, table)?;
    }
    Ok(())
}

pub fn render_system(out: &mut impl Write, system: &SystemReport) -> io::Result<()> {
    writeln!(out, "System Information")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Hostname: {}", text_or_unavailable(system.hostname.as_deref()))?;
    writeln!(
        out,
        "Kernel Version: {}",
        text_or_unavailable(system.kernel_version.as_deref())
    )?;
    let uptime = system
        .uptime
        .map(|uptime| format_uptime(uptime.total_seconds));
    writeln!(out, "Uptime: {}", text_or_unavailable(uptime.as_deref()))
}

pub fn render_hardware(out: &mut impl Write, hardware: &HardwareReport) -> io::Result<()> {
    writeln!(out, "Hardware Information")?;
    writeln!(out, "{RULE}")?;
    match &hardware.cpu {
        Some(cpu) => {
            writeln!(out, "CPU Model: {}", cpu.model_name)?;
            writeln!(out, "Processing Units: {}", cpu.logical_unit_count)?;
        }
        None => {
            writeln!(out, "CPU Model: {UNAVAILABLE}")?;
            writeln!(out, "Processing Units: {UNAVAILABLE}")?;
        }
    }
    writeln!(out, "{}", load_line(hardware.load.as_ref()))?;
    writeln!(out, "CPU Usage:    {}", usage_bar(&hardware.cpu_usage))?;

    let amounts = hardware
        .memory
        .filter(|_| hardware.memory_usage.is_available())
        .map(|memory| {
            format!(
                " ({} / {})",
                format_kib_as_gb(memory.used_kb()),
                format_kib_as_gb(memory.total_kb)
            )
        })
        .unwrap_or_default();
    writeln!(
        out,
        "Memory Usage: {}{amounts}",
        usage_bar(&hardware.memory_usage)
    )
}

pub fn render_tasks(
    out: &mut impl Write,
    tasks: &TaskReport,
    table: &TableConfig,
) -> io::Result<()> {
    writeln!(out, "Task Information")?;
    writeln!(out, "{RULE}")?;
    match tasks.task_count {
        Some(count) => writeln!(out, "Tasks running: {count}")?,
        None => writeln!(out, "Tasks running: {UNAVAILABLE}")?,
    }
    writeln!(out)?;
    writeln!(out, "{}", table_header(table))?;
    writeln!(out, "{}", table_separator(table))?;
    for process in &tasks.processes {
        writeln!(out, "{}", table_row(process, table))?;
    }
    Ok(())
}

/// `Load Average (1/5/15 min): 0.20 0.18 0.12`
pub fn load_line(load: Option<&LoadAverage>) -> String {
    match load {
        Some(load) => format!(
            "Load Average (1/5/15 min): {:.2} {:.2} {:.2}",
            load.one, load.five, load.fifteen
        ),
        None => format!("Load Average (1/5/15 min): {UNAVAILABLE}"),
    }
}

/// A percentage bar, or a marker when the reading had no data.
pub fn usage_bar(usage: &Utilization) -> String {
    if usage.is_available() {
        percentage_bar(usage.ratio)
    } else {
        UNAVAILABLE.to_string()
    }
}

pub fn table_header(table: &TableConfig) -> String {
    format!(
        "{:>PID_WIDTH$} | {:>STATE_WIDTH$} | {:>name$} | {:>user$} | Tasks",
        "PID",
        "State",
        "Task Name",
        "User",
        name = table.name_width,
        user = table.user_width,
    )
}

pub fn table_separator(table: &TableConfig) -> String {
    [
        PID_WIDTH + 1,
        STATE_WIDTH + 2,
        table.name_width + 2,
        table.user_width + 2,
        7,
    ]
    .iter()
    .map(|&width| "-".repeat(width))
    .collect::<Vec<_>>()
    .join("+")
}

pub fn table_row(process: &ProcessRecord, table: &TableConfig) -> String {
    let threads = process
        .threads
        .map(|threads| threads.to_string())
        .unwrap_or_default();
    format!(
        "{:>PID_WIDTH$} | {:>STATE_WIDTH$} | {} | {} | {threads}",
        process.pid,
        process.state.label(),
        align_right(&process.name, table.name_width),
        align_right(&process.owner, table.user_width),
    )
}

fn text_or_unavailable(text: Option<&str>) -> &str {
    text.unwrap_or(UNAVAILABLE)
}
