use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use insta::assert_snapshot;
use inspector::config::TableConfig;
use inspector::procfs::kernel::hostname;
use inspector::procfs::meminfo::MemorySnapshot;
use inspector::procfs::{ProcRoot, ProcfsError};
use inspector::system::collector::Collector;
use inspector::system::owner::StaticOwners;
use inspector::system::snapshot::{Report, ViewOptions};
use inspector::system::usage::memory_usage;
use inspector::ui::report::{render, render_system};

/// A throwaway procfs-shaped directory under the system temp dir.
struct Fixture {
    root: PathBuf,
}

impl Fixture {
    fn new(name: &str) -> Self {
        let root = std::env::temp_dir()
            .join(format!("inspector-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        Fixture { root }
    }

    fn file(self, path: &str, contents: &str) -> Self {
        let path = self.root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
        self
    }

    fn procfs(&self) -> ProcRoot {
        ProcRoot::open(&self.root).unwrap()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

const CPUINFO: &str = "\
processor\t: 0
vendor_id\t: GenuineIntel
model\t\t: 158
model name\t: Intel(R) Core(TM) i7-8700 CPU @ 3.20GHz

processor\t: 1
vendor_id\t: GenuineIntel
model\t\t: 158
model name\t: Intel(R) Core(TM) i7-8700 CPU @ 3.20GHz
";

const MEMINFO: &str = "\
MemTotal:       16777216 kB
MemFree:         4194304 kB
MemAvailable:    8388608 kB
";

fn full_fixture(name: &str) -> Fixture {
    Fixture::new(name)
        .file("uptime", "90065.90 40000.00\n")
        .file("meminfo", MEMINFO)
        .file("cpuinfo", CPUINFO)
        .file("loadavg", "0.20 0.18 0.12 1/80 999\n")
        .file(
            "version",
            "Linux version 6.1.0-18-amd64 (debian-kernel@lists.debian.org) (gcc-12) #1 SMP\n",
        )
        .file("sys/kernel/hostname", "build-box\n")
        .file("self/status", "Name:\tinspector\nPid:\t77\n")
        .file(
            "1/status",
            "Name:\tsystemd\nState:\tS (sleeping)\nPid:\t1\nUid:\t0\t0\t0\t0\nThreads:\t1\n",
        )
        .file(
            "42/status",
            "Name:\tkworker/0:1\nState:\tI (idle)\nPid:\t42\nUid:\t0\t0\t0\t0\nThreads:\t1\n",
        )
        .file(
            "1000/status",
            "Name:\tbash\nState:\tR (running)\nPid:\t1000\nUid:\t1000\t1000\t1000\t1000\nThreads:\t1\n",
        )
}

fn collect(fixture: &Fixture, views: ViewOptions) -> Report {
    Collector::new(
        fixture.procfs(),
        StaticOwners::new().with(0, "root"),
        Duration::ZERO,
    )
    .collect(views)
}

#[test]
fn full_report_from_directory_fixture() {
    let fixture = full_fixture("full-report");
    let report = collect(&fixture, ViewOptions::all());

    let mut out = Vec::new();
    render(&mut out, &report, &TableConfig::default()).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_snapshot!("full_report", text.trim_end());
}

#[test]
fn json_report_tags_usage_status() {
    let fixture = full_fixture("json-report");
    let report = collect(&fixture, ViewOptions::all());
    let value = serde_json::to_value(&report).unwrap();

    let hardware = &value["hardware"];
    assert_eq!(hardware["memory_usage"]["ratio"], 0.75);
    assert_eq!(hardware["memory_usage"]["status"]["kind"], "measured");
    assert_eq!(hardware["cpu_usage"]["status"]["kind"], "no_elapsed_time");
    assert_eq!(hardware["cpu"]["logical_unit_count"], 2);
    assert_eq!(value["tasks"]["task_count"], 3);
    assert_eq!(value["tasks"]["processes"][2]["owner"], "1000");
    assert_eq!(value["tasks"]["processes"][2]["state"], "running");
}

#[test]
fn memory_usage_end_to_end() {
    let fixture = Fixture::new("meminfo").file("meminfo", "MemTotal: 2000 kB\nMemFree: 500 kB\n");
    let snapshot = MemorySnapshot::read(&fixture.procfs()).unwrap();
    assert_eq!(memory_usage(&snapshot).ratio, 0.75);
}

#[test]
fn empty_root_renders_unavailable_fields() {
    let fixture = Fixture::new("empty-root");
    let report = collect(
        &fixture,
        ViewOptions {
            system: true,
            ..ViewOptions::default()
        },
    );

    let mut out = Vec::new();
    render_system(&mut out, report.system.as_ref().unwrap()).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "System Information\n\
         --------------------\n\
         Hostname: unavailable\n\
         Kernel Version: unavailable\n\
         Uptime: unavailable\n"
    );
}

#[test]
fn over_long_lines_are_truncated_at_the_limit() {
    let long = "h".repeat(3000);
    let fixture = Fixture::new("long-line").file("sys/kernel/hostname", &long);
    let procfs = fixture.procfs().with_max_line_len(1024);
    assert_eq!(hostname(&procfs).unwrap().len(), 1024);
}

#[test]
fn missing_root_is_unavailable() {
    let missing = std::env::temp_dir().join("inspector-no-such-root");
    assert!(matches!(
        ProcRoot::open(&missing),
        Err(ProcfsError::DataUnavailable { .. })
    ));
}

#[test]
fn file_root_is_rejected() {
    let fixture = Fixture::new("file-root").file("uptime", "1.0 1.0\n");
    assert!(matches!(
        ProcRoot::open(fixture.root.join("uptime")),
        Err(ProcfsError::NotADirectory { .. })
    ));
}
