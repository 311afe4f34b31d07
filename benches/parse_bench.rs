use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use inspector::procfs::MockProcfs;
use inspector::procfs::cpuinfo::CpuInfo;
use inspector::procfs::meminfo::MemorySnapshot;
use inspector::procfs::status::{ProcessRecordBuilder, read_processes};
use inspector::procfs::tokenize::{CPUINFO, KEY_VALUE, tokenize};
use inspector::system::owner::StaticOwners;
use std::hint::black_box;

const STATUS: &str = "\
Name:\tkworker/u16:3-events_unbound
Umask:\t0000
State:\tI (idle)
Tgid:\t8812
Ngid:\t0
Pid:\t8812
PPid:\t2
TracerPid:\t0
Uid:\t0\t0\t0\t0
Gid:\t0\t0\t0\t0
FDSize:\t64
Groups:\t
Threads:\t1
SigQ:\t0/62834
voluntary_ctxt_switches:\t1182
nonvoluntary_ctxt_switches:\t3
";

const MEMINFO: &str = "\
MemTotal:       32658116 kB
MemFree:         2243472 kB
MemAvailable:   18322560 kB
Buffers:         1288300 kB
Cached:         14309488 kB
SwapCached:            0 kB
Active:          9871112 kB
Inactive:       17153520 kB
";

fn make_cpuinfo(cores: usize) -> String {
    (0..cores)
        .map(|i| {
            format!(
                "processor\t: {i}\nvendor_id\t: AuthenticAMD\nmodel\t\t: 113\n\
                 model name\t: AMD Ryzen 9 3900X 12-Core Processor\ncpu MHz\t\t: 3800.000\n\n"
            )
        })
        .collect()
}

fn make_procfs(processes: usize) -> MockProcfs {
    let mut procfs = MockProcfs::new().with_file("meminfo", MEMINFO);
    for pid in 1..=processes {
        let status = STATUS.replace("8812", &pid.to_string());
        procfs = procfs.with_file(&format!("{pid}/status"), &status);
    }
    procfs
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    let lines = [
        ("key_value", "MemAvailable:   18322560 kB", KEY_VALUE),
        (
            "cpuinfo",
            "model name\t: AMD Ryzen 9 3900X 12-Core Processor",
            CPUINFO,
        ),
    ];

    for (name, line, delims) in lines {
        group.bench_with_input(BenchmarkId::from_parameter(name), &line, |b, line| {
            b.iter(|| black_box(tokenize(black_box(line), delims).count()))
        });
    }

    group.finish();
}

fn bench_status_builder(c: &mut Criterion) {
    let owners = StaticOwners::new().with(0, "root");
    c.bench_function("status_builder", |b| {
        b.iter(|| {
            let mut builder = ProcessRecordBuilder::new();
            for line in black_box(STATUS).lines() {
                builder.feed(line);
            }
            black_box(builder.build(&owners))
        })
    });
}

fn bench_cpuinfo_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpuinfo_parse_4_16_64");

    for cores in [4usize, 16, 64] {
        let contents = make_cpuinfo(cores);
        group.bench_with_input(BenchmarkId::from_parameter(cores), &contents, |b, contents| {
            b.iter(|| black_box(CpuInfo::parse(black_box(contents))))
        });
    }

    group.finish();
}

fn bench_procfs_readers(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_table_100_500");
    let owners = StaticOwners::new().with(0, "root");

    for size in [100usize, 500] {
        let procfs = make_procfs(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &procfs, |b, procfs| {
            b.iter(|| black_box(read_processes(procfs, &owners)))
        });
    }

    group.finish();

    let procfs = make_procfs(0);
    c.bench_function("meminfo_read", |b| {
        b.iter(|| black_box(MemorySnapshot::read(&procfs)))
    });
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_status_builder,
    bench_cpuinfo_parse,
    bench_procfs_readers
);
criterion_main!(benches);
