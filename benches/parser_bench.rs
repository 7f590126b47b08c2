//! Benchmarks for the CNU statistics line parser.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use cnu_stats_parser::parser::{looks_like_cnu_stats, parse_channels, parse_line};
use cnu_stats_parser::scan::scan;
use std::io::{self, Cursor};

/// Sample statistics lines for benchmarking.
const SAMPLE_LINES: &[&str] = &[
    "12:1699999999.123:INFO:moca:handleCnuStats:45: <2:eth0>,<7:AA:BB:CC:DD:EE:FF>,<1> <Rx Good/Bad,Percent 100/ 2, 1.96%> blah per channel <0:4/-3/30/100,4/200><1:5/2/28/90,3/180>",
    "13:1699999999.456:INFO:moca:handleCnuStats:45: <3:eth1>,<9,11:22:33:44:55:66>,<0> <Rx Good/Bad,Percent 80/ 0, 0.00%> per channel",
    "14:1699999999.789:DBG:moca_mgr: report_stats :812: <1:moca0>,<4,00:11:22:33:44:55>,<1> <Rx Good/Bad,Percent 123456/ 78, 0.06%> per channel <0:10/-12/35/600,10/610><1:10/-11/34/590,10/600><2:9/-10/33/540,9/550><3:9/-9/32/530,9/540>",
];

const CHANNEL_SEGMENT: &str = "<0:10/-12/35/600,10/610><1:10/-11/34/590,10/600><2:9/-10/33/540,9/550><3:9/-9/32/530,9/540><4:8/-8/31/480,8/490><5:8/-7/30/470,8/480>";

fn bench_parse_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_line");

    // Benchmark single line parsing
    group.throughput(Throughput::Elements(1));
    group.bench_function("single", |b| {
        b.iter(|| parse_line(black_box(SAMPLE_LINES[0])))
    });

    // Benchmark batch parsing
    group.throughput(Throughput::Elements(SAMPLE_LINES.len() as u64));
    group.bench_function("batch", |b| {
        b.iter(|| {
            for line in SAMPLE_LINES {
                let _ = parse_line(black_box(line));
            }
        })
    });

    group.finish();
}

fn bench_parse_channels(c: &mut Criterion) {
    c.bench_function("parse_channels", |b| {
        b.iter(|| parse_channels(black_box(CHANNEL_SEGMENT)))
    });
}

fn bench_looks_like_cnu_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("looks_like_cnu_stats");

    let valid_line = SAMPLE_LINES[0];
    let invalid_line = "4:1699999999.001:INFO:moca:linkMonitor:210: port 2 link up, 16 nodes";

    group.bench_function("valid_line", |b| {
        b.iter(|| looks_like_cnu_stats(black_box(valid_line)))
    });

    group.bench_function("invalid_line", |b| {
        b.iter(|| looks_like_cnu_stats(black_box(invalid_line)))
    });

    group.finish();
}

fn bench_full_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_scan");

    // Mix of statistics lines and ordinary trace lines
    let mixed_lines = [
        SAMPLE_LINES[0],
        "4:1699999999.001:INFO:moca:linkMonitor:210: port 2 link up, 16 nodes",
        SAMPLE_LINES[1],
        "",
        SAMPLE_LINES[2],
        "5:1699999999.002:WARN:moca:beacon:88: missed beacon",
    ];
    let input = mixed_lines.join("\n");

    group.throughput(Throughput::Elements(mixed_lines.len() as u64));
    group.bench_function("mixed_input", |b| {
        b.iter(|| scan(Cursor::new(black_box(input.as_bytes())), &mut io::sink(), true))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_line,
    bench_parse_channels,
    bench_looks_like_cnu_stats,
    bench_full_scan
);
criterion_main!(benches);
