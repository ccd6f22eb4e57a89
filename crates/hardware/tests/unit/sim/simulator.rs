//! End-to-end replay tests for the simulator driver.

use std::io::{Cursor, Write};

use cachesim_core::common::{SimError, TraceError};
use cachesim_core::config::{Config, InvalidRecordPolicy, TimingConfig};
use cachesim_core::sim::{RunSummary, Simulator, TraceReader};
use cachesim_core::AccessRecord;
use pretty_assertions::assert_eq;

use crate::common::{cache, init_tracing};

const CONFIG: &str = r#"{
    "L1_cache": { "size_kb": 1, "block_size_bytes": 64, "associativity": 2, "replacement_policy": "LRU" },
    "timing": { "L1_hit_time": 1, "L1_miss_penalty": 100 }
}"#;

fn simulator() -> Simulator {
    Simulator::new(&Config::from_json_str(CONFIG).unwrap()).unwrap()
}

fn reader(text: &str) -> TraceReader<Cursor<&str>> {
    TraceReader::new(Cursor::new(text))
}

#[test]
fn replays_trace_and_reports_amat() {
    init_tracing();
    let mut sim = simulator();
    let trace = "# warmup\nR 0x0\nR 0x0\nW 0x200\nR 0x400\nR 0x0\n";

    let summary = sim.run(reader(trace)).unwrap();
    assert_eq!(
        summary,
        RunSummary {
            processed: 5,
            skipped: 0
        }
    );

    // 0x0, 0x200 and 0x400 share set 0; the third block evicts 0x0.
    let stats = sim.report();
    assert_eq!((stats.hits, stats.misses), (1, 4));
    assert_eq!((stats.reads, stats.writes), (4, 1));
    assert_eq!(stats.writebacks, 1);
    assert!((stats.amat.unwrap() - 81.0).abs() < 1e-9);
}

#[test]
fn abort_stops_at_first_bad_record_and_keeps_counters() {
    let mut sim = simulator();
    let err = sim.run(reader("R 0x0\nR 0x40\nBOGUS\nR 0x80\n")).unwrap_err();

    assert!(matches!(
        err,
        SimError::Trace(TraceError::InvalidOperation { line: 3, .. })
    ));
    assert_eq!(sim.cache().stats().total_accesses(), 2);
}

#[test]
fn skip_policy_counts_and_continues() {
    init_tracing();
    let mut sim = simulator().on_invalid_record(InvalidRecordPolicy::Skip);
    let summary = sim
        .run(reader("R 0x0\nW\nR zz\nX 0x0\nR 0x0\n"))
        .unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 3);
    assert_eq!(sim.report().hits, 1);
}

#[test]
fn skip_policy_from_config() {
    let json = r#"{ "simulation": { "on_invalid_record": "skip" } }"#;
    let mut sim = Simulator::new(&Config::from_json_str(json).unwrap()).unwrap();
    let summary = sim.run(reader("nonsense\nR 0x10\n")).unwrap();
    assert_eq!(summary.skipped, 1);
    assert!(sim.timing().is_none());
    assert!(sim.report().amat.is_none());
}

#[test]
fn io_errors_abort_even_when_skipping() {
    let mut sim = simulator().on_invalid_record(InvalidRecordPolicy::Skip);
    let trace = vec![
        Ok((1, AccessRecord::read(0x0))),
        Err(TraceError::Io(std::io::Error::other("read failed"))),
        Ok((3, AccessRecord::read(0x40))),
    ];

    let err = sim.run(trace).unwrap_err();
    assert!(matches!(err, SimError::Trace(TraceError::Io(_))));
    assert_eq!(sim.cache().stats().total_accesses(), 1);
}

#[test]
fn step_and_with_cache() {
    let timing = TimingConfig::new(2.0, 20.0).unwrap();
    let mut sim = Simulator::with_cache(cache(256, 64, 1), Some(timing)).report_interval(1);

    assert!(!sim.step(AccessRecord::write(0x100)).unwrap());
    assert!(sim.step(AccessRecord::read(0x100)).unwrap());
    assert_eq!(sim.timing(), Some(&timing));

    let stats = sim.report();
    assert_eq!(stats.hit_rate, 0.5);
    assert_eq!(stats.amat, Some(12.0));
}

#[test]
fn progress_reporting_does_not_change_results() {
    init_tracing();
    let trace: String = (0..64u64).map(|i| format!("R {:#x}\n", (i % 8) * 64)).collect();

    let mut quiet = simulator();
    let mut chatty = simulator().report_interval(10);
    let _ = quiet.run(reader(&trace)).unwrap();
    let _ = chatty.run(reader(&trace)).unwrap();

    assert_eq!(quiet.report(), chatty.report());
}

#[test]
fn runs_trace_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for i in 0..100u64 {
        writeln!(file, "{} {:#x}", if i % 3 == 0 { 'W' } else { 'R' }, i * 16).unwrap();
    }

    let mut sim = simulator();
    let summary = sim.run(TraceReader::open(file.path()).unwrap()).unwrap();
    let stats = sim.report();

    assert_eq!(summary.processed, 100);
    assert_eq!(stats.total_accesses, 100);
    // 100 accesses at 16-byte stride touch 25 distinct 64-byte blocks.
    assert_eq!(stats.misses, 25);
    assert_eq!(stats.writes, 34);
}

#[test]
fn skip_policy_skips_non_utf8_lines() {
    let mut sim = simulator().on_invalid_record(InvalidRecordPolicy::Skip);
    let trace: &[u8] = b"R 0x0\nR \xff\xfe\nR 0x40\n";

    let summary = sim.run(TraceReader::new(Cursor::new(trace))).unwrap();
    assert_eq!(
        summary,
        RunSummary {
            processed: 2,
            skipped: 1
        }
    );
    assert_eq!(sim.cache().stats().total_accesses(), 2);
}

#[test]
fn abort_policy_reports_non_utf8_line_number() {
    let mut sim = simulator();
    let trace: &[u8] = b"R 0x0\nW 0x\xc3(\n";

    let err = sim.run(TraceReader::new(Cursor::new(trace))).unwrap_err();
    assert!(matches!(
        err,
        SimError::Trace(TraceError::InvalidEncoding { line: 2, .. })
    ));
}
