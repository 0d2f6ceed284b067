use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::Parser;
use libstress::equation::Coordinate;
use serial_test::serial;
use tempfile::{tempdir, TempDir};

use crate::{
    benchmark::{
        benchmark,
        error::BenchError,
        records::{TimingRecord, TrialReport},
        replicator::FileReplicator,
        strategy::{Strategy, Workload},
    },
    command_parser::{strategy_target::StrategyTarget, App},
};

const INPUT_NAME: &str = "gpl.txt";

fn workspace(input_len: usize) -> TempDir {
    let dir = tempdir().unwrap();
    let content = (0..input_len)
        .map(|i| b'a' + (i % 26) as u8)
        .collect::<Vec<_>>();
    fs::write(dir.path().join(INPUT_NAME), content).unwrap();
    dir
}

fn app(dir: &Path, args: &[&str]) -> App {
    let mut argv = vec!["threadstress".to_owned()];
    argv.extend(args.iter().map(|arg| arg.to_string()));
    argv.extend([
        "--input".to_owned(),
        dir.join(INPUT_NAME).display().to_string(),
        "--output-path".to_owned(),
        output_dir(dir).display().to_string(),
        "--quiet".to_owned(),
    ]);
    App::parse_from(argv)
}

fn output_dir(dir: &Path) -> PathBuf {
    dir.join("output")
}

fn run(dir: &Path, args: &[&str]) -> Result<Vec<(StrategyTarget, Vec<TrialReport>)>, BenchError> {
    let app = app(dir, args);
    benchmark(app.strategy, &app.global_opts)
}

fn run_one(dir: &Path, args: &[&str]) -> Vec<TrialReport> {
    let mut results = run(dir, args).unwrap();
    assert_eq!(results.len(), 1);
    results.remove(0).1
}

fn read_log(dir: &Path, target: StrategyTarget) -> Vec<TimingRecord> {
    let path = output_dir(dir).join(format!("{}.csv", target));
    let mut reader = csv::Reader::from_path(path).unwrap();

    let headers = reader.headers().unwrap().iter().collect::<Vec<_>>();
    assert_eq!(headers, TimingRecord::HEADER);

    reader
        .deserialize()
        .collect::<Result<Vec<TimingRecord>, _>>()
        .unwrap()
}

fn assert_timing_invariants(record: &TimingRecord) {
    assert!(record.iteration_time <= record.elapsed_time);
    for phase in record.phases() {
        assert!(phase <= record.iteration_time);
    }
}

const SMALL: &[&str] = &[
    "--trials",
    "1",
    "--increments",
    "100000",
    "--points",
    "5000",
    "--copies",
    "3",
    "--fanout",
    "10",
];

#[test]
#[serial]
pub fn log_holds_one_record_per_trial() {
    let dir = workspace(64);

    let reports = run_one(
        dir.path(),
        &[
            "serial",
            "--trials",
            "4",
            "--increments",
            "1000",
            "--points",
            "100",
            "--copies",
            "2",
        ],
    );
    let records = read_log(dir.path(), StrategyTarget::Serial);

    assert_eq!(reports.len(), 4);
    assert_eq!(records.len(), 4);

    for (trial, record) in records.iter().enumerate() {
        assert_timing_invariants(record);
        assert!(output_dir(dir.path())
            .join("serial")
            .join(format!("outfiles{}", trial))
            .is_dir());
    }

    // elapsed time is cumulative over the run
    assert!(records
        .windows(2)
        .all(|pair| pair[0].elapsed_time <= pair[1].elapsed_time));
}

#[test]
#[serial]
pub fn every_strategy_reaches_expected_counter() {
    let dir = workspace(64);
    let app = app(dir.path(), SMALL);
    let workload = app.global_opts.workload();

    let results = benchmark(None, &app.global_opts).unwrap();
    assert_eq!(results.len(), 3);

    for (target, reports) in results {
        let strategy = target.to_strategy(&app.global_opts);
        let workers = strategy.counter_workers(&workload);

        assert_eq!(reports.len(), 1);
        assert_eq!(
            reports[0].counter,
            workload.expected_counter(workers),
            "{} ended with a wrong counter",
            target
        );
        assert_eq!(reports[0].counter, 100000);
        assert_eq!(read_log(dir.path(), target).len(), 1);
    }
}

#[test]
#[serial]
pub fn strategies_agree_bit_for_bit_on_coordinates() {
    let dir = workspace(64);

    let results = run(dir.path(), SMALL).unwrap();

    let mut expected = Coordinate::origin(5000);
    for i in 0..5000 {
        expected.step(i);
    }

    for (target, reports) in results.iter() {
        assert!(
            reports[0].coordinate.bit_eq(&expected),
            "{} diverged: {:?} != {:?}",
            target,
            reports[0].coordinate,
            expected
        );
    }
}

#[test]
#[serial]
pub fn reruns_reproduce_non_timing_fields() {
    let args = [["thread-per-unit"].as_slice(), SMALL].concat();

    let first_dir = workspace(64);
    let first = run_one(first_dir.path(), &args);

    let second_dir = workspace(64);
    let second = run_one(second_dir.path(), &args);

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert!(first[0].same_outcome(&second[0]));
}

#[test]
#[serial]
pub fn thread_per_unit_full_scenario() {
    let dir = workspace(500);

    let reports = run_one(
        dir.path(),
        &[
            "thread-per-unit",
            "--trials",
            "1",
            "--increments",
            "100000000",
            "--points",
            "200000",
            "--copies",
            "100",
            "--fanout",
            "100",
        ],
    );
    let records = read_log(dir.path(), StrategyTarget::ThreadPerUnit);

    assert_eq!(records.len(), 1);
    let record = records[0];

    assert_timing_invariants(&record);
    assert!(record.elapsed_time - record.iteration_time < Duration::from_secs(1));
    assert!(record.counter_time > Duration::ZERO);
    assert!(record.equation_time > Duration::ZERO);
    assert!(record.file_time > Duration::ZERO);

    assert_eq!(reports[0].counter, 100_000_000);

    let input = fs::read(dir.path().join(INPUT_NAME)).unwrap();
    let trial_dir = output_dir(dir.path()).join("thread-per-unit").join("outfiles0");
    let copies = fs::read_dir(&trial_dir).unwrap().count();
    assert_eq!(copies, 100);

    for i in 0..100 {
        let copy = fs::read(trial_dir.join(format!("gpl.{}.txt", i))).unwrap();
        assert_eq!(copy, input);
    }
}

#[test]
#[serial]
pub fn zero_increments_leave_counter_untouched() {
    let dir = workspace(64);

    let results = run(
        dir.path(),
        &["--increments", "0", "--points", "10", "--copies", "1", "--trials", "1"],
    )
    .unwrap();

    for (target, reports) in results {
        assert_eq!(reports[0].counter, 0, "{}", target);
        assert!(reports[0].timing.counter_time < Duration::from_millis(200));
    }
}

#[test]
#[serial]
pub fn uneven_split_drops_the_remainder() {
    let dir = workspace(16);
    let app = app(
        dir.path(),
        &[
            "thread-per-unit",
            "--trials",
            "1",
            "--increments",
            "10",
            "--fanout",
            "3",
            "--points",
            "10",
            "--copies",
            "1",
        ],
    );
    let workload = app.global_opts.workload();

    let reports = benchmark(app.strategy, &app.global_opts).unwrap().remove(0).1;

    assert_eq!(workload.per_worker(3), 3);
    assert_eq!(workload.expected_counter(3), 9);
    assert_eq!(reports[0].counter, 9);
}

#[test]
#[serial]
pub fn missing_input_aborts_without_record() {
    let dir = tempdir().unwrap();

    let err = run(
        dir.path(),
        &["bulk-parallel", "--trials", "3", "--increments", "10", "--points", "10"],
    )
    .unwrap_err();

    assert!(matches!(err, BenchError::OpenInput { .. }), "{:?}", err);
    assert!(read_log(dir.path(), StrategyTarget::BulkParallel).is_empty());
}

#[test]
pub fn zero_fanout_is_rejected() {
    let dir = workspace(8);

    let err = run(dir.path(), &["thread-per-unit", "--fanout", "0"]).unwrap_err();

    assert!(matches!(err, BenchError::Config(_)), "{:?}", err);
}

#[test]
pub fn cli_defaults() {
    let app = App::parse_from(["threadstress"]);
    let opts = &app.global_opts;

    assert!(app.strategy.is_none());
    assert_eq!(opts.trials, 100);
    assert_eq!(opts.increments, 100_000_000);
    assert_eq!(opts.points, 200_000);
    assert_eq!(opts.copies, 100);
    assert_eq!(opts.fanout, 100);
    assert_eq!((opts.add, opts.sub), (37, 36));
    assert_eq!(opts.input, PathBuf::from("gpl.txt"));
    assert_eq!(opts.prefix, "outfiles");
    assert_eq!(opts.workload(), Workload::default());

    let app = App::parse_from(["threadstress", "thread-per-unit", "--fanout", "8", "-q"]);
    assert_eq!(app.strategy, Some(StrategyTarget::ThreadPerUnit));
    assert_eq!(app.global_opts.fanout, 8);
    assert!(app.global_opts.quiet);
}

#[test]
pub fn copy_names_keep_the_extension() {
    let clock = libstress::clock::PhaseClock::new();

    let replicator = FileReplicator::new("data/gpl.txt", 2, clock.clone());
    assert_eq!(replicator.copy_name(7), "gpl.7.txt");

    let replicator = FileReplicator::new("LICENSE", 2, clock);
    assert_eq!(replicator.copy_name(0), "LICENSE.0");
}
