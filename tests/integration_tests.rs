use std::io::Write;

use chrono::NaiveDateTime;
use namakanui_templog::{
    DEFAULT_HIST_BINS, LogReader, NullRenderer, PLL_ALARM_KELVIN, PlotOptions, SvgRenderer,
    TempLogError, parse_timestamp,
};
use tempfile::NamedTempFile;

fn ts(value: &str) -> NaiveDateTime {
    parse_timestamp(value).expect("valid test timestamp")
}

/// One full 18-field data line with the given PLL readings; the remaining
/// channels carry plausible fixed values.
fn row(stamp: &str, b3_pll: f64, b6_pll: f64, b7_pll: f64) -> String {
    format!(
        "{stamp} {b3_pll} 110.0 1.0 15.0 290.0 {b6_pll} 4.2 111.0 0.0 15.5 1.0 {b7_pll} 4.0 112.0 0.0 15.2 1.0"
    )
}

/// Write a log with a comment header and the bare-timestamp trailer the
/// instrument leaves while the file is open for append.
fn write_log(rows: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp log");
    writeln!(file, "# namakanui temperature log").expect("write header");
    for line in rows {
        writeln!(file, "{line}").expect("write row");
    }
    writeln!(file, "2019-10-12T00:00:00").expect("write trailer");
    file
}

#[test]
fn test_load_drops_trailer() {
    let file = write_log(&[
        row("2019-10-11T06:10:00", 300.0, 318.0, 305.0),
        row("2019-10-11T06:11:00", 301.0, 317.0, 306.0),
        row("2019-10-11T06:12:00", 302.0, 316.0, 307.0),
    ]);

    let log = LogReader::open(file.path()).expect("load log");
    assert_eq!(log.len(), 3);
    assert!(!log.is_empty());
    assert_eq!(
        log.time_span(),
        Some((ts("2019-10-11T06:10:00"), ts("2019-10-11T06:12:00")))
    );
}

#[test]
fn test_min_max_reported_in_celsius() {
    let file = write_log(&[
        row("2019-10-11T06:10:00", 300.0, 315.0, 305.0),
        row("2019-10-11T06:11:00", 301.0, 318.0, 306.0),
        row("2019-10-11T06:12:00", 302.0, 316.5, 307.0),
    ]);
    let log = LogReader::open(file.path()).expect("load log");

    let (min_c, max_c) = log
        .pll_temperature_range(
            "b6_pll",
            ts("2019-10-11T06:00:00"),
            ts("2019-10-11T07:00:00"),
            None,
        )
        .expect("summary over non-empty window");

    assert!((min_c - (315.0 - 273.15)).abs() < 1e-9);
    assert!((max_c - (318.0 - 273.15)).abs() < 1e-9);
}

#[test]
fn test_range_bounds_are_strictly_exclusive() {
    let file = write_log(&[row("2019-10-11T06:10:00", 300.0, 318.0, 305.0)]);
    let log = LogReader::open(file.path()).expect("load log");

    // Row strictly inside the window is selected.
    let (min_c, max_c) = log
        .pll_temperature_range(
            "b6_pll",
            ts("2019-10-11T06:09:00"),
            ts("2019-10-11T06:11:00"),
            None,
        )
        .expect("row inside window");
    assert!((min_c - (318.0 - 273.15)).abs() < 1e-9);
    assert!((max_c - min_c).abs() < 1e-9);

    // Row exactly at the start bound is excluded.
    let at_start = log.pll_temperature_range(
        "b6_pll",
        ts("2019-10-11T06:10:00"),
        ts("2019-10-11T06:11:00"),
        None,
    );
    assert!(matches!(at_start, Err(TempLogError::EmptySelection { .. })));

    // Row exactly at the end bound is excluded.
    let at_end = log.pll_temperature_range(
        "b6_pll",
        ts("2019-10-11T06:09:00"),
        ts("2019-10-11T06:10:00"),
        None,
    );
    assert!(matches!(at_end, Err(TempLogError::EmptySelection { .. })));
}

#[test]
fn test_unknown_sensor_rejected_regardless_of_window() {
    let file = write_log(&[row("2019-10-11T06:10:00", 300.0, 318.0, 305.0)]);
    let log = LogReader::open(file.path()).expect("load log");

    for (start, end) in [
        (ts("2019-10-11T06:00:00"), ts("2019-10-11T07:00:00")),
        (ts("2030-01-01T00:00:00"), ts("2030-01-02T00:00:00")),
    ] {
        let result = log.pll_temperature_range("x", start, end, None);
        match result {
            Err(TempLogError::UnknownSensor(name)) => assert_eq!(name, "x"),
            other => panic!("expected UnknownSensor, got {other:?}"),
        }
    }

    // A temperature column that is not a PLL sensor is rejected too.
    let result = log.pll_temperature_range(
        "b6_4k",
        ts("2019-10-11T06:00:00"),
        ts("2019-10-11T07:00:00"),
        None,
    );
    assert!(matches!(result, Err(TempLogError::UnknownSensor(_))));
}

#[test]
fn test_each_sensor_reads_its_own_column() {
    let file = write_log(&[
        row("2019-10-11T06:10:00", 300.0, 310.0, 320.0),
        row("2019-10-11T06:11:00", 301.0, 311.0, 321.0),
    ]);
    let log = LogReader::open(file.path()).expect("load log");
    let start = ts("2019-10-11T06:00:00");
    let end = ts("2019-10-11T07:00:00");

    for (sensor, expected_min_k, expected_max_k) in [
        ("b3_pll", 300.0, 301.0),
        ("b6_pll", 310.0, 311.0),
        ("b7_pll", 320.0, 321.0),
    ] {
        let (min_c, max_c) = log
            .pll_temperature_range(sensor, start, end, None)
            .unwrap_or_else(|e| panic!("summary for {sensor} failed: {e}"));
        assert!((min_c - (expected_min_k - 273.15)).abs() < 1e-9, "{sensor}");
        assert!((max_c - (expected_max_k - 273.15)).abs() < 1e-9, "{sensor}");
    }
}

#[test]
fn test_single_matching_row_min_equals_max() {
    let file = write_log(&[row("2019-10-11T06:10:00", 300.0, 291.4, 305.0)]);
    let log = LogReader::open(file.path()).expect("load log");

    let (min_c, max_c) = log
        .pll_temperature_range(
            "b6_pll",
            ts("2019-10-11T06:09:00"),
            ts("2019-10-11T06:11:00"),
            None,
        )
        .expect("single-row window");
    assert_eq!(min_c, max_c);
    assert!((min_c - (291.4 - 273.15)).abs() < 1e-9);
}

#[test]
fn test_histogram_bucket_count_and_sum() {
    // Ten rows, one per minute from 06:00 to 06:09.
    let rows: Vec<String> = (0..10)
        .map(|minute| row(&format!("2019-10-11T06:0{minute}:00"), 300.0, 315.0, 305.0))
        .collect();
    let file = write_log(&rows);
    let log = LogReader::open(file.path()).expect("load log");

    let mut renderer = NullRenderer::new();
    let histogram = log
        .timestamp_histogram(
            ts("2019-10-11T05:59:00"),
            ts("2019-10-11T06:10:00"),
            4,
            &mut renderer,
        )
        .expect("histogram over non-empty window");

    assert_eq!(histogram.bins(), 4);
    assert_eq!(histogram.edges.len(), 5);
    assert_eq!(histogram.total(), 10);
    // Buckets span the selected data, not the query window.
    assert_eq!(histogram.edges[0], ts("2019-10-11T06:00:00"));
    assert_eq!(histogram.edges[4], ts("2019-10-11T06:09:00"));
    assert!(histogram.edges.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(renderer.histograms.len(), 1);
}

#[test]
fn test_histogram_uses_same_exclusive_bounds() {
    let rows: Vec<String> = (0..10)
        .map(|minute| row(&format!("2019-10-11T06:0{minute}:00"), 300.0, 315.0, 305.0))
        .collect();
    let file = write_log(&rows);
    let log = LogReader::open(file.path()).expect("load log");

    // Window starting exactly on the first stamp drops that row.
    let mut renderer = NullRenderer::new();
    let histogram = log
        .timestamp_histogram(
            ts("2019-10-11T06:00:00"),
            ts("2019-10-11T06:10:00"),
            4,
            &mut renderer,
        )
        .expect("histogram");
    assert_eq!(histogram.total(), 9);
}

#[test]
fn test_null_renderer_captures_raw_kelvin_series() {
    let file = write_log(&[row("2019-10-11T06:10:00", 300.0, 318.0, 305.0)]);
    let log = LogReader::open(file.path()).expect("load log");
    let start = ts("2019-10-11T06:09:00");
    let end = ts("2019-10-11T06:11:00");

    let mut renderer = NullRenderer::new();
    let (min_c, _) = log
        .pll_temperature_range("b6_pll", start, end, Some(&mut renderer))
        .expect("summary with renderer");

    assert_eq!(renderer.scatter.len(), 1);
    let series = &renderer.scatter[0];
    assert_eq!(series.label, "b6_pll");
    assert_eq!(series.window, (start, end));
    assert_eq!(series.reference_line, Some(PLL_ALARM_KELVIN));
    // The plotted values stay in kelvin; only the summary is Celsius.
    assert_eq!(series.points, vec![(ts("2019-10-11T06:10:00"), 318.0)]);
    assert!((min_c - (318.0 - 273.15)).abs() < 1e-9);
}

#[test]
fn test_histogram_result_serde_round_trip() {
    let rows: Vec<String> = (0..6)
        .map(|minute| row(&format!("2019-10-11T06:0{minute}:00"), 300.0, 315.0, 305.0))
        .collect();
    let file = write_log(&rows);
    let log = LogReader::open(file.path()).expect("load log");

    let mut renderer = NullRenderer::new();
    let histogram = log
        .timestamp_histogram(
            ts("2019-10-11T05:00:00"),
            ts("2019-10-11T07:00:00"),
            3,
            &mut renderer,
        )
        .expect("histogram");

    let json = serde_json::to_string(&histogram).expect("serialize histogram");
    let back: namakanui_templog::HistogramResult =
        serde_json::from_str(&json).expect("deserialize histogram");
    assert_eq!(back, histogram);
}

#[test]
fn test_svg_renderer_writes_figure() {
    let _ = env_logger::builder().is_test(true).try_init();

    let rows: Vec<String> = (0..10)
        .map(|minute| row(&format!("2019-10-11T06:0{minute}:00"), 300.0, 315.0, 305.0))
        .collect();
    let file = write_log(&rows);
    let log = LogReader::open(file.path()).expect("load log");
    let start = ts("2019-10-11T05:59:00");
    let end = ts("2019-10-11T06:10:00");

    let dir = tempfile::tempdir().expect("create temp dir");
    let figure_path = dir.path().join("b6_pll.svg");
    let mut figure = SvgRenderer::new(&figure_path, PlotOptions::default().with_caption("b6 PLL"));

    log.pll_temperature_range("b6_pll", start, end, Some(&mut figure))
        .expect("summary with renderer");
    log.timestamp_histogram(start, end, DEFAULT_HIST_BINS, &mut figure)
        .expect("histogram with renderer");
    figure.save().expect("draw figure");

    let svg = std::fs::read_to_string(&figure_path).expect("read figure");
    assert!(svg.contains("<svg"));
}

#[test]
fn test_one_day_window_anchored_to_now() {
    let now = chrono::Local::now().naive_local();
    let fmt = |stamp: NaiveDateTime| stamp.format("%Y-%m-%dT%H:%M:%S").to_string();
    let file = write_log(&[
        row(&fmt(now - chrono::Duration::hours(2)), 300.0, 312.0, 305.0),
        row(&fmt(now - chrono::Duration::hours(1)), 301.0, 314.0, 306.0),
    ]);
    let log = LogReader::open(file.path()).expect("load log");

    let (min_c, max_c) = log
        .pll_temperature_range_1day("b6_pll", None)
        .expect("rows within the last day");
    assert!((min_c - (312.0 - 273.15)).abs() < 1e-9);
    assert!((max_c - (314.0 - 273.15)).abs() < 1e-9);

    let mut renderer = NullRenderer::new();
    let histogram = log
        .timestamp_histogram_1day(DEFAULT_HIST_BINS, &mut renderer)
        .expect("one-day histogram");
    assert_eq!(histogram.bins(), DEFAULT_HIST_BINS);
    assert_eq!(histogram.total(), 2);
}
