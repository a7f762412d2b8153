use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use radscope::config::AnalysisConfig;
use radscope::data::loader;
use radscope::data::model::{Measurement, MeasurementSelection};
use radscope::error::{AnalysisError, LoadError};
use radscope::processing::metrics;
use radscope::processing::selection::{reduce, BrushRegion, SelectedPoint};
use radscope::processing::spike::extract_spike;

fn noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 1, 6)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid start")
}

/// One reading a minute for 24 hours, with a ten-minute spike from 20:01.
fn day_log() -> String {
    let mut csv = String::from("index,datetime,mG,V/m,mW/m2,microW/m2,source\n");
    for i in 0..1440 {
        let ts = noon() + TimeDelta::minutes(i);
        let in_spike = ts.hour() == 20 && (1..=10).contains(&ts.minute());
        let (pd, source) = if in_spike {
            (490.0 + ts.minute() as f64, "phone")
        } else if i % 2 == 0 {
            (9.0, "ambient")
        } else {
            (11.0, "ambient")
        };
        csv.push_str(&format!(
            "{i},{},0.5,1.2,{:.4},{pd},{source}\n",
            ts.format("%Y-%m-%d %H:%M:%S"),
            pd / 1000.0
        ));
    }
    csv
}

#[test]
fn load_compute_extract_reduce() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bedroom.csv");
    std::fs::write(&path, day_log()).expect("write log");

    let dataset = loader::load_file(&path).expect("load log");
    assert_eq!(dataset.len(), 1440);

    let config = AnalysisConfig::default();
    let selection = MeasurementSelection::new(Measurement::PowerDensity);
    let m = metrics::compute(&dataset, &selection, &config).expect("metrics");

    assert_eq!(m.outliers.len(), 10);
    assert!(m.outliers.iter().all(|s| s.value > m.threshold));
    assert_eq!(m.inliers.len() + m.outliers.len(), dataset.len());
    assert_eq!(m.outlier_flags.iter().filter(|&&f| f).count(), 10);

    // 23:00 to 05:40 the next day, both ends excluded.
    assert_eq!(m.sleep.len(), 399);
    assert_eq!(m.awake.len(), m.inliers.len() - 399);

    let hourly = m.rolling(60).expect("60 sample window");
    assert_eq!(hourly.values.iter().flatten().count(), m.inliers.len() - 59);
    for v in hourly.values.iter().flatten() {
        assert!((9.0..=11.0).contains(v));
    }

    let spike = extract_spike(&m.outliers, m.spike_cutoff, config.spline_samples).expect("spike");
    assert_eq!(spike.samples.len(), 10);
    assert_eq!(spike.curve.len(), 300);
    assert_eq!(spike.curve[0], [0.0, 491.0]);
    assert_eq!(spike.curve[299], [9.0, 500.0]);
    assert_eq!(spike.start().map(|t| t.minute()), Some(1));

    let points: Vec<[f64; 2]> = spike.samples.iter().map(|s| [s.x(), s.value]).collect();
    let selected = BrushRegion::from_corners([points[0][0], 0.0], [points[3][0], 1000.0]).select(&points);
    assert_eq!(selected.len(), 4);
    assert_eq!(reduce(Some(&selected[..])), 492.5);
    assert_eq!(reduce::<SelectedPoint>(None), 0.0);
}

#[test]
fn quiet_day_has_no_spike_chart() {
    let rows = loader::read_csv_rows(
        b"datetime,mG,V/m,microW/m2,source\n\
          2023-01-06 20:00:00,0.5,1.0,10,ambient\n\
          2023-01-06 20:00:01,0.5,1.0,10,ambient\n\
          2023-01-06 20:00:02,0.5,1.0,10,ambient\n",
    )
    .expect("rows");
    let dataset = loader::parse_rows(&rows).expect("dataset");
    let config = AnalysisConfig::default();
    let m = metrics::compute_column(&dataset, "power_density", &config).expect("metrics");

    assert_eq!(m.std_dev, 0.0);
    assert!(m.outliers.is_empty());
    assert_eq!(
        extract_spike(&m.outliers, m.spike_cutoff, config.spline_samples),
        Err(AnalysisError::InsufficientPoints { found: 0, required: 4 })
    );
}

#[test]
fn unknown_column_and_missing_schema() {
    let rows = loader::read_csv_rows(b"datetime,mG,V/m,microW/m2,source\n2023-01-06 20:00:00,1,1,1,a\n")
        .expect("rows");
    let dataset = loader::parse_rows(&rows).expect("dataset");
    assert_eq!(
        metrics::compute_column(&dataset, "source", &AnalysisConfig::default()).unwrap_err(),
        AnalysisError::InvalidColumn("source".into())
    );

    let rows = loader::read_csv_rows(b"datetime,V/m\n2023-01-06 20:00:00,1\n").expect("rows");
    match loader::parse_rows(&rows) {
        Err(LoadError::SchemaMismatch { missing }) => {
            assert!(missing.contains(&"magnetic_field".to_string()));
            assert!(missing.contains(&"power_density".to_string()));
            assert!(missing.contains(&"source".to_string()));
        }
        other => panic!("expected schema mismatch, got {other:?}"),
    }
}
