//! Integration tests: round-trip forecast frames through the long CSV layout.

use chrono::NaiveDate;
use hermes_io::{ForecastFrame, IoError, read_forecast_csv, write_forecast_csv};
use ndarray::array;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

fn test_dates() -> Vec<NaiveDate> {
    vec![date("2016-04-25"), date("2016-04-26")]
}

fn test_ids() -> Vec<String> {
    vec![
        "total".to_string(),
        "CA".to_string(),
        "CA/CA_1".to_string(),
    ]
}

fn sample_frame(seed: u64, offset: f64) -> ForecastFrame {
    let mut frame = ForecastFrame::new(test_ids(), test_dates())
        .expect("valid grid")
        .with_seed(seed);
    frame
        .push_column(
            "base",
            array![
                [10.0 + offset, 11.0 + offset],
                [6.0 + offset, 6.5 + offset],
                [4.0 + offset, 4.5 + offset]
            ],
        )
        .expect("push base");
    frame
        .push_column(
            "base-lo-90",
            array![
                [8.0 + offset, 8.5 + offset],
                [4.0 + offset, 4.25 + offset],
                [2.0 + offset, 2.25 + offset]
            ],
        )
        .expect("push lo band");
    frame
        .push_column(
            "bottom_up",
            array![
                [10.0, 11.0],
                [6.0, 6.5],
                [f64::NAN, 4.5]
            ],
        )
        .expect("push bottom_up");
    frame
}

#[test]
fn round_trip_two_seeds() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("item_a.csv");

    let frames = [sample_frame(1, 0.0), sample_frame(2, 0.5)];
    write_forecast_csv(&path, &frames).expect("write succeeds");

    let back = read_forecast_csv(&path).expect("read succeeds");
    assert_eq!(back.len(), 2);

    for (original, restored) in frames.iter().zip(&back) {
        assert_eq!(restored.seed(), original.seed());
        assert_eq!(restored.ids(), original.ids());
        assert_eq!(restored.dates(), original.dates());
        assert_eq!(
            restored.column_names().collect::<Vec<_>>(),
            original.column_names().collect::<Vec<_>>()
        );
        for (name, matrix) in original.columns() {
            let restored_matrix = restored.column(name).expect("column present");
            for (a, b) in matrix.iter().zip(restored_matrix.iter()) {
                if a.is_nan() {
                    assert!(b.is_nan(), "NaN cell not preserved in '{name}'");
                } else {
                    assert_eq!(a, b, "cell mismatch in '{name}'");
                }
            }
        }
    }
}

#[test]
fn round_trip_without_seed() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("plain.csv");

    let mut frame = ForecastFrame::new(test_ids(), test_dates()).expect("valid grid");
    frame
        .push_column("base", array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]])
        .expect("push base");

    write_forecast_csv(&path, std::slice::from_ref(&frame)).expect("write succeeds");
    let back = read_forecast_csv(&path).expect("read succeeds");

    assert_eq!(back.len(), 1);
    assert_eq!(back[0].seed(), None);
    assert_eq!(back[0].column("base").unwrap()[[2, 1]], 6.0);
}

#[test]
fn write_rejects_empty_frame_set() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("empty.csv");

    let err = write_forecast_csv(&path, &[]).unwrap_err();
    assert!(matches!(err, IoError::Validation { .. }));
}

#[test]
fn write_rejects_disagreeing_frames() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("mixed.csv");

    let a = sample_frame(1, 0.0);
    let mut b = ForecastFrame::new(test_ids(), test_dates())
        .expect("valid grid")
        .with_seed(2);
    b.push_column("base", array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]])
        .expect("push base");

    let err = write_forecast_csv(&path, &[a, b]).unwrap_err();
    match err {
        IoError::Validation { details, .. } => {
            assert!(details.contains("column names differ"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn read_missing_file() {
    let err = read_forecast_csv(std::path::Path::new("/nonexistent/fc.csv")).unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }));
}

#[test]
fn read_rejects_wrong_leading_columns() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "unique_id,ds,base\na,2016-01-01,1.0\n").expect("write test csv");

    let err = read_forecast_csv(&path).unwrap_err();
    match err {
        IoError::Validation { details, .. } => {
            assert!(details.contains("seed,unique_id,ds"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn read_rejects_incomplete_grid() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("partial.csv");
    std::fs::write(
        &path,
        "seed,unique_id,ds,base\n\
         1,a,2016-01-01,1.0\n\
         1,a,2016-01-02,2.0\n\
         1,b,2016-01-01,3.0\n",
    )
    .expect("write test csv");

    let err = read_forecast_csv(&path).unwrap_err();
    match err {
        IoError::Validation { details, .. } => {
            assert!(details.contains("expected 4 rows"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn read_rejects_duplicate_cell() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("dup.csv");
    std::fs::write(
        &path,
        "seed,unique_id,ds,base\n\
         1,a,2016-01-01,1.0\n\
         1,a,2016-01-01,2.0\n\
         1,b,2016-01-01,3.0\n\
         1,b,2016-01-02,4.0\n",
    )
    .expect("write test csv");

    let err = read_forecast_csv(&path).unwrap_err();
    match err {
        IoError::Validation { details, .. } => {
            assert!(details.contains("duplicate row"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn read_restores_sorted_dates_from_shuffled_rows() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("shuffled.csv");
    std::fs::write(
        &path,
        "seed,unique_id,ds,base\n\
         7,a,2016-01-02,2.0\n\
         7,a,2016-01-01,1.0\n",
    )
    .expect("write test csv");

    let frames = read_forecast_csv(&path).expect("read succeeds");
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].seed(), Some(7));
    assert_eq!(
        frames[0].dates(),
        &[date("2016-01-01"), date("2016-01-02")]
    );
    assert_eq!(frames[0].column("base").unwrap()[[0, 0]], 1.0);
    assert_eq!(frames[0].column("base").unwrap()[[0, 1]], 2.0);
}
