//! Look-ahead contamination tests for all six indicator groups.
//!
//! Invariant: no indicator value at bar t may depend on price data from bar
//! t+1 or later.
//!
//! Method: compute on truncated series (bars 0..100) and full series (bars 0..200).
//! Assert bars 0..100 are identical between both runs. Any difference means the
//! indicator is leaking future data into past values.

use chrono::NaiveDate;
use quantlens_core::domain::Bar;
use quantlens_core::indicator::Indicator;
use quantlens_core::indicators::*;
use quantlens_core::IndicatorPipeline;

/// Generate N bars of synthetic OHLCV data with realistic variation.
fn make_test_bars(n: usize) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        // Deterministic pseudo-random walk using a simple LCG
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05; // -5.0 to +5.0
        price += change;
        price = price.max(10.0); // floor at 10

        let open = price - 0.5;
        let close = price + 0.3;
        let high = open.max(close) + 2.0;
        let low = open.min(close) - 2.0;

        bars.push(Bar::new(
            base + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            1000.0 + (i as f64 * 100.0),
        ));
    }

    bars
}

/// Assert that every column of the group produces identical values for bars
/// 0..truncated_len whether computed on a truncated or full series.
fn assert_no_lookahead(indicator: &dyn Indicator, full_bars: &[Bar], truncated_len: usize) {
    let truncated = &full_bars[..truncated_len];
    let full_result = indicator.compute(full_bars);
    let truncated_result = indicator.compute(truncated);

    for (t_col, f_col) in truncated_result.columns.iter().zip(&full_result.columns) {
        assert_eq!(t_col.name, f_col.name);
        assert_eq!(
            t_col.values.len(),
            truncated_len,
            "{}: truncated result length mismatch",
            t_col.name
        );
        assert_eq!(
            f_col.values.len(),
            full_bars.len(),
            "{}: full result length mismatch",
            f_col.name
        );

        for i in 0..truncated_len {
            match (t_col.values[i], f_col.values[i]) {
                (None, None) => {}
                (Some(t), Some(f)) => assert!(
                    (t - f).abs() < 1e-10,
                    "{}: look-ahead contamination at bar {i}: truncated={t}, full={f}",
                    t_col.name
                ),
                (t, f) => panic!(
                    "{}: definedness mismatch at bar {i} (truncated={t:?}, full={f:?})",
                    t_col.name
                ),
            }
        }
    }
}

#[test]
fn lookahead_moving_average() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&MovingAverage::close(&[5, 10, 20, 60]).unwrap(), &bars, 100);
    assert_no_lookahead(&MovingAverage::volume(&[5, 10, 20]).unwrap(), &bars, 100);
}

#[test]
fn lookahead_macd() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Macd::default(), &bars, 100);
    assert_no_lookahead(&Macd::new(5, 35, 5).unwrap(), &bars, 100);
}

#[test]
fn lookahead_rsi() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Rsi::default(), &bars, 100);
    assert_no_lookahead(&Rsi::new(7, DegeneratePolicy::Undefined).unwrap(), &bars, 100);
}

#[test]
fn lookahead_bollinger() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Bollinger::default(), &bars, 100);
    assert_no_lookahead(&Bollinger::new(10, 1.5).unwrap(), &bars, 100);
}

#[test]
fn lookahead_kdj() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Kdj::default(), &bars, 100);
    assert_no_lookahead(&Kdj::new(14, 5, 2, DegeneratePolicy::Neutral).unwrap(), &bars, 100);
}

#[test]
fn lookahead_full_pipeline() {
    let bars = make_test_bars(200);
    let pipeline = IndicatorPipeline::default();
    let full = pipeline.run(&bars).unwrap();
    let truncated = pipeline.run(&bars[..100]).unwrap();
    for column in truncated.values().columns() {
        let full_col = full.column(&column.name).unwrap();
        assert_eq!(&full_col[..100], column.values.as_slice(), "{}", column.name);
    }
}
