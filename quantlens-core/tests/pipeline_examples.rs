//! End-to-end scenarios over the default indicator set.

use chrono::NaiveDate;
use quantlens_core::domain::Bar;
use quantlens_core::{
    calculate_all_indicators, DegeneratePolicy, Diagnostic, EngineError, IndicatorConfig,
    IndicatorPipeline, PriceField,
};

fn bars_from_closes(closes: &[f64], spread: f64) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            Bar::new(
                base + chrono::Duration::days(i as i64),
                c,
                c + spread,
                c - spread,
                c,
                1_000.0 + i as f64,
            )
        })
        .collect()
}

#[test]
fn constant_closes_give_flat_bands() {
    let bars = bars_from_closes(&[100.0; 25], 0.0);
    let series = calculate_all_indicators(&bars).unwrap();

    assert_eq!(series.len(), 25);
    for name in ["MA5", "MA10", "MA20", "BB_Middle", "BB_Upper", "BB_Lower"] {
        let column = series.column(name).unwrap();
        assert!(column.iter().flatten().count() > 0, "{name} never defined");
        for v in column.iter().flatten() {
            assert_eq!(*v, 100.0, "{name}");
        }
    }
    for v in series.column("BB_Std").unwrap().iter().flatten() {
        assert_eq!(*v, 0.0);
    }
    assert!(series.column("MA60").unwrap().iter().all(Option::is_none));
    assert!(series.is_insufficient("MA"));
}

#[test]
fn constant_closes_resolve_oscillators_through_policy() {
    let bars = bars_from_closes(&[100.0; 25], 0.0);

    let neutral = calculate_all_indicators(&bars).unwrap();
    let rsi = neutral.column("RSI").unwrap();
    assert!(rsi[..14].iter().all(Option::is_none));
    assert!(rsi[14..].iter().all(|v| *v == Some(50.0)));
    for name in ["K", "D", "J"] {
        let column = neutral.column(name).unwrap();
        assert!(column[..8].iter().all(Option::is_none), "{name}");
        for v in &column[8..] {
            assert!((v.unwrap() - 50.0).abs() < 1e-9, "{name}: {v:?}");
        }
    }
    assert!(neutral.diagnostics().contains(&Diagnostic::DegenerateWindow {
        indicator: "RSI".into(),
        count: 11,
        policy: DegeneratePolicy::Neutral,
    }));
    assert!(neutral.diagnostics().contains(&Diagnostic::DegenerateWindow {
        indicator: "KDJ".into(),
        count: 17,
        policy: DegeneratePolicy::Neutral,
    }));

    let config = IndicatorConfig {
        degenerate_policy: DegeneratePolicy::Undefined,
        ..IndicatorConfig::default()
    };
    let undefined = IndicatorPipeline::from_config(&config)
        .unwrap()
        .run(&bars)
        .unwrap();
    for name in ["RSI", "K", "D", "J"] {
        assert!(
            undefined.column(name).unwrap().iter().all(Option::is_none),
            "{name} should have no values"
        );
    }
}

/// Closes swinging between roughly 3000 and 3840.
fn volatile_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let noise = ((i as u64).wrapping_mul(6364136223846793005).wrapping_add(1) >> 40) % 997;
            3420.0 + 300.0 * (i as f64 * 0.21).sin() + (noise as f64 - 498.0) * 0.2411
        })
        .collect()
}

#[test]
fn flat_stretch_after_volatile_history_is_exact() {
    // limit-locked contract: 25 identical closes after 500 volatile ones
    let mut closes = volatile_closes(500);
    closes.extend([3512.0; 25]);
    let bars = bars_from_closes(&closes, 0.0);
    let series = calculate_all_indicators(&bars).unwrap();
    let last = closes.len() - 1;

    for name in ["MA5", "MA10", "MA20", "BB_Middle", "BB_Upper", "BB_Lower"] {
        assert_eq!(series.column(name).unwrap()[last], Some(3512.0), "{name}");
    }
    assert_eq!(series.column("BB_Std").unwrap()[last], Some(0.0));
    assert_eq!(series.column("RSI").unwrap()[last], Some(50.0));
    assert_ne!(series.column("MA60").unwrap()[last], Some(3512.0));
}

#[test]
fn long_series_moving_averages_track_trailing_mean() {
    let n = 6000;
    let closes = volatile_closes(n);
    let mut bars = bars_from_closes(&closes, 2.0);
    for (i, bar) in bars.iter_mut().enumerate() {
        let noise = ((i as u64).wrapping_mul(2862933555777941757).wrapping_add(3037000493) >> 35)
            % 10_000;
        bar.volume = 1.0e8 + 4.0e7 * (i as f64 * 0.05).cos() + noise as f64 * 3_711.37;
    }
    let series = calculate_all_indicators(&bars).unwrap();

    let checks: [(&str, usize, fn(&Bar) -> f64); 4] = [
        ("Volume_MA5", 5, |b| b.volume),
        ("Volume_MA20", 20, |b| b.volume),
        ("MA5", 5, |b| b.close),
        ("MA60", 60, |b| b.close),
    ];
    for (name, period, field) in checks {
        let column = series.column(name).unwrap();
        for i in period - 1..n {
            let exact = bars[i + 1 - period..=i].iter().map(field).sum::<f64>() / period as f64;
            let got = column[i].unwrap();
            assert!(
                (got - exact).abs() <= 1e-12 * exact.abs(),
                "{name} at {i}: got {got}, expected {exact}"
            );
        }
    }
}

#[test]
fn rising_closes_push_macd_hist_positive() {
    let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
    let bars = bars_from_closes(&closes, 1.0);
    let series = calculate_all_indicators(&bars).unwrap();

    let hist = series.column("MACD_Hist").unwrap();
    assert_eq!(hist[0], Some(0.0));
    for (i, v) in hist.iter().enumerate().skip(1) {
        assert!(v.unwrap() > 0.0, "MACD_Hist at {i} = {v:?}");
    }
    let macd = series.column("MACD").unwrap();
    for i in 1..macd.len() {
        assert!(macd[i].unwrap() > macd[i - 1].unwrap());
    }
    // no losses at all: the loss-free limit is 100 and not a degenerate window
    assert!(series.column("RSI").unwrap()[14..]
        .iter()
        .all(|v| *v == Some(100.0)));
    assert!(!series
        .diagnostics()
        .iter()
        .any(|d| matches!(d, Diagnostic::DegenerateWindow { .. })));
}

#[test]
fn short_series_reports_each_starved_group() {
    let bars = bars_from_closes(&[10.0, 11.0, 12.0, 11.0, 13.0], 0.5);
    let series = calculate_all_indicators(&bars).unwrap();

    assert!((series.column("MA5").unwrap()[4].unwrap() - 11.4).abs() < 1e-10);
    assert!(series.column("MA10").unwrap().iter().all(Option::is_none));
    assert!(series.column("Volume_MA5").unwrap()[4].is_some());
    assert!(!series.is_insufficient("MACD"));
    for group in ["MA", "RSI", "Bollinger", "KDJ", "Volume_MA"] {
        assert!(series.is_insufficient(group), "{group}");
    }
}

#[test]
fn tail_keeps_latest_rows() {
    let closes: Vec<f64> = (0..80).map(|i| 50.0 + (i as f64 * 0.3).sin() * 5.0).collect();
    let bars = bars_from_closes(&closes, 1.0);
    let series = calculate_all_indicators(&bars).unwrap();
    let last = series.tail(5);

    assert_eq!(last.len(), 5);
    assert_eq!(last.bars(), &bars[75..]);
    for row in last.rows() {
        for (name, value) in &row.indicators {
            assert!(value.is_some(), "{name} undefined after warm-up");
        }
    }
    assert_eq!(
        last.column("MA60").unwrap(),
        &series.column("MA60").unwrap()[75..]
    );
}

#[test]
fn non_finite_input_is_rejected() {
    let mut bars = bars_from_closes(&[1.0, 2.0, 3.0], 0.1);
    bars[1].high = f64::INFINITY;
    let err = calculate_all_indicators(&bars).unwrap_err();
    assert!(err.is_malformed_input());
    assert!(matches!(
        err,
        EngineError::NonFiniteField {
            row: 1,
            field: PriceField::High,
            ..
        }
    ));
}
