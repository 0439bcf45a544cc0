//! Deterministic synthetic OHLCV generator for demos, benches and tests.
//!
//! Seeded from the BLAKE3 hash of the symbol, so the same symbol and date
//! range always produce the same bars. Weekends are skipped.

use crate::domain::Bar;
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn generate_synthetic_bars(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64) as f64;

        bars.push(Bar::new(
            current.and_time(NaiveTime::MIN),
            open,
            high,
            low,
            close,
            volume,
        ));

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}

/// `n` consecutive weekday bars starting 2024-01-01.
pub fn synthetic_series(symbol: &str, n: usize) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN);
    // 7 calendar days hold 5 weekdays; pad generously then trim
    let end = start + chrono::Duration::days((n as i64 * 7) / 5 + 7);
    let mut bars = generate_synthetic_bars(symbol, start, end);
    bars.truncate(n);
    bars
}
