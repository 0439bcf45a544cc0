//! Rolling-window primitives with O(1) amortized updates.
//!
//! - `RollingWindow`: ring buffer with compensated (Neumaier) running sums of
//!   the values and their squares, shifted by the first value seen. Rounding
//!   error stays at the scale of one window instead of building up over the
//!   series. A run of identical values covering the whole window reports that
//!   value as the mean and exactly zero variance.
//! - `RollingExtreme`: monotonic deque for rolling min or max.
//!
//! Both operate on plain `f64` inputs; the engine rejects non-finite values at
//! ingest, so no NaN bookkeeping is needed here.

use std::collections::VecDeque;

/// Neumaier-compensated running sum.
#[derive(Debug, Clone, Copy, Default)]
struct CompensatedSum {
    sum: f64,
    comp: f64,
}

impl CompensatedSum {
    fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.comp += (self.sum - t) + x;
        } else {
            self.comp += (x - t) + self.sum;
        }
        self.sum = t;
    }

    fn value(&self) -> f64 {
        self.sum + self.comp
    }
}

#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    buf: Vec<f64>,
    /// Slot of the oldest value once the buffer is full.
    head: usize,
    /// First value ever pushed; sums are kept relative to it.
    shift: f64,
    sum: CompensatedSum,
    sum_sq: CompensatedSum,
    /// Most recent value and how many consecutive pushes repeated it.
    last: f64,
    run: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "rolling window capacity must be >= 1");
        Self {
            capacity,
            buf: Vec::with_capacity(capacity),
            head: 0,
            shift: 0.0,
            sum: CompensatedSum::default(),
            sum_sq: CompensatedSum::default(),
            last: 0.0,
            run: 0,
        }
    }

    /// Push a value; once full, the oldest value is evicted and returned.
    pub fn push(&mut self, x: f64) -> Option<f64> {
        if self.run > 0 && x == self.last {
            self.run += 1;
        } else {
            if self.run == 0 {
                self.shift = x;
            }
            self.last = x;
            self.run = 1;
        }

        let d = x - self.shift;
        self.sum.add(d);
        self.sum_sq.add(d * d);

        if self.buf.len() < self.capacity {
            self.buf.push(x);
            return None;
        }

        let old = std::mem::replace(&mut self.buf[self.head], x);
        self.head = (self.head + 1) % self.capacity;
        let d_old = old - self.shift;
        self.sum.add(-d_old);
        self.sum_sq.add(-(d_old * d_old));
        Some(old)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buf.len() == self.capacity
    }

    /// Values oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.buf[self.head..].iter().chain(&self.buf[..self.head])
    }

    /// True when every value in the window is identical.
    fn is_flat(&self) -> bool {
        !self.buf.is_empty() && self.run >= self.buf.len()
    }

    /// Arithmetic mean of the values currently in the window.
    pub fn mean(&self) -> Option<f64> {
        if self.buf.is_empty() {
            return None;
        }
        if self.is_flat() {
            return Some(self.last);
        }
        Some(self.shift + self.sum.value() / self.buf.len() as f64)
    }

    /// Sample variance (N - 1 denominator). Needs at least two values.
    pub fn sample_variance(&self) -> Option<f64> {
        let n = self.buf.len();
        if n < 2 {
            return None;
        }
        if self.is_flat() {
            return Some(0.0);
        }
        let s1 = self.sum.value();
        // cancellation can leave a tiny negative residue
        let ss = (self.sum_sq.value() - s1 * s1 / n as f64).max(0.0);
        Some(ss / (n - 1) as f64)
    }

    pub fn sample_std(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }
}

/// Which extreme a [`RollingExtreme`] tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Min,
    Max,
}

/// Rolling min or max over the trailing `period` positions.
#[derive(Debug, Clone)]
pub struct RollingExtreme {
    period: usize,
    kind: Extreme,
    deque: VecDeque<(usize, f64)>,
    seen: usize,
}

impl RollingExtreme {
    pub fn new(period: usize, kind: Extreme) -> Self {
        assert!(period >= 1, "rolling extreme period must be >= 1");
        Self {
            period,
            kind,
            deque: VecDeque::with_capacity(period),
            seen: 0,
        }
    }

    /// Push the next value. Returns the extreme once `period` values have
    /// been seen, `None` during warm-up.
    pub fn push(&mut self, x: f64) -> Option<f64> {
        let i = self.seen;
        self.seen += 1;

        while let Some(&(_, back)) = self.deque.back() {
            let dominated = match self.kind {
                Extreme::Min => back >= x,
                Extreme::Max => back <= x,
            };
            if dominated {
                self.deque.pop_back();
            } else {
                break;
            }
        }
        self.deque.push_back((i, x));

        while let Some(&(front_idx, _)) = self.deque.front() {
            if front_idx + self.period <= i {
                self.deque.pop_front();
            } else {
                break;
            }
        }

        if self.seen < self.period {
            None
        } else {
            self.deque.front().map(|&(_, v)| v)
        }
    }
}

/// Rolling mean over `period`, `None` until the window is full.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut window = RollingWindow::new(period);
    values
        .iter()
        .map(|&v| {
            window.push(v);
            if window.is_full() {
                window.mean()
            } else {
                None
            }
        })
        .collect()
}

/// Rolling min or max over `period`, `None` until the window is full.
pub fn rolling_extreme(values: &[f64], period: usize, kind: Extreme) -> Vec<Option<f64>> {
    let mut ext = RollingExtreme::new(period, kind);
    values.iter().map(|&v| ext.push(v)).collect()
}
