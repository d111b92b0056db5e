//! Variable transport delay with a time-pruned sample history.
//!
//! Samples are appended at commit time only. A query at `t` looks up
//! `t - delay` in the history:
//! - no samples yet: the fallback input
//! - before the oldest / after the newest sample: that sample (clamped)
//! - otherwise: linear interpolation between the bracketing samples

use std::collections::VecDeque;

use sf_core::{CoreError, CoreResult, Value, ensure_finite};

/// Default retention window in seconds.
pub const DEFAULT_LIFESPAN: f64 = 10.0;

/// Time-ordered `(t, value)` samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleHistory {
    times: VecDeque<f64>,
    values: VecDeque<Value>,
}

impl SampleHistory {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn first_time(&self) -> Option<f64> {
        self.times.front().copied()
    }

    pub fn last_time(&self) -> Option<f64> {
        self.times.back().copied()
    }

    /// Append a sample. Returns the last time on a non-increasing `t`.
    pub fn push(&mut self, t: f64, value: Value) -> Result<(), f64> {
        if let Some(last) = self.last_time() {
            if t <= last {
                return Err(last);
            }
        }
        self.times.push_back(t);
        self.values.push_back(value);
        Ok(())
    }

    /// Drop every sample strictly older than `cutoff`.
    pub fn prune_before(&mut self, cutoff: f64) {
        while self.times.front().is_some_and(|&t| t < cutoff) {
            self.times.pop_front();
            self.values.pop_front();
        }
    }

    /// Clamped linear interpolation at `t`; `None` when empty.
    pub fn sample(&self, t: f64) -> Option<CoreResult<Value>> {
        let (first, last) = (self.times.front()?, self.times.back()?);
        if t <= *first {
            return self.values.front().cloned().map(Ok);
        }
        if t >= *last {
            return self.values.back().cloned().map(Ok);
        }

        // 0 < k < len for any t strictly inside the window; NaN lands on neither bound
        let k = self.times.partition_point(|&s| s < t);
        if k == 0 || k == self.times.len() {
            return Some(Err(CoreError::NonFinite {
                what: "delay lookup time",
                value: t,
            }));
        }
        let (t0, t1) = (self.times[k - 1], self.times[k]);
        let alpha = (t - t0) / (t1 - t0);
        Some(Value::lerp(&self.values[k - 1], &self.values[k], alpha))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delay {
    lifespan: f64,
    history: SampleHistory,
}

impl Delay {
    pub fn new(lifespan: f64) -> CoreResult<Self> {
        if lifespan.is_nan() || lifespan <= 0.0 {
            return Err(CoreError::InvalidArg {
                what: "delay lifespan must be positive",
            });
        }
        Ok(Self {
            lifespan,
            history: SampleHistory::default(),
        })
    }

    pub fn lifespan(&self) -> f64 {
        self.lifespan
    }

    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    /// Output at `t` for the given delay duration and fallback.
    pub fn evaluate(&self, t: f64, delay: &Value, fallback: &Value) -> CoreResult<Value> {
        let delay = delay.first().ok_or(CoreError::Empty {
            what: "delay duration",
        })?;
        let delay = ensure_finite(delay, "delay duration")?;
        match self.history.sample(t - delay) {
            Some(result) => result,
            None => Ok(fallback.clone()),
        }
    }

    /// Record the accepted input at `t` and forget samples outside the window.
    pub(crate) fn record(&mut self, t: f64, value: Value) -> Result<(), f64> {
        self.history.prune_before(t - self.lifespan);
        self.history.push(t, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(delay: &mut Delay, ts: impl IntoIterator<Item = f64>) {
        for t in ts {
            delay.record(t, Value::scalar(t)).unwrap();
        }
    }

    #[test]
    fn fallback_before_history() {
        let d = Delay::new(DEFAULT_LIFESPAN).unwrap();
        let out = d
            .evaluate(5.0, &Value::scalar(1.0), &Value::scalar(-7.0))
            .unwrap();
        assert_eq!(out.as_scalar(), Some(-7.0));
    }

    #[test]
    fn interpolates_inside_history() {
        let mut d = Delay::new(DEFAULT_LIFESPAN).unwrap();
        ramp(&mut d, (0..=10).map(|k| k as f64 * 0.1));
        let out = d
            .evaluate(0.75, &Value::scalar(0.2), &Value::scalar(0.0))
            .unwrap();
        assert!((out.as_scalar().unwrap() - 0.55).abs() < 1e-12);
    }

    #[test]
    fn clamps_at_both_ends() {
        let mut d = Delay::new(DEFAULT_LIFESPAN).unwrap();
        ramp(&mut d, [1.0, 2.0, 3.0]);
        let fallback = Value::scalar(-1.0);
        let early = d.evaluate(1.5, &Value::scalar(1.0), &fallback).unwrap();
        assert_eq!(early.as_scalar(), Some(1.0));
        let late = d.evaluate(10.0, &Value::scalar(0.5), &fallback).unwrap();
        assert_eq!(late.as_scalar(), Some(3.0));
    }

    #[test]
    fn prunes_outside_lifespan() {
        let mut d = Delay::new(1.0).unwrap();
        ramp(&mut d, (0..=30).map(|k| k as f64 * 0.1));
        let first = d.history().first_time().unwrap();
        assert!(first >= 3.0 - 1.0 - 1e-9);
        assert!((d.history().last_time().unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_increasing_commits() {
        let mut d = Delay::new(DEFAULT_LIFESPAN).unwrap();
        d.record(1.0, Value::scalar(0.0)).unwrap();
        assert_eq!(d.record(1.0, Value::scalar(0.0)), Err(1.0));
        assert_eq!(d.record(0.5, Value::scalar(0.0)), Err(1.0));
    }

    #[test]
    fn non_finite_delay_is_an_error() {
        let mut d = Delay::new(DEFAULT_LIFESPAN).unwrap();
        ramp(&mut d, [0.0, 0.1, 0.2]);
        let fallback = Value::scalar(0.0);
        for bad in [f64::NAN, f64::INFINITY] {
            let err = d.evaluate(0.2, &Value::scalar(bad), &fallback).unwrap_err();
            assert!(matches!(err, CoreError::NonFinite { what: "delay duration", .. }));
        }
        // a NaN lookup inside a populated history is reported, not indexed
        let out = d.history().sample(f64::NAN).unwrap();
        assert!(matches!(out, Err(CoreError::NonFinite { .. })));
    }

    #[test]
    fn invalid_lifespan() {
        assert!(Delay::new(0.0).is_err());
        assert!(Delay::new(f64::NAN).is_err());
    }

    #[test]
    fn vector_samples_interpolate_elementwise() {
        let mut d = Delay::new(DEFAULT_LIFESPAN).unwrap();
        d.record(0.0, Value::from(vec![0.0, 10.0])).unwrap();
        d.record(1.0, Value::from(vec![1.0, 20.0])).unwrap();
        let out = d
            .evaluate(1.0, &Value::scalar(0.5), &Value::scalar(0.0))
            .unwrap();
        assert_eq!(out.as_slice(), &[0.5, 15.0]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ramp_is_shifted_by_delay(
            delay in 0.05_f64..2.0_f64,
            frac in 0.0_f64..1.0_f64,
        ) {
            let mut d = Delay::new(DEFAULT_LIFESPAN).unwrap();
            for k in 0..=50 {
                let t = k as f64 * 0.1;
                d.record(t, Value::scalar(t)).unwrap();
            }
            // Query strictly inside the buffered window
            let t = delay + 0.01 + frac * (4.9 - 0.01);
            let out = d.evaluate(t, &Value::scalar(delay), &Value::scalar(0.0)).unwrap();
            prop_assert!((out.as_scalar().unwrap() - (t - delay)).abs() < 1e-9);
        }
    }
}
